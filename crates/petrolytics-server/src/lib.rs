//! Library surface of the chat relay, split out so integration tests
//! can build the router against a mock upstream.

pub mod generate;
pub mod routes;
pub mod state;
