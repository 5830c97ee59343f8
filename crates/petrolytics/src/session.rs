//! Session-scoped accumulation of uploaded datasets and rendered charts.
//!
//! The original dashboard built these mappings up implicitly while
//! iterating over UI widgets; here they live in an explicit per-session
//! context object that is passed between stages and dropped when the
//! session ends.  Nothing in this module is shared across sessions.

use indexmap::IndexMap;

use crate::model::{ChartArtifact, Dataset};

/// Per-session state: datasets keyed by display name and chart artifacts
/// keyed by their (kind, X, Y, dataset) lookup key, both in insertion
/// order.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    datasets: IndexMap<String, Dataset>,
    charts: IndexMap<String, ChartArtifact>,
    analysis_mode: bool,
}

impl AnalysisSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a dataset under its display name.
    pub fn insert_dataset(&mut self, dataset: Dataset) {
        self.datasets.insert(dataset.name().to_owned(), dataset);
    }

    /// Adds a chart artifact under its lookup key.
    ///
    /// Re-rendering with identical parameters produces the same key, so
    /// the previous artifact is replaced in place: the mapping does not
    /// grow and the artifact keeps its position in iteration order.
    pub fn insert_chart(&mut self, artifact: ChartArtifact) {
        self.charts.insert(artifact.key().to_owned(), artifact);
    }

    /// Returns the datasets in insertion order.
    pub fn datasets(&self) -> &IndexMap<String, Dataset> {
        &self.datasets
    }

    /// Returns the chart artifacts in insertion order.
    pub fn charts(&self) -> &IndexMap<String, ChartArtifact> {
        &self.charts
    }

    /// Returns `true` when neither datasets nor charts are present.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty() && self.charts.is_empty()
    }

    /// Returns whether the user has entered analysis mode.
    pub fn analysis_mode(&self) -> bool {
        self.analysis_mode
    }

    /// Toggles analysis mode.
    pub fn set_analysis_mode(&mut self, enabled: bool) {
        self.analysis_mode = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(key: &str, payload: &[u8]) -> ChartArtifact {
        ChartArtifact::new(key, format!("title for {key}"), payload.to_vec(), 4, 2)
    }

    #[test]
    fn rerender_overwrites_instead_of_duplicating() {
        let mut session = AnalysisSession::new();
        session.insert_chart(artifact("Line (y vs x) for a.csv", b"v1"));
        session.insert_chart(artifact("Bar (y vs x) for a.csv", b"v1"));
        session.insert_chart(artifact("Line (y vs x) for a.csv", b"v2"));

        assert_eq!(session.charts().len(), 2);
        let first = session.charts().get_index(0).unwrap();
        assert_eq!(first.0, "Line (y vs x) for a.csv");
        assert_eq!(first.1.png(), b"v2");
    }

    #[test]
    fn dataset_replacement_keeps_single_entry() {
        let mut session = AnalysisSession::new();
        session.insert_dataset(Dataset::new("a.csv"));
        session.insert_dataset(Dataset::new("a.csv"));
        assert_eq!(session.datasets().len(), 1);
    }

    #[test]
    fn empty_session_reports_empty() {
        let mut session = AnalysisSession::new();
        assert!(session.is_empty());
        session.insert_dataset(Dataset::new("a.csv"));
        assert!(!session.is_empty());
    }
}
