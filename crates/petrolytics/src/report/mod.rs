//! The report assembler: composes datasets and chart artifacts into a
//! single paginated PDF.
//!
//! Assembly happens in two stages.  [`build_story`] builds the logical
//! [`Block`] sequence without touching the PDF stack, so the ordering
//! rules can be tested directly.  [`render_report`] serializes that
//! sequence through `genpdf` in one pass; if any block fails to render
//! (for example corrupt image bytes) the whole report fails and no
//! partial document is returned.

pub mod elements;
pub mod fonts;

use indexmap::IndexMap;
use thiserror::Error;

use genpdf::elements::{Break, FrameCellDecorator, PageBreak, Paragraph, TableLayout};
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Margins, Mm, SimplePageDecorator};

use crate::model::{Block, ChartArtifact, Dataset, HeadingLevel, ImageBlock, SummaryTable};
use crate::summary::summarize_dataset;
use elements::CaptionedImage;

/// The centered document title.
pub const REPORT_TITLE: &str = "Data Analysis Report";
/// Section heading above the per-dataset tables.
pub const SUMMARIES_HEADING: &str = "Data Summaries (Top 5 Unique Values)";
/// Section heading above the embedded charts.
pub const VISUALIZATIONS_HEADING: &str = "Visualizations";
/// Fallback paragraph when there is nothing to report.
pub const NO_CONTENT_TEXT: &str = "No data or charts available for reporting.";
/// Fixed download filename for the generated document.
pub const REPORT_FILE_NAME: &str = "analysis_report.pdf";
/// MIME type of the generated document.
pub const REPORT_MIME: &str = "application/pdf";

/// Fixed rendered width for embedded chart images (aspect preserved).
const IMAGE_WIDTH_MM: f64 = 165.0;

const TITLE_FONT_SIZE: u8 = 26;
const SECTION_FONT_SIZE: u8 = 20;
const SUBSECTION_FONT_SIZE: u8 = 14;
const CHART_TITLE_FONT_SIZE: u8 = 12;
const BODY_FONT_SIZE: u8 = 10;

const TITLE_COLOR: Color = Color::Rgb(0, 0, 139);
const SUBSECTION_COLOR: Color = Color::Rgb(85, 85, 85);

/// Why report generation failed.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report fonts could not be located or parsed.
    #[error("font setup failed: {0}")]
    FontLoad(#[source] genpdf::error::Error),
    /// A block failed to serialize; no partial document is produced.
    #[error("report rendering failed: {0}")]
    Render(#[source] genpdf::error::Error),
}

/// Builds the logical block sequence for a report.
///
/// Block order is deterministic for the same inputs: the title first,
/// then one summary table per dataset in mapping-iteration order
/// (columns in dataset-column order), then a page break and one image
/// per chart artifact in insertion order.  With no content at all, the
/// title is followed by a single fallback paragraph.
pub fn build_story(
    datasets: &IndexMap<String, Dataset>,
    charts: &IndexMap<String, ChartArtifact>,
) -> Vec<Block> {
    let mut story = vec![Block::heading(HeadingLevel::Title, REPORT_TITLE)];

    if !datasets.is_empty() {
        story.push(Block::heading(HeadingLevel::Section, SUMMARIES_HEADING));
        for (name, dataset) in datasets {
            story.push(Block::heading(
                HeadingLevel::Subsection,
                format!("Summary for: {name}"),
            ));
            let rows = summarize_dataset(dataset)
                .into_iter()
                .map(|summary| (summary.column().to_owned(), summary.joined_values()))
                .collect();
            story.push(Block::Table(SummaryTable::new(rows)));
        }
    }

    if !charts.is_empty() {
        story.push(Block::PageBreak);
        story.push(Block::heading(HeadingLevel::Section, VISUALIZATIONS_HEADING));
        for artifact in charts.values() {
            story.push(Block::heading(HeadingLevel::ChartTitle, artifact.title()));
            story.push(Block::Image(ImageBlock::from_artifact(artifact)));
        }
    }

    if datasets.is_empty() && charts.is_empty() {
        story.push(Block::paragraph(NO_CONTENT_TEXT));
    }

    story
}

/// Assembles and serializes the report to a PDF byte buffer in one pass.
pub fn render_report(
    datasets: &IndexMap<String, Dataset>,
    charts: &IndexMap<String, ChartArtifact>,
) -> Result<Vec<u8>, ReportError> {
    render_story(&build_story(datasets, charts))
}

/// Serializes an already-built block sequence.
pub fn render_story(story: &[Block]) -> Result<Vec<u8>, ReportError> {
    let font_family = fonts::default_font_family().map_err(ReportError::FontLoad)?;

    let mut document = genpdf::Document::new(font_family);
    document.set_title(REPORT_TITLE);
    document.set_paper_size(genpdf::PaperSize::Letter);
    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::trbl(20.0, 18.0, 20.0, 18.0));
    document.set_page_decorator(decorator);

    for block in story {
        push_block(&mut document, block).map_err(ReportError::Render)?;
    }

    let mut buffer = Vec::new();
    document.render(&mut buffer).map_err(ReportError::Render)?;
    Ok(buffer)
}

fn push_block(document: &mut genpdf::Document, block: &Block) -> Result<(), genpdf::error::Error> {
    match block {
        Block::Heading(level, text) => push_heading(document, *level, text),
        Block::Table(table) => push_table(document, table)?,
        Block::Image(image) => push_image(document, image)?,
        Block::Paragraph(text) => {
            document.push(
                Paragraph::new(text.as_str()).styled(Style::new().with_font_size(BODY_FONT_SIZE)),
            );
        }
        Block::PageBreak => document.push(PageBreak::new()),
    }
    Ok(())
}

fn push_heading(document: &mut genpdf::Document, level: HeadingLevel, text: &str) {
    let (style, alignment, space_after) = match level {
        HeadingLevel::Title => (
            Style::new()
                .bold()
                .with_font_size(TITLE_FONT_SIZE)
                .with_color(TITLE_COLOR),
            Alignment::Center,
            1.2,
        ),
        HeadingLevel::Section => (
            Style::new().bold().with_font_size(SECTION_FONT_SIZE),
            Alignment::Left,
            0.8,
        ),
        HeadingLevel::Subsection => (
            Style::new()
                .bold()
                .with_font_size(SUBSECTION_FONT_SIZE)
                .with_color(SUBSECTION_COLOR),
            Alignment::Left,
            0.5,
        ),
        HeadingLevel::ChartTitle => (
            Style::new().bold().with_font_size(CHART_TITLE_FONT_SIZE),
            Alignment::Center,
            0.3,
        ),
    };

    document.push(Paragraph::new(text).aligned(alignment).styled(style));
    document.push(Break::new(space_after));
}

fn push_table(
    document: &mut genpdf::Document,
    table: &SummaryTable,
) -> Result<(), genpdf::error::Error> {
    // 30/70 split between column names and the joined value lists.
    let mut layout = TableLayout::new(vec![3, 7]);
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    let header_style = Style::new().bold().with_font_size(BODY_FONT_SIZE);
    let body_style = Style::new().with_font_size(BODY_FONT_SIZE);
    let padding = cell_padding();

    layout
        .row()
        .element(
            Paragraph::new("Column Name")
                .styled(header_style)
                .padded(padding),
        )
        .element(
            Paragraph::new("Top 5 Unique Values")
                .styled(header_style)
                .padded(padding),
        )
        .push()?;

    for (column, values) in table.rows() {
        layout
            .row()
            .element(
                Paragraph::new(column.as_str())
                    .styled(body_style)
                    .padded(padding),
            )
            .element(
                Paragraph::new(values.as_str())
                    .styled(body_style)
                    .padded(padding),
            )
            .push()?;
    }

    document.push(layout);
    document.push(Break::new(1.0));
    Ok(())
}

fn push_image(
    document: &mut genpdf::Document,
    image: &ImageBlock,
) -> Result<(), genpdf::error::Error> {
    let mut caption = Paragraph::default();
    caption.push_styled(
        format!("Figure: {}", image.title()),
        Style::new().with_font_size(BODY_FONT_SIZE),
    );
    let element = CaptionedImage::from_bytes(image.png(), caption)?
        .with_alignment(Alignment::Center)
        .with_width(Mm::from(printpdf::Mm(IMAGE_WIDTH_MM)));

    document.push(element);
    document.push(Break::new(1.2));
    Ok(())
}

fn cell_padding() -> Margins {
    // Roughly the 5pt vertical / 8pt horizontal padding of the dashboard
    // tables, in millimetres.
    Margins::trbl(1.8, 2.8, 1.8, 2.8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;

    fn dataset_map(datasets: Vec<Dataset>) -> IndexMap<String, Dataset> {
        datasets
            .into_iter()
            .map(|d| (d.name().to_owned(), d))
            .collect()
    }

    fn chart_map(artifacts: Vec<ChartArtifact>) -> IndexMap<String, ChartArtifact> {
        artifacts
            .into_iter()
            .map(|a| (a.key().to_owned(), a))
            .collect()
    }

    fn artifact(key: &str) -> ChartArtifact {
        ChartArtifact::new(key, format!("title of {key}"), vec![1, 2, 3], 4, 2)
    }

    #[test]
    fn empty_inputs_yield_title_and_fallback_only() {
        let story = build_story(&IndexMap::new(), &IndexMap::new());
        assert_eq!(story.len(), 2);
        assert!(matches!(
            &story[0],
            Block::Heading(HeadingLevel::Title, text) if text == REPORT_TITLE
        ));
        assert!(matches!(
            &story[1],
            Block::Paragraph(text) if text == NO_CONTENT_TEXT
        ));
    }

    #[test]
    fn single_dataset_yields_one_table_and_no_images() {
        let ds = Dataset::new("a.csv")
            .with_column("x", vec![Value::Int(1), Value::Int(2)])
            .with_column("y", vec![Value::Int(3), Value::Int(3)]);
        let story = build_story(&dataset_map(vec![ds]), &IndexMap::new());

        let tables: Vec<&SummaryTable> = story
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows().len(), 2);
        assert_eq!(tables[0].rows()[0].0, "x");
        assert_eq!(tables[0].rows()[1].0, "y");

        assert!(!story.iter().any(|b| matches!(b, Block::Image(_))));
        assert!(!story.iter().any(|b| matches!(b, Block::PageBreak)));
        assert!(!story
            .iter()
            .any(|b| matches!(b, Block::Paragraph(t) if t == NO_CONTENT_TEXT)));
    }

    #[test]
    fn charts_follow_tables_after_a_page_break() {
        let ds = Dataset::new("a.csv").with_column("x", vec![Value::Int(1)]);
        let story = build_story(
            &dataset_map(vec![ds]),
            &chart_map(vec![artifact("k1"), artifact("k2")]),
        );

        let break_pos = story
            .iter()
            .position(|b| matches!(b, Block::PageBreak))
            .expect("page break between tables and charts");
        let first_image = story
            .iter()
            .position(|b| matches!(b, Block::Image(_)))
            .unwrap();
        let last_table = story
            .iter()
            .rposition(|b| matches!(b, Block::Table(_)))
            .unwrap();
        assert!(last_table < break_pos);
        assert!(break_pos < first_image);

        let image_count = story.iter().filter(|b| matches!(b, Block::Image(_))).count();
        assert_eq!(image_count, 2);
    }

    #[test]
    fn story_is_deterministic() {
        let ds = Dataset::new("a.csv").with_column("x", vec![Value::Int(1)]);
        let datasets = dataset_map(vec![ds]);
        let charts = chart_map(vec![artifact("k1")]);
        assert_eq!(build_story(&datasets, &charts), build_story(&datasets, &charts));
    }

    #[test]
    fn charts_only_story_starts_images_on_a_new_page() {
        let story = build_story(&IndexMap::new(), &chart_map(vec![artifact("k")]));
        assert!(matches!(story[1], Block::PageBreak));
        assert!(matches!(
            &story[2],
            Block::Heading(HeadingLevel::Section, text) if text == VISUALIZATIONS_HEADING
        ));
    }
}
