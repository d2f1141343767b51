//! load → clean → sort → chart → page, in one call

use crate::chart::{self, Figure, TreemapSpec};
use crate::clean;
use crate::error::Result;
use crate::loader::{self, LoadOptions};
use crate::report;
use crate::table::Table;
use std::path::PathBuf;

pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/AlexTheAnalyst/PandasYouTubeSeries/main/world_population.csv";
pub const DEFAULT_OUTPUT: &str = "index.html";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// URL or local path of the CSV
    pub source: String,
    pub output: PathBuf,
    pub spec: TreemapSpec,
    /// Use the deduplicated table downstream instead of only counting duplicates
    pub drop_duplicates: bool,
    pub progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            spec: TreemapSpec::default(),
            drop_duplicates: false,
            progress: false,
        }
    }
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Rows read from the source
    pub rows: usize,
    /// Missing cells filled from an earlier row
    pub filled: usize,
    /// Leading missing cells left as-is, per column
    pub unresolved: Vec<(String, usize)>,
    /// Exact duplicate rows found
    pub duplicates: usize,
    /// Whether those duplicates were removed before charting
    pub duplicates_dropped: bool,
    /// Rows that reached the chart
    pub charted: usize,
    /// Treemap nodes, root included
    pub nodes: usize,
    /// Size of the root node
    pub total: f64,
}

/// Run every stage and write the page
pub fn run(config: &PipelineConfig) -> Result<Summary> {
    let table = loader::load(
        &config.source,
        &LoadOptions {
            progress: config.progress,
        },
    )?;
    let (figure, summary) = process(table, config)?;
    report::generate(&config.output, &figure)?;
    Ok(summary)
}

/// The in-memory stages: clean, sort, chart
pub fn process(mut table: Table, config: &PipelineConfig) -> Result<(Figure, Summary)> {
    let rows = table.len();

    let fill = clean::forward_fill(&mut table);

    let deduped = clean::drop_duplicates(&table);
    let duplicates = rows - deduped.len();
    if config.drop_duplicates {
        table = deduped;
    }

    table.sort_descending_by(&config.spec.values)?;

    let figure = chart::build(&table, &config.spec)?;
    let (nodes, total) = figure
        .treemap()
        .map(|t| (t.ids.len(), t.values.last().copied().unwrap_or(0.0)))
        .unwrap_or((0, 0.0));

    let summary = Summary {
        rows,
        filled: fill.filled,
        unresolved: fill.unresolved,
        duplicates,
        duplicates_dropped: config.drop_duplicates,
        charted: table.len(),
        nodes,
        total,
    };

    Ok((figure, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_csv;

    const SAMPLE: &str = "\
Rank,CCA3,Country,Capital,Continent,2022 Population
3,USA,United States,Washington D.C.,North America,338289857
1,CHN,China,Beijing,Asia,1425887337
2,IND,India,New Delhi,,1417173173
2,IND,India,New Delhi,,1417173173
";

    fn sample() -> Table {
        parse_csv(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_duplicates_counted_but_kept_by_default() {
        let (figure, summary) = process(sample(), &PipelineConfig::default()).unwrap();
        let trace = figure.treemap().unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.duplicates, 1);
        assert!(!summary.duplicates_dropped);
        assert_eq!(summary.charted, 4);
        // The duplicated India row counts twice
        let india = trace.ids.iter().position(|i| i == "World/Asia/India").unwrap();
        assert_eq!(trace.values[india], 2.0 * 1417173173.0);
    }

    #[test]
    fn test_drop_duplicates_removes_them() {
        let config = PipelineConfig {
            drop_duplicates: true,
            ..PipelineConfig::default()
        };

        let (figure, summary) = process(sample(), &config).unwrap();
        let trace = figure.treemap().unwrap();

        assert_eq!(summary.charted, 3);
        assert!(summary.duplicates_dropped);
        let india = trace.ids.iter().position(|i| i == "World/Asia/India").unwrap();
        assert_eq!(trace.values[india], 1417173173.0);
    }

    #[test]
    fn test_filled_continent_lands_in_hierarchy() {
        let (figure, summary) = process(sample(), &PipelineConfig::default()).unwrap();
        let trace = figure.treemap().unwrap();

        // Both India rows inherit "Asia" from China
        assert_eq!(summary.filled, 2);
        assert!(summary.unresolved.is_empty());
        assert!(trace.ids.iter().any(|i| i == "World/Asia/India"));
    }

    #[test]
    fn test_leaves_follow_sorted_order() {
        let (figure, summary) = process(sample(), &PipelineConfig::default()).unwrap();
        let trace = figure.treemap().unwrap();

        assert_eq!(
            &trace.labels[..3],
            &["China", "India", "United States"]
        );
        assert_eq!(summary.nodes, 6);
        assert_eq!(
            summary.total,
            1425887337.0 + 2.0 * 1417173173.0 + 338289857.0
        );
    }

    #[test]
    fn test_leading_gap_in_path_column_fails_chart() {
        let csv = "Country,Continent,2022 Population\nA,,1\nB,Asia,2\n";
        let table = parse_csv(csv.as_bytes()).unwrap();

        let err = process(table, &PipelineConfig::default()).unwrap_err();

        assert!(
            matches!(err, crate::Error::Validation { ref column, .. } if column == "Continent"),
            "got {:?}",
            err
        );
    }
}
