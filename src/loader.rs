//! Dataset loading
//!
//! The source is either an `http(s)://` URL, fetched with a blocking client,
//! or a path to a CSV file on disk. Either way the bytes go through
//! [`parse_csv`], which turns the header row into column names and every
//! empty field into a missing cell.

use crate::error::{Error, Result};
use crate::table::{Record, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, Read};

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Draw a progress bar on stderr while downloading
    pub progress: bool,
}

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Load the dataset at `source` into a table
pub fn load(source: &str, options: &LoadOptions) -> Result<Table> {
    if is_remote(source) {
        let body = fetch(source, options)?;
        parse_csv(body.as_slice())
    } else {
        let file = File::open(source).map_err(|e| Error::io(source, e))?;
        parse_csv(BufReader::new(file))
    }
}

/// Download `url` into memory
pub fn fetch(url: &str, options: &LoadOptions) -> Result<Vec<u8>> {
    let network = |message: String| Error::Network {
        url: url.to_string(),
        message,
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| network(e.to_string()))?;

    let mut body = Vec::new();
    if options.progress {
        let pb = download_bar(response.content_length());
        let read = pb.wrap_read(response).read_to_end(&mut body);
        pb.finish_and_clear();
        read.map_err(|e| network(e.to_string()))?;
    } else {
        let mut response = response;
        response
            .read_to_end(&mut body)
            .map_err(|e| network(e.to_string()))?;
    }

    Ok(body)
}

fn download_bar(len: Option<u64>) -> ProgressBar {
    match len {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=>-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

/// Parse CSV text with a header row into a table
pub fn parse_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(Error::Parse("dataset has no header row".to_string()));
    }

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let cells = row
            .iter()
            .map(|field| {
                let field = field.trim();
                if field.is_empty() {
                    None
                } else {
                    Some(field.to_string())
                }
            })
            .collect();
        records.push(Record::new(cells));
    }

    Table::new(columns, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headers_and_rows() {
        let csv = "Rank,CCA3,Country,Continent,2022 Population\n\
                   1,CHN,China,Asia,1425887337\n\
                   2,IND,India,Asia,1417173173\n";

        let table = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(
            table.columns(),
            &["Rank", "CCA3", "Country", "Continent", "2022 Population"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].get(2), Some("India"));
    }

    #[test]
    fn test_empty_fields_are_missing() {
        let csv = "Country,Continent,Pop\nChina,,10\n, Asia ,\n";

        let table = parse_csv(csv.as_bytes()).unwrap();

        assert!(table.records()[0].is_missing(1));
        assert!(table.records()[1].is_missing(0));
        assert_eq!(table.records()[1].get(1), Some("Asia"));
        assert!(table.records()[1].is_missing(2));
    }

    #[test]
    fn test_quoted_fields_keep_commas() {
        let csv = "Country,Capital\n\"Korea, Republic of\",Seoul\n";

        let table = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(table.records()[0].get(0), Some("Korea, Republic of"));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let csv = "a,b,c\n1,2,3\n4,5\n";

        let err = parse_csv(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, Error::Parse(_)), "got {:?}", err);
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = parse_csv("".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {:?}", err);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let bytes: &[u8] = b"Country\n\xff\xfe\n";
        let err = parse_csv(bytes).unwrap_err();
        assert!(matches!(err, Error::Parse(_)), "got {:?}", err);
    }

    #[test]
    fn test_missing_local_file_is_io_error() {
        let err = load("/nonexistent/world_population.csv", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }), "got {:?}", err);
    }

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://example.com/data.csv"));
        assert!(is_remote("http://localhost:8000/data.csv"));
        assert!(!is_remote("data/world_population.csv"));
    }
}
