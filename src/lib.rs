//! Poptree - world population treemap page generator
//!
//! Poptree downloads the world population dataset, fills gaps, sorts it by
//! population, and writes a static HTML page that draws a World → Continent →
//! Country treemap with plotly.js. The page has no server-side parts, so it
//! can be published as-is (GitHub Pages or any static host).
//!
//! # Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Load | [`loader`] | [`Table`] from a URL or local CSV |
//! | Clean | [`clean`] | forward-filled table, duplicate count |
//! | Sort | [`table`] | rows in descending population order |
//! | Chart | [`chart`] | plotly [`Figure`] |
//! | Emit + write | [`report`] | `index.html` |
//!
//! [`pipeline::run`] runs all of them.
//!
//! # Quick Start
//!
//! ```no_run
//! use poptree::pipeline::{self, PipelineConfig};
//!
//! let summary = pipeline::run(&PipelineConfig::default())?;
//! println!("{} rows charted", summary.charted);
//! # Ok::<(), poptree::Error>(())
//! ```

pub mod chart;
pub mod clean;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod report;
pub mod table;

pub use chart::{Figure, TreemapSpec};
pub use error::{Error, Result};
pub use pipeline::{PipelineConfig, Summary};
pub use table::{Record, Table};
