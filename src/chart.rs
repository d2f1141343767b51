//! Treemap chart specification
//!
//! Builds the plotly figure (`data` + `layout`) for a hierarchical treemap:
//! a constant root, one level per grouping column, leaves sized by a numeric
//! column and coloured by a categorical one.
//!
//! # Node order
//!
//! The hierarchy is flattened the way plotly's own treemap helpers do it:
//! leaves first in row order, then each level above in order of first
//! appearance, then the root. Node ids are the `/`-joined path from the root
//! (`World/Asia/China`, with `/` and `\` inside a label escaped), so two rows with the same full path collapse into a
//! single leaf whose size is their sum.
//!
//! # Colour
//!
//! Each distinct value of the colour column gets an integer code in order of
//! first appearance. A node whose leaves all share a code gets that code;
//! a node spanning several gets the value-weighted mean. The codes are mapped
//! through the continuous `RdBu` scale by the client.

use crate::error::{Error, Result};
use crate::table::{parse_number, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_ROOT: &str = "World";
pub const DEFAULT_PATH: [&str; 2] = ["Continent", "Country"];
pub const DEFAULT_VALUE_COLUMN: &str = "2022 Population";
pub const DEFAULT_COLOR_COLUMN: &str = "Continent";
pub const DEFAULT_TITLE: &str = "2022 World Population Treemap by Continent and Country";

pub const TEXT_TEMPLATE: &str = "%{label}<br>%{customdata[0]:,.0f}";
pub const TEXT_POSITION: &str = "middle center";
pub const HOVER_TEMPLATE: &str = "<b>%{label}</b><br>Population: %{value:,.0f}<extra></extra>";

/// Diverging red-blue scale, low codes red and high codes blue
pub const RDBU: [&str; 11] = [
    "rgb(103,0,31)",
    "rgb(178,24,43)",
    "rgb(214,96,77)",
    "rgb(244,165,130)",
    "rgb(253,219,199)",
    "rgb(247,247,247)",
    "rgb(209,229,240)",
    "rgb(146,197,222)",
    "rgb(67,147,195)",
    "rgb(33,102,172)",
    "rgb(5,48,97)",
];

/// What to draw
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapSpec {
    /// Label of the single top-level node
    pub root: String,
    /// Grouping columns, outermost first
    pub path: Vec<String>,
    /// Numeric column giving leaf sizes
    pub values: String,
    /// Categorical column driving the colour scale
    pub color: String,
    pub title: String,
}

impl Default for TreemapSpec {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            path: DEFAULT_PATH.iter().map(|c| c.to_string()).collect(),
            values: DEFAULT_VALUE_COLUMN.to_string(),
            color: DEFAULT_COLOR_COLUMN.to_string(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Treemap>,
    pub layout: Layout,
}

impl Figure {
    /// The treemap trace, if the figure has one
    pub fn treemap(&self) -> Option<&Treemap> {
        self.data.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treemap {
    #[serde(rename = "type")]
    pub kind: String,
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<f64>,
    pub branchvalues: String,
    pub customdata: Vec<[f64; 1]>,
    pub marker: Marker,
    pub texttemplate: String,
    pub textposition: String,
    pub hovertemplate: String,
    pub meta: TreemapMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub colors: Vec<f64>,
    pub colorscale: Vec<(f64, String)>,
    pub cmin: f64,
    pub cmax: f64,
    pub showscale: bool,
}

/// Columns the figure was built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapMeta {
    pub path: Vec<String>,
    pub values: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Title,
    pub margin: Margin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub t: u32,
    pub l: u32,
    pub r: u32,
    pub b: u32,
}

pub const MARGIN: Margin = Margin {
    t: 50,
    l: 25,
    r: 25,
    b: 25,
};

struct Node {
    id: String,
    label: String,
    parent: String,
    value: f64,
    first_code: usize,
    mixed: bool,
    code_sum: f64,
    weighted_code_sum: f64,
    rows: usize,
}

impl Node {
    fn new(id: String, label: String, parent: String, code: usize) -> Self {
        Self {
            id,
            label,
            parent,
            value: 0.0,
            first_code: code,
            mixed: false,
            code_sum: 0.0,
            weighted_code_sum: 0.0,
            rows: 0,
        }
    }

    fn add(&mut self, value: f64, code: usize) {
        self.value += value;
        self.mixed |= code != self.first_code;
        self.code_sum += code as f64;
        self.weighted_code_sum += value * code as f64;
        self.rows += 1;
    }

    fn color(&self) -> f64 {
        if !self.mixed {
            self.first_code as f64
        } else if self.value > 0.0 {
            self.weighted_code_sum / self.value
        } else {
            self.code_sum / self.rows as f64
        }
    }
}

/// Build the treemap figure for `table`
pub fn build(table: &Table, spec: &TreemapSpec) -> Result<Figure> {
    if spec.path.is_empty() {
        return Err(Error::validation("path", "treemap needs at least one grouping column"));
    }

    let path_idx = spec
        .path
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<Vec<_>>>()?;
    let value_idx = table.require_column(&spec.values)?;
    let color_idx = table.require_column(&spec.color)?;

    let missing = |column: &str, row: usize| {
        Error::validation(column, format!("row {}: value is missing", row + 1))
    };

    let mut codes: HashMap<String, usize> = HashMap::new();
    let root_id = escape_segment(&spec.root);
    let mut root = Node::new(root_id.clone(), spec.root.clone(), String::new(), 0);
    // levels[d] holds the nodes at depth d + 1, in first-appearance order
    let mut levels: Vec<Vec<Node>> = (0..spec.path.len()).map(|_| Vec::new()).collect();
    // id -> (depth, slot in levels[depth])
    let mut lookup: HashMap<String, (usize, usize)> = HashMap::new();

    for (row, record) in table.records().iter().enumerate() {
        let text = record
            .get(value_idx)
            .ok_or_else(|| missing(spec.values.as_str(), row))?;
        let value = parse_number(text).ok_or_else(|| {
            Error::validation(
                &spec.values,
                format!("row {}: '{}' is not a number", row + 1, text),
            )
        })?;
        if value < 0.0 {
            return Err(Error::validation(
                &spec.values,
                format!("row {}: negative size {}", row + 1, text),
            ));
        }

        let category = record
            .get(color_idx)
            .ok_or_else(|| missing(spec.color.as_str(), row))?;
        let next_code = codes.len();
        let code = *codes.entry(category.to_string()).or_insert(next_code);

        let labels = path_idx
            .iter()
            .zip(&spec.path)
            .map(|(&idx, column)| record.get(idx).ok_or_else(|| missing(column.as_str(), row)))
            .collect::<Result<Vec<_>>>()?;

        root.add(value, code);
        let mut parent = root_id.clone();
        for (depth, label) in labels.into_iter().enumerate() {
            let id = format!("{}/{}", parent, escape_segment(label));
            let slot = match lookup.get(&id).copied() {
                Some((at, slot)) if at == depth => slot,
                Some(_) => {
                    return Err(Error::validation(
                        &spec.path[depth],
                        format!("row {}: node id '{}' is used at two levels", row + 1, id),
                    ))
                }
                None => {
                    let level = &mut levels[depth];
                    level.push(Node::new(id.clone(), label.to_string(), parent, code));
                    lookup.insert(id.clone(), (depth, level.len() - 1));
                    level.len() - 1
                }
            };
            levels[depth][slot].add(value, code);
            parent = id;
        }
    }

    let nodes: Vec<&Node> = levels
        .iter()
        .rev()
        .flat_map(|level| level.iter())
        .chain(std::iter::once(&root))
        .collect();

    let max_code = codes.len().saturating_sub(1) as f64;

    let trace = Treemap {
        kind: "treemap".to_string(),
        ids: nodes.iter().map(|n| n.id.clone()).collect(),
        labels: nodes.iter().map(|n| n.label.clone()).collect(),
        parents: nodes.iter().map(|n| n.parent.clone()).collect(),
        values: nodes.iter().map(|n| n.value).collect(),
        branchvalues: "total".to_string(),
        customdata: nodes.iter().map(|n| [n.value]).collect(),
        marker: Marker {
            colors: nodes.iter().map(|n| n.color()).collect(),
            colorscale: color_scale(&RDBU),
            cmin: 0.0,
            cmax: max_code.max(1.0),
            showscale: false,
        },
        texttemplate: TEXT_TEMPLATE.to_string(),
        textposition: TEXT_POSITION.to_string(),
        hovertemplate: HOVER_TEMPLATE.to_string(),
        meta: TreemapMeta {
            path: spec.path.clone(),
            values: spec.values.clone(),
            color: spec.color.clone(),
        },
    };

    Ok(Figure {
        data: vec![trace],
        layout: Layout {
            title: Title {
                text: spec.title.clone(),
            },
            margin: MARGIN,
        },
    })
}

/// One id segment: `\` and `/` inside a label are backslash-escaped so the
/// `/`-joined path stays unambiguous.
fn escape_segment(label: &str) -> String {
    label.replace('\\', "\\\\").replace('/', "\\/")
}

/// Evenly spaced `[position, colour]` stops
fn color_scale(colors: &[&str]) -> Vec<(f64, String)> {
    let last = colors.len().saturating_sub(1).max(1) as f64;
    colors
        .iter()
        .enumerate()
        .map(|(i, c)| (i as f64 / last, c.to_string()))
        .collect()
}

/// Round to a whole number and group thousands with commas: `1,425,887,337`
pub fn format_thousands(value: f64) -> String {
    let rounded = format!("{:.0}", value.abs());
    let digits = rounded.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value.round() < 0.0 {
        out.push('-');
    }
    for (i, &d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(d as char);
    }
    out
}
