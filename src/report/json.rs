//! Bare figure JSON, for inspection or other front-ends

use crate::chart::Figure;
use crate::error::Result;

pub fn render(figure: &Figure) -> Result<String> {
    let mut out = serde_json::to_string_pretty(figure)?;
    out.push('\n');
    Ok(out)
}
