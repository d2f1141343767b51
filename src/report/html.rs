//! Static HTML page with the figure embedded for plotly.js

use crate::chart::Figure;
use crate::error::Result;

/// Pinned plotly.js build loaded by the page
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Id of the element the chart renders into
pub const CONTAINER_ID: &str = "plotly-div";

pub const PAGE_TITLE: &str = "World Population Treemap";

pub fn render(figure: &Figure) -> Result<String> {
    let figure_json = script_safe(&serde_json::to_string(figure)?);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{cdn}"></script>
</head>
<body>
    <div id="{id}"></div>
    <script>
        var figureJSON = {figure_json};
        Plotly.newPlot('{id}', figureJSON.data, figureJSON.layout);
    </script>
</body>
</html>
"#,
        title = PAGE_TITLE,
        cdn = PLOTLY_CDN,
        id = CONTAINER_ID,
        figure_json = figure_json
    ))
}

/// Pull the figure literal back out of a page written by [`render`]
pub fn extract_figure(page: &str) -> Option<Figure> {
    let start = page.find("var figureJSON = ")? + "var figureJSON = ".len();
    let end = start + page[start..].find(";\n")?;
    serde_json::from_str(&page[start..end]).ok()
}

/// A JSON literal inside `<script>` must not contain `<` at all: `</script>`
/// would end the element and `<!--` plus `<script` would switch the parser
/// into its escaped states. `<` only occurs inside JSON strings, where
/// `\u003c` is the same character.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
}
