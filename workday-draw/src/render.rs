//! HTML output for the upload form and the draw result

use std::fmt::Write;

use crate::assignment::Assignment;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Workday draw</title>
    <style>
        body { font-family: Arial; }
        fieldset { border: none; padding: 0; margin: 1em 0; }
    </style>
</head>
<body>
    <form action="/upload" method="post" enctype="multipart/form-data">
        <input type="file" name="file" accept=".xlsx,.xlsm,.xlsb,.xls,.ods">
        <fieldset>
            <label><input type="checkbox" name="workdays" value="Monday" checked> Monday</label>
            <label><input type="checkbox" name="workdays" value="Tuesday" checked> Tuesday</label>
            <label><input type="checkbox" name="workdays" value="Wednesday" checked> Wednesday</label>
            <label><input type="checkbox" name="workdays" value="Thursday" checked> Thursday</label>
            <label><input type="checkbox" name="workdays" value="Friday" checked> Friday</label>
        </fieldset>
        <button type="submit">Draw</button>
    </form>
</body>
</html>
"#;

/// The static upload form served on `/`
pub fn render_index() -> &'static str {
    INDEX_HTML
}

/// Render an assignment as a full HTML page, one `label: value` item per entry
pub fn render_assignment(assignment: &Assignment) -> String {
    let mut html = String::from(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body { font-family: Arial; }
        ul { list-style-type: none; margin: 0; padding: 0; }
    </style>
    <title>Result</title>
</head>
<body>
<ul>
<li>Random selection result</li><br>
"#,
    );

    for (label, value) in assignment.entries() {
        // Writing into a String cannot fail
        let _ = writeln!(
            html,
            "<li>{}: {}</li>",
            escape_html(label),
            escape_html(&value.to_string())
        );
    }

    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

/// Escape text for use inside HTML element content
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
