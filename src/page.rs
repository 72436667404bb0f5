//! The single HTML page: an editable input field and a read-only output field.

const TITLE: &str = "Matlab Style Checker";
const INPUT_HEADING: &str = "Paste Matlab here:";
const OUTPUT_HEADING: &str = "Style checker:";

/// Escape text for use inside element content or a quoted attribute.
///
/// `\r` becomes a character reference: parsers fold raw CR and CRLF into LF
/// before tokenizing, references are exempt.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the page with `content` in the editable field and `output` in the result field.
///
/// A newline follows each `<textarea>` open tag because HTML parsers drop the
/// first newline there; without it a submission starting with one would lose it.
pub fn render(content: &str, output: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
 <head>
  <meta charset="utf-8">
  <title>{title}</title>
 </head>
 <body>
<h3>{input_heading}</h3>
<form action="/" method="post">
<textarea name="content" rows="40" cols="80">
{content}</textarea>

<input type="submit">
</form>

<h3>{output_heading}</h3>
<textarea id="response" rows="20" cols="80" readonly>
{output}</textarea>
 </body>
</html>
"#,
        title = TITLE,
        input_heading = INPUT_HEADING,
        output_heading = OUTPUT_HEADING,
        content = escape_html(content),
        output = escape_html(output),
    )
}
