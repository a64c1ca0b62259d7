//! Host page for the browser build.

/// Render the `index.html` that loads and starts the generated module.
///
/// The page is fixed apart from the title and the module file name, so
/// repeated builds produce identical bytes.
pub fn generate_host_page(title: &str, module_file: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        html, body {{ margin: 0; padding: 0; height: 100%; background: #1e1e1e; }}
        canvas {{ display: block; width: 100%; height: 100%; }}
    </style>
</head>
<body>
    <script type="module">
        import init from "./{module}";

        init().catch((err) => console.error("failed to initialize {name}:", err));
    </script>
</body>
</html>
"#,
        title = escape_html(title),
        module = escape_js(module_file),
        name = escape_js(module_file.trim_end_matches(".js")),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

// Module names land inside a JS string literal within a <script> element.
fn escape_js(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '<' => out.push_str("\\u003c"),
            _ => out.push(ch),
        }
    }
    out
}
