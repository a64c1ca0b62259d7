//! HTML listings for directories without an `index.html`.

use std::path::{Path, PathBuf};

use axum::response::Html;

/// Render a listing of the directory that `uri_path` names under `root`.
///
/// Returns `None` when the path does not name a readable directory, or when
/// it contains segments that could escape `root`.
pub(crate) async fn render(root: &Path, uri_path: &str) -> Option<Html<String>> {
    let dir = resolve(root, uri_path)?;
    let mut read_dir = tokio::fs::read_dir(&dir).await.ok()?;

    let mut entries = Vec::new();
    loop {
        let entry = match read_dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::debug!("stopped listing {}: {}", dir.display(), e);
                break;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        // Follow symlinks, matching what the file server will serve.
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        entries.push(if is_dir { format!("{}/", name) } else { name });
    }
    entries.sort();

    Some(Html(page(uri_path, &entries)))
}

/// Map a request path onto the filesystem.
///
/// Percent-encoded segments are not decoded; such requests get no listing.
fn resolve(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let mut dir = root.to_path_buf();
    for segment in uri_path.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." || segment.contains(['%', '\\']) {
            return None;
        }
        dir.push(segment);
    }
    Some(dir)
}

fn page(uri_path: &str, entries: &[String]) -> String {
    let title = escape(uri_path);
    let mut items = String::new();
    if uri_path != "/" {
        items.push_str("    <li><a href=\"../\">../</a></li>\n");
    }
    for entry in entries {
        let entry = escape(entry);
        items.push_str(&format!("    <li><a href=\"{0}\">{0}</a></li>\n", entry));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Index of {title}</title>
</head>
<body>
  <h1>Index of {title}</h1>
  <ul>
{items}  </ul>
</body>
</html>
"#
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
