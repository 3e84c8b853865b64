//! Directory listing module
//!
//! Renders a minimal HTML index for directories without an index file.

use std::io;
use std::path::Path;

use html_escape::{encode_double_quoted_attribute, encode_text};
use tokio::fs;

/// Render the listing for `dir`, which must live under `root`.
///
/// Entries are name-sorted and directories carry a trailing `/`. Links are
/// relative, which is why directory URLs are redirected to their
/// trailing-slash form before reaching this point.
pub async fn render(root: &Path, dir: &Path) -> io::Result<String> {
    let mut names: Vec<String> = Vec::new();

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await.is_ok_and(|t| t.is_dir()) {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let shown = dir.strip_prefix(root).unwrap_or(dir);
    let mut title = format!("/{}", shown.display());
    if !title.ends_with('/') {
        title.push('/');
    }
    let title = encode_text(&title);

    let mut items = String::new();
    for name in &names {
        items.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            encode_double_quoted_attribute(name),
            encode_text(name),
        ));
    }

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html lang=\"es\">\n\
         <head><meta charset=\"utf-8\"><title>Índice de {title}</title></head>\n\
         <body>\n\
         <h1>Índice de {title}</h1>\n\
         <hr>\n\
         <ul>\n{items}</ul>\n\
         <hr>\n\
         </body>\n\
         </html>\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    #[tokio::test]
    async fn listing_contains_sorted_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std_fs::write(root.join("b.txt"), "b").unwrap();
        std_fs::write(root.join("a.txt"), "a").unwrap();
        std_fs::create_dir(root.join("sub")).unwrap();

        let html = render(&root, &root).await.unwrap();

        let a = html.find("a.txt").unwrap();
        let b = html.find("b.txt").unwrap();
        assert!(a < b);
        assert!(html.contains("href=\"sub/\""));
        assert!(html.contains("Índice de /"));
    }

    #[tokio::test]
    async fn listing_escapes_names() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std_fs::write(root.join("a<b>.txt"), "x").unwrap();

        let html = render(&root, &root).await.unwrap();

        // Displayed name is escaped; the quoted href cannot break out of
        // its attribute because quotes themselves are escaped.
        assert!(html.contains(">a&lt;b&gt;.txt</a>"));
    }

    #[tokio::test]
    async fn listing_of_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert!(render(&root, &root.join("nope")).await.is_err());
    }
}
