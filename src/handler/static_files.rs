//! Static file serving module
//!
//! Maps a decoded request path onto the root directory and builds the
//! response: the file itself, an index file or listing for directories,
//! or the 404/500 fallbacks.

use std::path::{Component, Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::cli::ServeContext;
use crate::handler::listing;
use crate::http::{self, mime};
use crate::logger;

/// Index files probed when a directory is requested, in order.
const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Outcome of mapping a request path onto the filesystem.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// A regular file to send back.
    File(PathBuf),
    /// A directory requested without its trailing slash.
    Redirect(String),
    /// A directory with no index file: render its entries.
    Listing(PathBuf),
    /// Nothing servable. Traversal attempts land here on purpose.
    NotFound,
}

/// Serve a decoded request path from the root directory.
pub async fn serve(
    ctx: &ServeContext,
    decoded: &str,
    raw_path: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match resolve(&ctx.root, decoded, raw_path) {
        Resolved::File(path) => send_file(&path, is_head).await,
        Resolved::Redirect(target) => http::build_redirect_response(&target),
        Resolved::Listing(dir) => match listing::render(&ctx.root, &dir).await {
            Ok(html) => http::build_html_response(html, is_head),
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to list directory '{}': {e}",
                    dir.display()
                ));
                http::build_500_response()
            }
        },
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Map a decoded request path to a filesystem location under `root`.
///
/// `root` must already be canonical. The decoded path is normalized
/// lexically first, so `..` can never climb above the root, then the
/// joined result is canonicalized and checked to still live under `root`,
/// so symlinks cannot escape either. Both rejections answer 404: probing
/// cannot distinguish "outside the root" from "absent".
///
/// Directory policy: a directory URL without its trailing slash is
/// redirected to the slash form; with it, `index.html`/`index.htm` is
/// served when present, otherwise the generated listing.
pub fn resolve(root: &Path, decoded: &str, raw_path: &str) -> Resolved {
    let Some(relative) = normalize(decoded) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {decoded}"));
        return Resolved::NotFound;
    };

    let joined = root.join(relative);

    // Canonicalization resolves symlinks; a missing file also fails here.
    let Ok(canonical) = joined.canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        logger::log_warning(&format!("Path traversal attempt blocked: {decoded}"));
        return Resolved::NotFound;
    }

    if canonical.is_dir() {
        if !raw_path.ends_with('/') {
            return Resolved::Redirect(format!("{raw_path}/"));
        }
        for index in INDEX_FILES {
            let candidate = canonical.join(index);
            if candidate.is_file() {
                return Resolved::File(candidate);
            }
        }
        return Resolved::Listing(canonical);
    }

    if canonical.is_file() {
        Resolved::File(canonical)
    } else {
        // Sockets, FIFOs and friends are not servable
        Resolved::NotFound
    }
}

/// Lexically normalize a decoded request path into a relative path.
///
/// `.` segments are dropped, root and prefix components are ignored rather
/// than honored, and a `..` that would climb above the request root returns
/// `None`.
fn normalize(decoded: &str) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();

    for component in Path::new(decoded).components() {
        match component {
            Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::Normal(part) => parts.push(part),
        }
    }

    Some(parts.iter().collect())
}

/// Read a resolved file and build the 200 response.
///
/// The file handle lives inside `fs::read`, so it is released on every
/// path; a failed read after successful resolution maps to 500.
async fn send_file(path: &Path, is_head: bool) -> Response<Full<Bytes>> {
    match fs::read(path).await {
        Ok(content) => {
            let content_type = mime::content_type_for(path.extension().and_then(|e| e.to_str()));
            http::build_file_response(Bytes::from(content), content_type, is_head)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    /// Root with `index.html`, `style.css`, `docs/` (with its own index),
    /// `media/` (no index) and a `secret.txt` one level above the root.
    fn fixture() -> (tempfile::TempDir, PathBuf) {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("www");
        std_fs::create_dir(&root).unwrap();

        std_fs::write(root.join("index.html"), "<p>hi</p>").unwrap();
        std_fs::write(root.join("style.css"), "body {}").unwrap();
        std_fs::create_dir(root.join("docs")).unwrap();
        std_fs::write(root.join("docs/index.html"), "docs").unwrap();
        std_fs::create_dir(root.join("media")).unwrap();
        std_fs::write(root.join("media/clip.bin"), [0u8, 1, 2]).unwrap();
        std_fs::write(outer.path().join("secret.txt"), "secreto").unwrap();

        let canonical_root = root.canonicalize().unwrap();
        (outer, canonical_root)
    }

    #[test]
    fn existing_file_resolves() {
        let (_outer, root) = fixture();
        assert_eq!(
            resolve(&root, "/style.css", "/style.css"),
            Resolved::File(root.join("style.css"))
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_outer, root) = fixture();
        assert_eq!(
            resolve(&root, "/missing.txt", "/missing.txt"),
            Resolved::NotFound
        );
    }

    #[test]
    fn parent_escape_is_not_found() {
        let (_outer, root) = fixture();
        // secret.txt exists one level above the root but must stay hidden
        assert_eq!(
            resolve(&root, "/../secret.txt", "/../secret.txt"),
            Resolved::NotFound
        );
        assert_eq!(
            resolve(&root, "/docs/../../secret.txt", "/docs/../../secret.txt"),
            Resolved::NotFound
        );
    }

    #[test]
    fn inner_parent_segments_stay_inside() {
        let (_outer, root) = fixture();
        assert_eq!(
            resolve(&root, "/docs/../style.css", "/docs/../style.css"),
            Resolved::File(root.join("style.css"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_is_not_found() {
        let (outer, root) = fixture();
        std::os::unix::fs::symlink(outer.path().join("secret.txt"), root.join("link.txt"))
            .unwrap();
        assert_eq!(resolve(&root, "/link.txt", "/link.txt"), Resolved::NotFound);
    }

    #[test]
    fn directory_without_slash_redirects() {
        let (_outer, root) = fixture();
        assert_eq!(
            resolve(&root, "/docs", "/docs"),
            Resolved::Redirect("/docs/".to_string())
        );
    }

    #[test]
    fn directory_with_index_serves_it() {
        let (_outer, root) = fixture();
        assert_eq!(
            resolve(&root, "/docs/", "/docs/"),
            Resolved::File(root.join("docs/index.html"))
        );
        assert_eq!(
            resolve(&root, "/", "/"),
            Resolved::File(root.join("index.html"))
        );
    }

    #[test]
    fn directory_without_index_lists() {
        let (_outer, root) = fixture();
        assert_eq!(
            resolve(&root, "/media/", "/media/"),
            Resolved::Listing(root.join("media"))
        );
    }

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(normalize("/a/./b"), Some(PathBuf::from("a/b")));
        assert_eq!(normalize("/a/b/../c"), Some(PathBuf::from("a/c")));
        assert_eq!(normalize("/"), Some(PathBuf::new()));
    }

    #[test]
    fn normalize_rejects_climbing_out() {
        assert_eq!(normalize("/.."), None);
        assert_eq!(normalize("/../etc/passwd"), None);
        assert_eq!(normalize("/a/../../etc/passwd"), None);
    }

    #[tokio::test]
    async fn serve_returns_file_body() {
        use http_body_util::BodyExt;

        let (_outer, root) = fixture();
        let ctx = ServeContext { root, port: 8000 };

        let resp = serve(&ctx, "/index.html", "/index.html", false).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "text/html; charset=utf-8"
        );
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "9");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<p>hi</p>");
    }

    #[tokio::test]
    async fn head_gets_headers_without_body() {
        use http_body_util::BodyExt;

        let (_outer, root) = fixture();
        let ctx = ServeContext { root, port: 8000 };

        let resp = serve(&ctx, "/index.html", "/index.html", true).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers().get("Content-Length").unwrap(), "9");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn serve_unknown_extension_is_octet_stream() {
        let (_outer, root) = fixture();
        let ctx = ServeContext { root, port: 8000 };

        let resp = serve(&ctx, "/media/clip.bin", "/media/clip.bin", false).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn serve_missing_is_404() {
        let (_outer, root) = fixture();
        let ctx = ServeContext { root, port: 8000 };

        let resp = serve(&ctx, "/missing.txt", "/missing.txt", false).await;
        assert_eq!(resp.status(), 404);
    }
}
