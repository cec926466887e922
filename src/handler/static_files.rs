//! Static file serving module
//!
//! Maps request paths onto the served root and builds file, redirect and
//! directory responses.

use crate::config::AppState;
use crate::handler::listing;
use crate::handler::router::RequestContext;
use crate::http::{self, body, cache, ResponseBody};
use crate::logger;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};

/// Translate a URL path into a filesystem path under `root`
///
/// The path is percent-decoded and normalized segment by segment: empty and
/// `.` segments are skipped, `..` removes the previous segment. Returns
/// `None` when a `..` would climb above `root`, the path is not valid UTF-8,
/// or a segment contains a NUL byte.
pub fn translate_path(root: &Path, url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s if s.contains('\0') => return None,
            #[cfg(windows)]
            s if s.contains('\\') || s.contains(':') => return None,
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    Some(path)
}

/// Check that an existing path still lies under `root` once symlinks are
/// resolved. Missing paths are reported as outside.
async fn is_within_root(root: &Path, path: &Path, url_path: &str) -> bool {
    let Ok(canonical) = fs::canonicalize(path).await else {
        return false;
    };
    if canonical.starts_with(root) {
        return true;
    }
    logger::log_warning(&format!(
        "Path traversal attempt blocked: {} -> {}",
        url_path,
        canonical.display()
    ));
    false
}

/// Serve the request path from the configured root directory
pub async fn serve_path(ctx: &RequestContext<'_>, state: &AppState) -> Response<ResponseBody> {
    let Some(path) = translate_path(&state.root, ctx.path) else {
        logger::log_warning(&format!("Rejected request path: {}", ctx.path));
        return http::build_404_response();
    };
    if !is_within_root(&state.root, &path, ctx.path).await {
        return http::build_404_response();
    }
    let Ok(metadata) = fs::metadata(&path).await else {
        return http::build_404_response();
    };

    if metadata.is_dir() {
        serve_directory(ctx, state, &path).await
    } else if ctx.path.ends_with('/') {
        // A file cannot be a directory
        http::build_404_response()
    } else {
        serve_file(ctx, state, &path).await
    }
}

/// Serve a directory: redirect to the slash form, then index file, then listing
async fn serve_directory(
    ctx: &RequestContext<'_>,
    state: &AppState,
    dir: &Path,
) -> Response<ResponseBody> {
    if !ctx.path.ends_with('/') {
        // A leading `//` would make the Location protocol-relative
        let path = format!("/{}", ctx.path.trim_start_matches('/'));
        let location = match ctx.query {
            Some(query) => format!("{path}/?{query}"),
            None => format!("{path}/"),
        };
        return http::build_redirect_response(&location);
    }

    for index_file in &state.config.http.index_files {
        let index_path = dir.join(index_file);
        if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
            if !is_within_root(&state.root, &index_path, ctx.path).await {
                return http::build_404_response();
            }
            return serve_file(ctx, state, &index_path).await;
        }
    }

    if !state.config.http.directory_listing {
        return http::build_404_response();
    }

    let display_path = percent_decode_str(ctx.path).decode_utf8_lossy();
    match listing::list_directory(dir, &display_path).await {
        Ok(html) => http::response::build_html_response(html, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {}",
                dir.display(),
                e
            ));
            http::response::build_error_response(
                hyper::StatusCode::NOT_FOUND,
                "No permission to list directory",
            )
        }
    }
}

/// Serve a single regular file, streaming its content
pub async fn serve_file(
    ctx: &RequestContext<'_>,
    state: &AppState,
    file_path: &Path,
) -> Response<ResponseBody> {
    let file = match File::open(file_path).await {
        Ok(f) => f,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to open file '{}': {}",
                file_path.display(),
                e
            ));
            return http::build_404_response();
        }
    };
    let metadata = match file.metadata().await {
        Ok(m) => m,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to stat file '{}': {}",
                file_path.display(),
                e
            ));
            return http::build_404_response();
        }
    };

    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);

    if let (Some(modified), Some(last_modified)) = (modified, last_modified.as_deref()) {
        if cache::is_not_modified(ctx.if_modified_since, modified) {
            return http::build_304_response(last_modified);
        }
    }

    let content_type = state.mime.resolve_path(file_path);
    let body = if ctx.is_head {
        body::empty()
    } else {
        body::file_stream(file)
    };
    http::response::build_file_response(
        body,
        metadata.len(),
        content_type,
        last_modified.as_deref(),
    )
}
