//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, then the
//! static file responder.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http::{self, ResponseBody};
use crate::logger;
use hyper::header::{HeaderValue, IF_MODIFIED_SINCE, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<ResponseBody>, Infallible> {
    let (parts, _) = req.into_parts();
    let method = &parts.method;

    let mut response = match check_http_method(method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: parts.uri.path(),
                query: parts.uri.query(),
                is_head: *method == Method::HEAD,
                if_modified_since: parts
                    .headers
                    .get(IF_MODIFIED_SINCE)
                    .and_then(|v| v.to_str().ok()),
            };
            static_files::serve_path(&ctx, &state).await
        }
    };

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }
    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<ResponseBody>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(method.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::header::{ALLOW, CONTENT_TYPE};
    use hyper::StatusCode;

    fn state_for(root: &std::path::Path) -> Arc<AppState> {
        let mut cfg = Config::default();
        cfg.server.root = root.to_string_lossy().into_owned();
        Arc::new(AppState::new(cfg).unwrap())
    }

    fn request(method: Method, uri: &str) -> Request<Empty<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Empty::new())
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_html_and_wasm() {
        let dir = tempfile::tempdir().unwrap();
        let wasm: Vec<u8> = (0..=255).collect();
        std::fs::write(dir.path().join("a.html"), "<p>hi</p>").unwrap();
        std::fs::write(dir.path().join("b.wasm"), &wasm).unwrap();
        let state = state_for(dir.path());

        let response = handle_request(request(Method::GET, "/a.html"), Arc::clone(&state))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"<p>hi</p>");

        let response = handle_request(request(Method::GET, "/b.wasm?cache=bust"), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/wasm");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], &wasm[..]);
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let response = handle_request(request(Method::POST, "/"), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET, HEAD, OPTIONS");
    }

    #[tokio::test]
    async fn test_options() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let response = handle_request(request(Method::OPTIONS, "/b.wasm"), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_server_header() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_for(dir.path());

        let response = handle_request(request(Method::GET, "/missing"), state)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers()[SERVER]
            .to_str()
            .unwrap()
            .starts_with("devserve/"));
    }
}
