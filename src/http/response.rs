//! HTTP response building module
//!
//! Provides builders for the responses the file server emits. None of these
//! set the cross-origin header; that is added to every response by
//! [`crate::http::cors::AllowAnyOrigin`].

use super::body::{empty, full, ResponseBody};
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED, LOCATION};
use hyper::{Response, StatusCode};

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Build an HTML error page for `status`
pub fn build_error_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
    let code = status.as_u16();
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<!DOCTYPE HTML>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Error response</title>\n\
         </head>\n\
         <body>\n\
         <h1>Error response</h1>\n\
         <p>Error code: {code}</p>\n\
         <p>Message: {}.</p>\n\
         <p>Error code explanation: {code} - {reason}.</p>\n\
         </body>\n\
         </html>\n",
        html_escape(message)
    );

    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, body.len())
        .body(full(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<ResponseBody> {
    build_error_response(StatusCode::NOT_FOUND, "File not found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(method: &str) -> Response<ResponseBody> {
    let mut response = build_error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &format!("Unsupported method ('{method}')"),
    );
    response
        .headers_mut()
        .insert(ALLOW, hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, ALLOWED_METHODS)
        .header("Access-Control-Allow-Methods", ALLOWED_METHODS)
        .header("Access-Control-Allow-Headers", "*")
        .header("Access-Control-Max-Age", "86400")
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            fallback(StatusCode::NO_CONTENT)
        })
}

/// Build 301 redirect, used to add the trailing slash to directory URLs
pub fn build_redirect_response(location: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header(LOCATION, location)
        .header(CONTENT_LENGTH, 0)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            fallback(StatusCode::MOVED_PERMANENTLY)
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(last_modified: &str) -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(LAST_MODIFIED, last_modified)
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            fallback(StatusCode::NOT_MODIFIED)
        })
}

/// Build generic HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<ResponseBody> {
    let content_length = content.len();
    let body = if is_head { empty() } else { full(content) };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, HTML_CONTENT_TYPE)
        .header(CONTENT_LENGTH, content_length)
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            fallback(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

/// Build a file response
///
/// `content_length` is the file size. For HEAD the caller passes an empty
/// body and the header still carries the size.
pub fn build_file_response(
    body: ResponseBody,
    content_length: u64,
    content_type: &str,
    last_modified: Option<&str>,
) -> Response<ResponseBody> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, content_type)
        .header(CONTENT_LENGTH, content_length);
    if let Some(last_modified) = last_modified {
        builder = builder.header(LAST_MODIFIED, last_modified);
    }

    builder.body(body).unwrap_or_else(|e| {
        log_build_error("200", &e);
        fallback(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn fallback(status: StatusCode) -> Response<ResponseBody> {
    let mut response = Response::new(empty());
    *response.status_mut() = status;
    response
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<ResponseBody>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_404_body() {
        let response = build_404_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], HTML_CONTENT_TYPE);
        let body = body_string(response).await;
        assert!(body.contains("Error code: 404"));
        assert!(body.contains("File not found"));
    }

    #[tokio::test]
    async fn test_405_escapes_method() {
        let response = build_405_response("<BREW>");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], ALLOWED_METHODS);
        let body = body_string(response).await;
        assert!(body.contains("&lt;BREW&gt;"));
        assert!(!body.contains("<BREW>"));
    }

    #[tokio::test]
    async fn test_head_file_response_keeps_length() {
        let response = build_file_response(
            empty(),
            8,
            "application/wasm",
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
        );
        assert_eq!(response.headers()[CONTENT_LENGTH], "8");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/wasm");
        assert_eq!(
            response.headers()[LAST_MODIFIED],
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
        assert!(body_string(response).await.is_empty());
    }

    #[test]
    fn test_redirect() {
        let response = build_redirect_response("/assets/");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()[LOCATION], "/assets/");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }
}
