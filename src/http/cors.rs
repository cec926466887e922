//! Cross-origin response decorator
//!
//! Wraps any request handler service and makes
//! `Access-Control-Allow-Origin: *` the first header of every response it
//! produces, whatever the status.

use hyper::header::{HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use hyper::service::Service;
use hyper::{Request, Response};
use std::future::Future;
use std::pin::Pin;

/// Service wrapper adding the allow-all cross-origin header
#[derive(Debug, Clone)]
pub struct AllowAnyOrigin<S> {
    inner: S,
}

impl<S> AllowAnyOrigin<S> {
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AllowAnyOrigin<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<ReqBody>) -> Self::Future {
        let fut = self.inner.call(req);
        Box::pin(async move { fut.await.map(allow_any_origin) })
    }
}

/// Put `Access-Control-Allow-Origin: *` in front of the existing headers
///
/// Status and body are left untouched. An allow-origin header set by the
/// inner handler is replaced rather than duplicated.
pub fn allow_any_origin<B>(mut response: Response<B>) -> Response<B> {
    let previous = std::mem::take(response.headers_mut());

    let mut headers = HeaderMap::with_capacity(previous.len() + 1);
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    let mut current = None;
    for (name, value) in previous {
        // `None` repeats the previous name for multi-valued headers
        if name.is_some() {
            current = name;
        }
        match &current {
            Some(name) if *name == ACCESS_CONTROL_ALLOW_ORIGIN => {}
            Some(name) => {
                headers.append(name.clone(), value);
            }
            None => {}
        }
    }

    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response;
    use http_body_util::{Empty, Full};
    use hyper::body::Bytes;
    use hyper::header::{CONTENT_TYPE, SET_COOKIE};
    use hyper::service::service_fn;
    use hyper::StatusCode;
    use std::convert::Infallible;

    #[test]
    fn test_header_is_first() {
        let original = Response::builder()
            .header(CONTENT_TYPE, "text/plain")
            .header("X-Custom", "1")
            .body(())
            .unwrap();

        let response = allow_any_origin(original);
        let names: Vec<_> = response.headers().keys().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["access-control-allow-origin", "content-type", "x-custom"]
        );
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn test_keeps_multi_valued_headers() {
        let original = Response::builder()
            .header(SET_COOKIE, "a=1")
            .header(SET_COOKIE, "b=2")
            .header(CONTENT_TYPE, "text/plain")
            .body(())
            .unwrap();

        let response = allow_any_origin(original);
        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies, vec!["a=1", "b=2"]);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_replaces_inner_header() {
        let original = Response::builder()
            .header(ACCESS_CONTROL_ALLOW_ORIGIN, "https://example.com")
            .body(())
            .unwrap();

        let response = allow_any_origin(original);
        let values: Vec<_> = response
            .headers()
            .get_all(ACCESS_CONTROL_ALLOW_ORIGIN)
            .iter()
            .collect();
        assert_eq!(values, vec!["*"]);
    }

    #[tokio::test]
    async fn test_wraps_error_responses() {
        let service = AllowAnyOrigin::new(service_fn(|_req: Request<Empty<Bytes>>| async {
            Ok::<_, Infallible>(response::build_404_response())
        }));

        let response = service.call(Request::new(Empty::new())).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let first = response.headers().keys().next().unwrap();
        assert_eq!(*first, ACCESS_CONTROL_ALLOW_ORIGIN);
    }

    #[tokio::test]
    async fn test_body_untouched() {
        let service = AllowAnyOrigin::new(service_fn(|_req: Request<Empty<Bytes>>| async {
            Ok::<_, Infallible>(Response::new(Full::new(Bytes::from_static(b"payload"))))
        }));

        let response = service.call(Request::new(Empty::new())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"payload");
    }
}
