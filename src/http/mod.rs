//! HTTP protocol layer module
//!
//! Response builders, MIME resolution, cache validation and the
//! cross-origin decorator, kept apart from request dispatch.

pub mod body;
pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::ResponseBody;
pub use cors::AllowAnyOrigin;
pub use mime::MimeTable;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_options_response,
    build_redirect_response,
};
