//! HTTP/1.x types: request parsing, response serialization, request
//! verification (§4.4-§4.5).

pub mod request;
pub mod response;
pub mod verify;

pub use request::{HttpVersion, Method, Request};
pub use response::{error_response, Response};
