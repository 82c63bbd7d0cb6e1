//! The narrow HTTP/1.0 grammar the proxy speaks.
//!
//! This is deliberately not a general HTTP parser: the client side
//! accepts exactly one request shape (`GET <path> HTTP/1.0` plus a
//! `Host:` line) and the origin side scrapes three well-known headers
//! out of a raw response. Anything outside that grammar is rejected
//! or ignored.

pub mod date;
pub mod request;
pub mod response;

pub use date::{DateClassification, DateError};
pub use request::{ClientRequest, RequestError};
pub use response::ResponseHeaders;
