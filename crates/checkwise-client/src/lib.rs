//! checkwise-client
//!
//! Boundary to the external prediction service: parameter metadata,
//! server-side validation, prediction, report extraction.

pub mod document;
pub mod error;
pub mod http;
pub mod service;

pub use document::{Document, DocumentKind};
pub use error::ClientError;
pub use http::HttpDiagnosisService;
pub use service::{BoxFuture, DiagnosisService};
