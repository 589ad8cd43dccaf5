//! checkwise-panel
//!
//! The CBC parameter intake engine. Pure functions over the domain types in
//! `checkwise-core`, with no network dependency. Owns the parameter schema, unit
//! normalization, data-quality evaluation and the merge policy for values
//! extracted from uploaded reports.

pub mod error;
pub mod merge;
pub mod payload;
pub mod reference;
pub mod registry;
pub mod units;
pub mod validation;

pub use error::{ConversionError, RegistryError};
pub use merge::{ExtractedValue, Extraction, merge};
pub use payload::to_request_body;
pub use registry::{ParameterRegistry, RegistrySource};
pub use units::convert;
pub use validation::{evaluate, is_submittable};
