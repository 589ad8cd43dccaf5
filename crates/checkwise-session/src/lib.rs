//! checkwise-session
//!
//! One user's intake session: the observable parameter record, the
//! validate-then-predict submission pipeline and result shaping.

pub mod error;
pub mod pipeline;
pub mod registry;
pub mod results;
pub mod session;

pub use error::{SessionError, SubmissionError};
pub use pipeline::{SubmissionPhase, SubmissionPipeline, SubmissionState};
pub use registry::{load_or_degraded, load_registry};
pub use results::{aggregate, assess_reliability};
pub use session::{RecordSnapshot, Session};
