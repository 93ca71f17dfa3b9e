//! careerpath-core — data model, status tables, drafts and the API contract.
//!
//! This crate holds everything the careerpath client knows without talking
//! to the backend: the JSON shapes, the status label and action tables, the
//! role gate, draft editing and validation, and answer review.

pub mod draft;
pub mod error;
pub mod model;
pub mod review;
pub mod session;
pub mod status;
pub mod traits;

pub use error::{ApiError, DraftError};
pub use traits::{AdminApi, CareerApi, StudentApi};
