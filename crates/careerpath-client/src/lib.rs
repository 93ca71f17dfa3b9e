//! careerpath-client — talking to the careerpath backend.
//!
//! Implements the `StudentApi` and `AdminApi` traits over HTTP, loads client
//! configuration, and ships an in-memory backend for tests.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{load_config, load_config_from, ClientConfig};
pub use http::HttpApi;
pub use mock::MockApi;
