//! Ski-resort trail graph maintenance.
//!
//! Loads a lift/run network stored as JSON, renames ambiguous endpoints to `<name> Top` /
//! `<name> Bottom` from a CSV of elevations, and checks documents for structural problems.

pub mod config;
pub mod elevation;
pub mod error;
pub mod graph;
pub mod labeler;
pub mod pipeline;
pub mod stats;
pub mod store;
pub mod validator;

pub use config::Config;
pub use error::{Error, Result};
pub use graph::{Edge, Graph, Node};
pub use pipeline::{ApplyOptions, ApplyOutcome};
