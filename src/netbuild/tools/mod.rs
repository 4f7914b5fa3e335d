pub mod build;
pub mod diagnostics;
pub mod error;
pub mod ingest;
pub mod io;
pub mod model;
pub mod net;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod validate;

pub use error::{Result, ToolError};
