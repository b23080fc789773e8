//! Client seam for the Crucible scientific data-management platform.
//!
//! [`CrucibleApi`] is the synchronous interface the MCP tool layer is written
//! against. [`HttpClient`] implements it as a thin adapter over the Crucible
//! REST API; tests substitute their own implementations.

mod api;
mod error;
mod http;
mod types;

pub use api::{ApiResult, CrucibleApi};
pub use error::ApiError;
pub use http::HttpClient;
pub use types::{DatasetFilter, DatasetUpdate, NewDataset, NewSample, RequestType, SampleFilter};
