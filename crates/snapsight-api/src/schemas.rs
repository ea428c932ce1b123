//! Wire schemas for the analysis service
//!
//! # Organization
//!
//! - [`request`] - The multipart payload sent to the service
//! - [`response`] - The JSON document returned by the service
//!
//! Common types are re-exported at the module level for convenience.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
