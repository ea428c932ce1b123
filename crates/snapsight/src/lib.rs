#![warn(missing_docs)]

//! # Snapsight

/// Session state machine, event controller and rendering
pub use snapsight_core::*;

/// HTTP client and wire schemas of the analysis service
pub mod api {
    pub use snapsight_api::*;
}
