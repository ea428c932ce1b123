pub mod client;
pub mod error;
pub mod schemas;

pub use client::{Client, ClientBuilder};
pub use error::ClientError;
pub use reqwest::{StatusCode, Url};
