/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses as parsed JSON
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod market;

pub use error::{OceanError, Result};

pub use client::{ClientConfig, OceanClient};
