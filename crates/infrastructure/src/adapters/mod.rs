//! Adapters for external services.

mod reqwest_client;

pub use reqwest_client::{AUTH_HEADER, ReqwestHttpClient};
