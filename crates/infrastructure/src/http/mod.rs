//! HTTP infrastructure utilities.
//!
//! This module provides multipart body building for form submissions.

mod body_builder;

pub use body_builder::{BodyBuildError, build_multipart_form, resolve_path};
