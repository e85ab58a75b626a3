//! Response types captured from the service under test.

mod spec;

pub use spec::{ResponseSpec, StatusCode};
