//! Request types: method, headers, multipart form and the request spec.

mod form;
mod header;
mod method;
mod spec;

pub use form::{FormData, FormField, FormValue};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use spec::RequestSpec;
