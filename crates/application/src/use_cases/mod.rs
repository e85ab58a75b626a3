//! Application use cases (harness orchestration).

mod collection_session;
mod compare_request;

pub use collection_session::CollectionSession;
pub use compare_request::{CompareOutcome, CompareRequest};
