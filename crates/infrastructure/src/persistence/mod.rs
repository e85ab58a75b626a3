//! Persistence adapters: file system access and fixture storage.

mod file_system;
mod fixture_store;

pub use file_system::TokioFileSystem;
pub use fixture_store::FileFixtureStore;
