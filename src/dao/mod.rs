/// Database model definitions.
pub mod models;
/// Storage error types shared by every backend.
pub mod storage;
/// Storage abstraction and its backends.
pub mod store;
