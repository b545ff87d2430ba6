pub mod db;
pub mod json_store;
pub mod store;

pub use json_store::JsonReviewStore;
pub use store::{MemoryReviewStore, ReviewStore, SqliteReviewStore};
