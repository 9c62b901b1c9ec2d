pub mod cache;
pub mod combined_table;
pub mod error;
pub mod loader;
pub mod overrides;
pub mod sampling;
pub mod timestamp;
