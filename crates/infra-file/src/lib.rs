//! Waitline Infrastructure - JSON File Adapter
//!
//! Keeps the whole Store in one JSON document on disk, the same layout as
//! the `queues.json` file earlier deployments used.

mod json_store;

pub use json_store::JsonFileStore;
