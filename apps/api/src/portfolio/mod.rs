//! Portfolio domain: document model, merge engine, persistence gateway,
//! cache invalidation, and the import pipelines.

pub mod cache;
pub mod document;
pub mod forms;
pub mod handlers;
pub mod import;
pub mod prompts;
pub mod section;
pub mod slug;
pub mod store;
pub mod theme;
