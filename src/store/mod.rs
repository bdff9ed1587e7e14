pub mod document_store;
pub mod memory;
pub mod models;
