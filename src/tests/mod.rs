pub mod support;

mod identity;
mod memory_store;
mod message;
