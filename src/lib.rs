pub mod auth;
pub mod client;
pub mod common;
pub mod config;
pub mod message;
pub mod photo;
pub mod quiz;
pub mod rehearsal;
pub mod store;
pub mod system_log;

#[cfg(test)]
mod tests;
