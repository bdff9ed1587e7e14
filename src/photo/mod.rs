pub mod carousel;
pub mod db;
pub mod models;
pub mod moderation;
pub mod upload;
