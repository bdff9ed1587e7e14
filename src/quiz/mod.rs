pub mod admin;
pub mod bank;
pub mod db;
pub mod feed;
pub mod guest;
pub mod models;
pub mod practice;
pub mod projector;
pub mod tally;
