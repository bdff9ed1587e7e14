pub mod image_host_client;
pub mod image_host_error;
