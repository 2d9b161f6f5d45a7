pub mod client_request;
pub mod server_message;
