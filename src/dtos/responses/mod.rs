pub mod http_error;
pub mod status_response;
