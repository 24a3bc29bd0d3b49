pub mod config;
pub mod dtos;
pub mod http;
pub mod lambda_structure;
pub mod notifications;
pub mod result;
