pub mod http_lambda_main;
pub mod lambda_trait;
pub mod logging;
