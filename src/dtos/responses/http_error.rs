use serde::Deserialize;

/// Body of the error responses built by [`crate::http::errors`].
#[derive(Deserialize, Debug)]
pub struct LambdaErrorResponse {
    pub code: String,
    pub message: String,
}
