use std::str::FromStr;

use http::Response;
use lambda_http::{Request, RequestExt};

use crate::http::errors::validation_error_response;

pub type HttpLambdaResponse = Result<Response<String>, Response<String>>;

// This macro is intended for lambdas that are invoked through an HTTP endpoint (a Lambda function
// URL or the ApiGateway, internally named 'http lambdas'). It is used to reduce boilerplate, to
// preserve state between executions and to take advantage of the `?` operator.
//
// When using this macro, an error can be returned as a HTTP response using the `?` operator.
//
// This macro supports request validation as a third parameter. Validations run before the
// business logic is executed and have the signature `Fn(&Request) -> Result<(), Response<String>>`.
//
// Example usage:
// ```
// http_lambda_main!(
// { .. State },
// main_fn,
// [
//   validation_1,
//   validation_2,
//   ..
//   validation_n
// ]
// )
// ```
#[macro_export]
macro_rules! http_lambda_main {
    ($persisted_block:block, $handler: ident) => {
        http_lambda_main!($persisted_block, $handler, []);
    };
    ($persisted_block:block, $handler: ident, [$($validation:ident),*]) => {
        #[tokio::main]
        async fn main() -> Result<(), Error> {
            use common::config::ConfigLoader;
            use http::Response;
            use lambda_http::request::RequestContext;
            use lambda_http::{Body, RequestExt};
            use deploy_notifications::config::GlobalConfig;
            use deploy_notifications::lambda_structure::logging::{
                apply_verbose_mode, init_lambda_logging,
            };

            let (reload_handle, _guard) = init_lambda_logging()?;
            let global_config = ConfigLoader::load_default::<GlobalConfig>()?;

            let persisted = { $persisted_block };

            let service = |request: Request| async {
                apply_verbose_mode(&reload_handle, global_config.verbose_mode);

                let payload = match request.body() {
                    Body::Empty => "No Payload".to_owned(),
                    Body::Text(text) => text.clone(),
                    Body::Binary(bytes) => format!("{} bytes", bytes.len()),
                };
                let context = request.extensions().get::<RequestContext>();
                let query = request.query_string_parameters();
                tracing::info!(
                    payload = ?payload,
                    query = ?query,
                    context = ?context,
                    "Execution started"
                );

                $(
                if let Err(response) = $validation(&request) {
                    return Ok(response);
                }
                )*

                let response: Result<Response<String>, Error> =
                    match $handler(request, &persisted).await {
                        Ok(response) => Ok(response),
                        Err(response) => Ok(response),
                    };

                response
            };

            run(service_fn(service)).await
        }
    };
}

pub trait RequestExtractor {
    fn extract_query_param<T: FromStr>(&self, param_name: &str)
        -> Result<T, RequestExtractorError>;
}

impl RequestExtractor for Request {
    fn extract_query_param<T: FromStr>(
        &self,
        param_name: &str,
    ) -> Result<T, RequestExtractorError> {
        let query = self.query_string_parameters();
        match query.first(param_name) {
            None => Err(RequestExtractorError::QueryParamNotFoundError(
                param_name.to_owned(),
            )),
            Some(value) => T::from_str(value).map_err(|_| {
                RequestExtractorError::QueryParamWithWrongTypeError(param_name.to_owned())
            }),
        }
    }
}

#[derive(Debug)]
pub enum RequestExtractorError {
    QueryParamNotFoundError(String),
    QueryParamWithWrongTypeError(String),
}

impl From<RequestExtractorError> for Response<String> {
    fn from(error: RequestExtractorError) -> Self {
        match error {
            RequestExtractorError::QueryParamNotFoundError(param_name) => {
                validation_error_response(format!("{param_name} not found in query string"), None)
            }
            RequestExtractorError::QueryParamWithWrongTypeError(param_name) => {
                validation_error_response(
                    format!("{param_name} with wrong type in query string"),
                    None,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use common::test_tools::http::helpers::build_request_with_query;
    use lambda_http::http::StatusCode;

    use super::{RequestExtractor, RequestExtractorError};

    #[test]
    fn extracts_query_param() {
        let request = build_request_with_query(&[("action", "approve")]);

        let action: String = request.extract_query_param("action").unwrap();

        assert_eq!("approve", action);
    }

    #[test]
    fn missing_query_param_is_a_validation_error() {
        let request = build_request_with_query(&[]);

        let error = request.extract_query_param::<String>("project_name").unwrap_err();

        assert!(matches!(
            error,
            RequestExtractorError::QueryParamNotFoundError(_)
        ));
        let response: http::Response<String> = error.into();
        assert_eq!(StatusCode::BAD_REQUEST, response.status());
        assert!(response.body().contains("project_name not found in query string"));
    }

    #[test]
    fn wrongly_typed_query_param_is_reported() {
        let request = build_request_with_query(&[("limit", "many")]);

        let error = request.extract_query_param::<u32>("limit").unwrap_err();

        assert!(matches!(
            error,
            RequestExtractorError::QueryParamWithWrongTypeError(_)
        ));
    }
}
