use std::collections::HashMap;

use lambda_http::{Body, Request, RequestExt};

/// Builds a function URL style request carrying the given query string.
pub fn build_request_with_query(params: &[(&str, &str)]) -> Request {
    let query: HashMap<String, String> = params
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();

    Request::new(Body::Empty).with_query_string_parameters(query)
}
