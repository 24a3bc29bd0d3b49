use std::{collections::HashMap, error::Error};

use rusoto_dynamodb::AttributeValue;
use serde::Deserialize;

/// Lets generic helpers build the catch-all variant of a repository error.
pub trait UnknownError {
    fn unknown<E: Error + Sync + Send + 'static>(e: E, context: Option<&'static str>) -> Self;
}

#[macro_export]
macro_rules! impl_unknown_error_trait {
    ($struct: ident) => {
        impl $crate::deserialize::UnknownError for $struct {
            fn unknown<E: std::error::Error + Sync + Send + 'static>(
                e: E,
                context: Option<&'static str>,
            ) -> Self {
                match context {
                    Some(ctx) => Self::Unknown(anyhow::anyhow!(e).context(ctx)),
                    None => Self::Unknown(anyhow::anyhow!(e)),
                }
            }
        }
    };
}

pub fn deserialize_from_dynamo<'a, O: Deserialize<'a>, E: UnknownError>(
    dynamo_object: HashMap<String, AttributeValue>,
) -> Result<O, E> {
    serde_dynamo::from_item(dynamo_object)
        .map_err(|e| E::unknown(e, Some("Error deserializing record")))
}
