use async_trait::async_trait;
use common::config::ConfigLoader;
use lambda_runtime::{Error, LambdaEvent};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::GlobalConfig;
use crate::lambda_structure::logging::{apply_verbose_mode, init_lambda_logging};

#[async_trait]
pub trait Lambda {
    type PersistedMemory: Sync + Send;
    type InputBody: DeserializeOwned + Send + Sync + std::fmt::Debug;
    type Output: Serialize + Send + Sync;
    type Error: Into<Error> + std::error::Error + Sync + Send + 'static;

    /// This function should be implemented to return any common connections or state that we want to persist between lambda executions.
    async fn bootstrap() -> Result<Self::PersistedMemory, Self::Error>;

    /// This function should be implemented with the actual business logic of the lambda.
    async fn run(
        payload: Self::InputBody,
        connections: &Self::PersistedMemory,
    ) -> Result<Self::Output, Self::Error>;

    /// A pre-configured main function that will bootstrap an instance of this lambda and start execution. Call this from the top-level main function for a given lambda.
    async fn main() -> Result<(), Error> {
        let (reload_handle, _guard) = init_lambda_logging()?;
        let global_config = ConfigLoader::load_default::<GlobalConfig>()?;

        let reload_handle = &reload_handle;
        let verbose_mode = global_config.verbose_mode;

        // Get a reference to avoid moving the original connections into the below closure.
        let persisted = &Self::bootstrap().await?;

        // Wrap our actual service call so we can pass in our connection data while preserving the expected Lambda signature.
        let service = move |event: LambdaEvent<Self::InputBody>| async move {
            apply_verbose_mode(reload_handle, verbose_mode);
            Self::service(event, persisted).await
        };

        lambda_runtime::run(lambda_runtime::service_fn(service)).await
    }

    /// Service function that is called everytime the lambda executes.
    async fn service(
        event: LambdaEvent<Self::InputBody>,
        connections: &Self::PersistedMemory,
    ) -> Result<Self::Output, Self::Error> {
        let LambdaEvent { payload, context } = event;

        tracing::info!(payload = ?payload, request_id = ?context.request_id, "Execution started");

        Self::run(payload, connections).await
    }
}

#[macro_export]
macro_rules! lambda_main {
    ($lambda: ty) => {
        #[tokio::main]
        async fn main() -> $crate::result::error::LambdaRuntimeResult {
            use $crate::lambda_structure::lambda_trait::Lambda;
            <$lambda>::main().await
        }
    };
}
