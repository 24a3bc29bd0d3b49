pub mod aws_client_config;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum::{Display, EnumIter};

#[derive(Default, Serialize, Deserialize, Clone, Eq, PartialEq, EnumIter, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Local,
    #[default]
    Development,
    QA,
    Staging,
    Production,
}

pub type ConfigResult<T> = Result<T, envy::Error>;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the configuration a handler runs with.
    ///
    /// This will load the following files, in order:
    /// - OS environment variables
    /// - `.env.development.local` then `.env.development`
    /// - `.env.qa.local` then `.env.qa`
    /// - `.env.staging.local` then `.env.staging`
    /// - `.env.production.local` then `.env.production`
    /// - `.env.local`
    /// - `.env`
    ///
    /// If a variable is set in the OS environment, it will not be
    /// overriden by any file.
    pub fn load_default<TConfig>() -> ConfigResult<TConfig>
    where
        TConfig: DeserializeOwned,
    {
        for environment in Environment::iter() {
            if environment != Environment::Local {
                dotenv::from_filename(format!(".env.{}.local", environment)).ok();
                dotenv::from_filename(format!(".env.{}", environment)).ok();
            }
        }

        ConfigLoader::load::<TConfig>()
    }

    fn load<TConfig>() -> ConfigResult<TConfig>
    where
        TConfig: DeserializeOwned,
    {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env").ok();

        envy::from_env::<TConfig>()
    }
}
