use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Parent domain of the client zones, records live under `{client}.{dns_domain}`.
    pub dns_domain: String,
    #[serde(default)]
    pub verbose_mode: bool,
}
