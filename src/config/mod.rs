use serde::{self, Deserialize};

#[derive(Deserialize, Clone, Debug, Default)]
pub struct GlobalConfig {
    /// Raises the log level from WARN to INFO for every invocation.
    #[serde(default)]
    pub verbose_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::GlobalConfig;

    #[test]
    fn verbose_mode_defaults_to_false() {
        let config: GlobalConfig = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert!(!config.verbose_mode);
    }

    #[test]
    fn verbose_mode_is_read_from_environment() {
        let config: GlobalConfig =
            envy::from_iter(vec![("VERBOSE_MODE".to_owned(), "true".to_owned())]).unwrap();
        assert!(config.verbose_mode);
    }
}
