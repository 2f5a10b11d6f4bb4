#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {key} is not set")]
    Missing { key: &'static str },
    #[error("environment variable {key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
