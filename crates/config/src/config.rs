use std::{env::VarError, fmt, str::FromStr};

mod error;
pub use error::ConfigError;

pub const HOST_VAR: &str = "DB_HOST";
pub const PORT_VAR: &str = "DB_PORT";
pub const DBNAME_VAR: &str = "MONGO_DBNAME";
pub const USERNAME_VAR: &str = "DB_USER";
pub const PASSWORD_VAR: &str = "DB_PASSWORD";
pub const RETENTION_DAYS_VAR: &str = "MONGO_RETENTION_DAYS";

/// Every variable the sweeper requires, in the order they are read.
pub const REQUIRED_VARS: [&str; 6] = [
    HOST_VAR,
    PORT_VAR,
    DBNAME_VAR,
    USERNAME_VAR,
    PASSWORD_VAR,
    RETENTION_DAYS_VAR,
];

#[derive(Clone, PartialEq)]
pub struct Config {
    /// Host name or address of the MongoDB server
    pub host: String,

    /// Port of the MongoDB server
    pub port: u16,

    /// Database to clean. It is also the authentication source for the user
    pub db_name: String,

    pub username: String,
    pub password: String,

    /// Number of days of data to keep. Fractions are dropped when the
    /// cutoff is computed
    pub retention_days: f64,
}

// The password never ends up in logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_name", &self.db_name)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("retention_days", &self.retention_days)
            .finish()
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(|key| std::env::var(key))
    }

    /// Loads the configuration through `lookup`, which returns `None` for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::load(|key| lookup(key).ok_or(VarError::NotPresent))
    }

    /// Retention period in whole days, truncated toward zero.
    pub fn retention_days_whole(&self) -> i64 {
        self.retention_days.trunc() as i64
    }

    fn load<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, VarError>,
    {
        let host = read_string(&lookup, HOST_VAR)?;
        let port = read_parsed::<u16, _>(&lookup, PORT_VAR)?;
        let db_name = read_string(&lookup, DBNAME_VAR)?;
        let username = read_string(&lookup, USERNAME_VAR)?;
        let password = read_string(&lookup, PASSWORD_VAR)?;
        let retention_days = read_parsed::<f64, _>(&lookup, RETENTION_DAYS_VAR)?;
        if !retention_days.is_finite() {
            return Err(ConfigError::Invalid {
                key: RETENTION_DAYS_VAR,
                value: retention_days.to_string(),
                reason: "retention period must be a finite number of days".to_string(),
            });
        }

        Ok(Config {
            host,
            port,
            db_name,
            username,
            password,
            retention_days,
        })
    }
}

fn read_string<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&'static str) -> Result<String, VarError>,
{
    match lookup(key) {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => Err(ConfigError::Missing { key }),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::Invalid {
            key,
            value: raw.to_string_lossy().into_owned(),
            reason: "value is not valid unicode".to_string(),
        }),
    }
}

fn read_parsed<T, F>(lookup: &F, key: &'static str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&'static str) -> Result<String, VarError>,
{
    let value = read_string(lookup, key)?;
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (HOST_VAR, "mongo.internal".to_string()),
            (PORT_VAR, "27017".to_string()),
            (DBNAME_VAR, "tron".to_string()),
            (USERNAME_VAR, "cleaner".to_string()),
            (PASSWORD_VAR, "s3cret".to_string()),
            (RETENTION_DAYS_VAR, "30".to_string()),
        ])
    }

    fn load(env: &HashMap<&'static str, String>) -> Result<Config, ConfigError> {
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn loads_all_variables() {
        let config = load(&full_env()).unwrap();
        assert_eq!(config.host, "mongo.internal");
        assert_eq!(config.port, 27017);
        assert_eq!(config.db_name, "tron");
        assert_eq!(config.username, "cleaner");
        assert_eq!(config.password, "s3cret");
        assert_eq!(config.retention_days, 30.0);
    }

    #[test]
    fn every_variable_is_required() {
        for key in REQUIRED_VARS {
            let mut env = full_env();
            env.remove(key);
            match load(&env) {
                Err(ConfigError::Missing { key: missing }) => assert_eq!(missing, key),
                other => panic!("expected {key} to be reported missing, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_integer_port() {
        for bad in ["mongo", "27017.5", "70000", "-1", ""] {
            let mut env = full_env();
            env.insert(PORT_VAR, bad.to_string());
            assert!(
                matches!(load(&env), Err(ConfigError::Invalid { key: PORT_VAR, .. })),
                "port {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_numeric_and_non_finite_retention() {
        for bad in ["thirty", "", "nan", "inf", "-infinity"] {
            let mut env = full_env();
            env.insert(RETENTION_DAYS_VAR, bad.to_string());
            assert!(
                matches!(
                    load(&env),
                    Err(ConfigError::Invalid {
                        key: RETENTION_DAYS_VAR,
                        ..
                    })
                ),
                "retention {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn numeric_values_ignore_surrounding_whitespace() {
        let mut env = full_env();
        env.insert(PORT_VAR, " 27018\n".to_string());
        env.insert(RETENTION_DAYS_VAR, " 7.9 ".to_string());
        let config = load(&env).unwrap();
        assert_eq!(config.port, 27018);
        assert_eq!(config.retention_days, 7.9);
    }

    #[test]
    fn retention_days_are_truncated() {
        let mut config = load(&full_env()).unwrap();
        config.retention_days = 7.9;
        assert_eq!(config.retention_days_whole(), 7);
        config.retention_days = 0.5;
        assert_eq!(config.retention_days_whole(), 0);
        config.retention_days = -1.5;
        assert_eq!(config.retention_days_whole(), -1);
    }

    #[test]
    fn debug_output_hides_password() {
        let config = load(&full_env()).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn reads_the_deployed_variable_names() {
        let env = HashMap::from([
            ("DB_HOST", "mongo".to_string()),
            ("DB_PORT", "27017".to_string()),
            ("MONGO_DBNAME", "tron".to_string()),
            ("DB_USER", "u".to_string()),
            ("DB_PASSWORD", "p".to_string()),
            ("MONGO_RETENTION_DAYS", "30".to_string()),
        ]);
        let config = load(&env).unwrap();
        assert_eq!(config.host, "mongo");
        assert_eq!(config.port, 27017);
        assert_eq!(config.db_name, "tron");
        assert_eq!(config.username, "u");
        assert_eq!(config.password, "p");
        assert_eq!(config.retention_days, 30.0);
    }

    #[test]
    fn other_variable_names_are_not_read() {
        let env = HashMap::from([
            ("MONGO_HOST", "mongo".to_string()),
            ("MONGO_PORT", "27017".to_string()),
            ("MONGO_DBNAME", "tron".to_string()),
            ("MONGO_USERNAME", "u".to_string()),
            ("MONGO_PASSWORD", "p".to_string()),
            ("MONGO_RETENTION_DAYS", "30".to_string()),
        ]);
        assert!(matches!(
            load(&env),
            Err(ConfigError::Missing { key: "DB_HOST" })
        ));
    }

    #[test]
    fn error_messages_name_the_variable() {
        let mut env = full_env();
        env.remove(DBNAME_VAR);
        let err = load(&env).unwrap_err();
        assert_eq!(err.to_string(), "environment variable MONGO_DBNAME is not set");
    }
}
