use std::{env, fmt, net::SocketAddr};

use super::{database_url, server_bind_address};

/// Application runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }

    /// Returns `true` when the current environment should behave as development.
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Returns the canonical name used for logging/metrics labels.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// Static login account read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Runtime configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    pub database_url: String,
    pub admin_account: Account,
    pub user_account: Account,
}

impl AppConfig {
    /// Constructs the configuration by reading and validating environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_value = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let environment = Environment::from_str(&env_value)?;
        let bind_addr = server_bind_address().map_err(ConfigError::BindAddress)?;
        let admin_account = account_from_env(
            "APP_ADMIN_USERNAME",
            "APP_ADMIN_PASSWORD",
            DEFAULT_ADMIN_ACCOUNT,
        )?;
        let user_account = account_from_env(
            "APP_USER_USERNAME",
            "APP_USER_PASSWORD",
            DEFAULT_USER_ACCOUNT,
        )?;

        if admin_account.username == user_account.username {
            return Err(ConfigError::DuplicateUsername(admin_account.username));
        }

        Ok(Self {
            bind_addr,
            environment,
            database_url: database_url(),
            admin_account,
            user_account,
        })
    }

    /// Whether the admin account still carries the built-in fallback password.
    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_account.password == DEFAULT_ADMIN_ACCOUNT
    }
}

const DEFAULT_ADMIN_ACCOUNT: &str = "admin";
const DEFAULT_USER_ACCOUNT: &str = "user";

fn account_from_env(
    username_var: &'static str,
    password_var: &'static str,
    default: &str,
) -> Result<Account, ConfigError> {
    let username = env::var(username_var).unwrap_or_else(|_| default.to_string());
    if username.trim().is_empty() {
        return Err(ConfigError::BlankCredential(username_var));
    }
    let password = env::var(password_var).unwrap_or_else(|_| default.to_string());
    if password.is_empty() {
        return Err(ConfigError::BlankCredential(password_var));
    }
    Ok(Account { username, password })
}

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    InvalidEnvironment(String),
    BindAddress(std::net::AddrParseError),
    BlankCredential(&'static str),
    DuplicateUsername(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnvironment(value) => write!(
                f,
                "APP_ENV must be one of 'development', 'production', or 'test' (got {value})"
            ),
            Self::BindAddress(err) => write!(f, "invalid APP_BIND_ADDR value: {err}"),
            Self::BlankCredential(var) => write!(f, "{var} must not be blank"),
            Self::DuplicateUsername(name) => write!(
                f,
                "admin and user accounts must have different usernames (both are {name})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
pub(crate) static ENV_GUARD: std::sync::LazyLock<std::sync::Mutex<()>> =
    std::sync::LazyLock::new(|| std::sync::Mutex::new(()));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_BIND_ADDR, DEFAULT_DATABASE_URL};

    const VARS: [&str; 7] = [
        "APP_ENV",
        "APP_BIND_ADDR",
        "DATABASE_URL",
        "APP_ADMIN_USERNAME",
        "APP_ADMIN_PASSWORD",
        "APP_USER_USERNAME",
        "APP_USER_PASSWORD",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn loads_defaults_in_development() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();

        let config = AppConfig::from_env().expect("config should load with defaults");
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.admin_account.username, "admin");
        assert_eq!(config.admin_account.password, "admin");
        assert_eq!(config.user_account.username, "user");
        assert_eq!(config.user_account.password, "user");
        assert!(config.uses_default_admin_password());
    }

    #[test]
    fn rejects_invalid_environment() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();
        env::set_var("APP_ENV", "invalid");

        let err = AppConfig::from_env().expect_err("invalid env should error");
        assert!(matches!(err, ConfigError::InvalidEnvironment(value) if value == "invalid"));

        clear_env();
    }

    #[test]
    fn parses_production_environment() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();
        env::set_var("APP_ENV", "production");
        env::set_var("APP_BIND_ADDR", "0.0.0.0:9000");
        env::set_var("DATABASE_URL", "sqlite:///var/lib/hr/records.db");
        env::set_var("APP_ADMIN_PASSWORD", "s3cret");

        let config = AppConfig::from_env().expect("config should load");
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.database_url, "sqlite:///var/lib/hr/records.db");
        assert_eq!(config.admin_account.password, "s3cret");
        assert!(!config.uses_default_admin_password());

        clear_env();
    }

    #[test]
    fn rejects_blank_credentials() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();
        env::set_var("APP_USER_PASSWORD", "");

        let err = AppConfig::from_env().expect_err("blank password should error");
        assert!(matches!(err, ConfigError::BlankCredential("APP_USER_PASSWORD")));

        clear_env();
    }

    #[test]
    fn rejects_shared_usernames() {
        let _guard = ENV_GUARD.lock().expect("env guard poisoned");
        clear_env();
        env::set_var("APP_USER_USERNAME", "admin");

        let err = AppConfig::from_env().expect_err("duplicate usernames should error");
        assert!(matches!(err, ConfigError::DuplicateUsername(name) if name == "admin"));

        clear_env();
    }

    #[test]
    fn account_debug_hides_password() {
        let account = Account {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{account:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
