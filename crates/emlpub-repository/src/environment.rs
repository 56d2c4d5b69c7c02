//! Repository deployments and credentials

use emlpub_core::errors::{ExError, ExErrorKind};
use emlpub_core_types::Sensitive;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A deployment of the repository API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Staging,
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Staging => "https://pasta-s.lternet.edu/",
            Environment::Development => "https://pasta-d.lternet.edu/",
            Environment::Production => "https://pasta.lternet.edu/",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "staging" => Ok(Environment::Staging),
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(ExError::new(ExErrorKind::Config)
                .with_op("parse_environment")
                .with_message(format!(
                    "unknown repository environment '{}' (expected staging, development or production)",
                    other
                ))),
        }
    }
}

/// Repository account
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Sensitive<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Sensitive::new(password.into()),
        }
    }

    /// Distinguished name the repository authenticates
    pub fn principal(&self) -> String {
        format!("uid={},o=EDI,dc=edirepository,dc=org", self.username)
    }
}
