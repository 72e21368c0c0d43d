use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    DateRegex(regex::Error),
    DateFormat(String),
    TimeFormat(String),
    OutputName(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DateRegex(e) => write!(f, "Invalid date_regex: {}", e),
            ConfigError::DateFormat(s) => write!(f, "Invalid date_format: '{}'", s),
            ConfigError::TimeFormat(s) => write!(f, "Invalid time_format: '{}'", s),
            ConfigError::OutputName(s) => {
                write!(f, "Output list name must be a plain file name: '{}'", s)
            }
            ConfigError::Io(e) => write!(f, "I/O error: {}", e),
            ConfigError::Json(e) => write!(f, "Failed to parse JSON: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> ConfigError {
        ConfigError::Io(err)
    }
}

impl From<regex::Error> for ConfigError {
    fn from(err: regex::Error) -> ConfigError {
        ConfigError::DateRegex(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> ConfigError {
        ConfigError::Json(err)
    }
}
