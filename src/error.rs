use std::fmt;

#[derive(Debug)]
pub enum MascotError {
    ClipNotFound(String),
    InvalidConfig(String),
    InvalidCommand(String),
    Io(std::io::Error),
    Toml(toml::de::Error),
}

impl fmt::Display for MascotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClipNotFound(name) => write!(f, "Animation clip not found: {name}"),
            Self::InvalidConfig(msg) => write!(f, "Invalid config: {msg}"),
            Self::InvalidCommand(msg) => write!(f, "Invalid command: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML error: {e}"),
        }
    }
}

impl std::error::Error for MascotError {}

impl From<std::io::Error> for MascotError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for MascotError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}
