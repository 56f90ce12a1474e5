//! TOML input script parser

use super::ast::InputScript;
use std::path::Path;

impl InputScript {
    /// Parse an input script from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ParseError> {
        toml::from_str(toml_str).map_err(|e| ParseError::TomlError(e.to_string()))
    }

    /// Parse an input script from a file
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ParseError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, ParseError> {
        toml::to_string_pretty(self).map_err(|e| ParseError::TomlError(e.to_string()))
    }
}

/// Script parse error
#[derive(Debug, Clone)]
pub enum ParseError {
    /// TOML parsing error
    TomlError(String),
    /// File I/O error
    IoError(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            ParseError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}
