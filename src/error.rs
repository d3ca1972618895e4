//! Error types for plugin registration, script evaluation and configuration.

use std::fmt;
use thiserror::Error;

/// Failure of a single plugin registration or of template materialization.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin '{plugin}': invalid export name {name:?}")]
    InvalidName { plugin: String, name: String },

    #[error("plugin '{plugin}': export '{name}' is already provided by plugin '{owner}'")]
    DuplicateExport {
        plugin: String,
        name: String,
        owner: String,
    },

    #[error("plugin '{plugin}' failed: {reason}")]
    Failed { plugin: String, reason: String },

    #[error("plugin '{plugin}' panicked: {reason}")]
    Panicked { plugin: String, reason: String },

    #[error("engine error: {0}")]
    Engine(String),
}

impl PluginError {
    /// Convenience for plugin bodies that need to bail out.
    pub fn failed(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        PluginError::Failed {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }
}

/// Exception information captured from a `v8::TryCatch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionDetails {
    pub message: String,
    pub resource_name: Option<String>,
    pub line: Option<usize>,
    pub start_column: usize,
    pub end_column: usize,
    pub source_line: Option<String>,
}

impl fmt::Display for ExceptionDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        match (&self.resource_name, self.line) {
            (Some(name), Some(line)) => write!(f, " ({}:{}:{})", name, line, self.start_column),
            (None, Some(line)) => write!(f, " (line {}:{})", line, self.start_column),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("compile error: {0}")]
    Compile(ExceptionDetails),

    #[error("uncaught exception: {0}")]
    Runtime(ExceptionDetails),

    #[error("engine error: {0}")]
    Engine(String),
}

impl ScriptError {
    pub fn details(&self) -> Option<&ExceptionDetails> {
        match self {
            ScriptError::Compile(details) | ScriptError::Runtime(details) => Some(details),
            ScriptError::Engine(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_details_display() {
        let details = ExceptionDetails {
            message: "ReferenceError: nope is not defined".to_string(),
            resource_name: Some("main.js".to_string()),
            line: Some(3),
            start_column: 4,
            end_column: 8,
            source_line: Some("    nope();".to_string()),
        };

        assert_eq!(
            details.to_string(),
            "ReferenceError: nope is not defined (main.js:3:4)"
        );

        let bare = ExceptionDetails {
            message: "boom".to_string(),
            ..Default::default()
        };
        assert_eq!(ScriptError::Runtime(bare).to_string(), "uncaught exception: boom");
    }

    #[test]
    fn test_duplicate_export_message() {
        let err = PluginError::DuplicateExport {
            plugin: "second".to_string(),
            name: "log".to_string(),
            owner: "first".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "plugin 'second': export 'log' is already provided by plugin 'first'"
        );
    }
}
