//! Structured error types shared across MEFF crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`MeffError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (time slice, bin index, entry name, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the effective-mass pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum MeffError {
    /// A configuration source is malformed, short or non-numeric.
    #[error("ingestion error: {0}")]
    Ingestion(ErrorInfo),
    /// Invalid pipeline parameters.
    #[error("configuration error: {0}")]
    Configuration(ErrorInfo),
    /// Fewer than two configurations are available for a time slice.
    #[error("insufficient data: {0}")]
    InsufficientData(ErrorInfo),
    /// Non-positive logarithm operand, zero weighting divisor or non-finite result.
    #[error("domain error: {0}")]
    DomainMath(ErrorInfo),
    /// Serialization, schema and file errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl MeffError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            MeffError::Ingestion(info)
            | MeffError::Configuration(info)
            | MeffError::InsufficientData(info)
            | MeffError::DomainMath(info)
            | MeffError::Serde(info) => info,
        }
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        match self {
            MeffError::Ingestion(info)
            | MeffError::Configuration(info)
            | MeffError::InsufficientData(info)
            | MeffError::DomainMath(info)
            | MeffError::Serde(info) => info,
        }
    }

    /// Attaches an extra context entry while keeping the error family.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.info_mut()
            .context
            .insert(key.into(), value.to_string());
        self
    }

    /// Looks up a context entry by key.
    pub fn context(&self, key: &str) -> Option<&str> {
        self.info().context.get(key).map(String::as_str)
    }
}
