//! Error types for the planning pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the resolver, layout builder and packer.
///
/// Every variant names the offending section, row or piece in `subject`.
/// None of these are transient: the same input always fails the same way.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Error {
    /// Fixed sizes cannot tile the available span.
    #[error("{subject}: overconstrained: {message}")]
    Overconstrained { subject: String, message: String },

    /// Fill entries cannot all reach their minimums.
    #[error("{subject}: insufficient space: {message}")]
    InsufficientSpace { subject: String, message: String },

    /// Resolved dimensions leave no room for the requested geometry.
    #[error("{subject}: geometry error: {message}")]
    Geometry { subject: String, message: String },

    /// A piece does not fit on an empty sheet in any allowed orientation.
    #[error("{subject}: unplaceable piece: {message}")]
    UnplaceablePiece { subject: String, message: String },

    /// Configuration violates a basic invariant.
    #[error("{subject}: invalid spec: {message}")]
    InvalidSpec { subject: String, message: String },
}

/// Discriminant of [`Error`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Overconstrained,
    InsufficientSpace,
    Geometry,
    UnplaceablePiece,
    InvalidSpec,
}

impl Error {
    pub fn overconstrained(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Overconstrained {
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn insufficient_space(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InsufficientSpace {
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn geometry(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Geometry {
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn unplaceable(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnplaceablePiece {
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn invalid(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSpec {
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Overconstrained { .. } => ErrorKind::Overconstrained,
            Self::InsufficientSpace { .. } => ErrorKind::InsufficientSpace,
            Self::Geometry { .. } => ErrorKind::Geometry,
            Self::UnplaceablePiece { .. } => ErrorKind::UnplaceablePiece,
            Self::InvalidSpec { .. } => ErrorKind::InvalidSpec,
        }
    }

    /// Identity of the section, row or piece the error is about.
    pub fn subject(&self) -> &str {
        match self {
            Self::Overconstrained { subject, .. }
            | Self::InsufficientSpace { subject, .. }
            | Self::Geometry { subject, .. }
            | Self::UnplaceablePiece { subject, .. }
            | Self::InvalidSpec { subject, .. } => subject,
        }
    }
}
