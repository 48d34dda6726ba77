//! Constraint violations raised while constructing a document.

use std::fmt;

use thiserror::Error;

/// Dotted location of a field inside a document tree, e.g. `cargo.crew.0.name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(index.to_string())
    }

    /// Prefix this path with another one.
    pub fn within(&self, parent: &FieldPath) -> Self {
        let mut segments = parent.0.clone();
        segments.extend(self.0.iter().cloned());
        Self(segments)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self(
            path.split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

/// The constraint a value failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Required field absent with no default
    Required,
    /// Empty string where blank is not allowed
    Blank,
    /// Null where the field is not nullable
    NotNullable,
    /// Value could not be coerced to the declared type
    Type { expected: &'static str },
    /// Fractional value in an integer field
    Integer,
    Minimum(f64),
    Maximum(f64),
    /// Value outside the enumerated choices
    Choice { allowed: Vec<String> },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Required => write!(f, "may not be undefined"),
            Constraint::Blank => write!(f, "may not be a blank string"),
            Constraint::NotNullable => write!(f, "may not be null"),
            Constraint::Type { expected } => write!(f, "must be a {expected}"),
            Constraint::Integer => write!(f, "must be an integer"),
            Constraint::Minimum(min) => write!(f, "must be at least {min}"),
            Constraint::Maximum(max) => write!(f, "must be at most {max}"),
            Constraint::Choice { allowed } => {
                write!(f, "must be one of [{}]", allowed.join(", "))
            }
        }
    }
}

/// A field value failed its declared constraint.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {constraint}")]
pub struct SchemaViolation {
    pub path: FieldPath,
    pub constraint: Constraint,
}

impl SchemaViolation {
    pub fn new(path: FieldPath, constraint: Constraint) -> Self {
        Self { path, constraint }
    }

    /// Re-anchor a violation found in an embedded tree under its parent path.
    pub fn within(self, parent: &FieldPath) -> Self {
        Self {
            path: self.path.within(parent),
            constraint: self.constraint,
        }
    }
}
