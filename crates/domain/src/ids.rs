use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-assigned identifiers are opaque strings; they are never generated here.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(DocumentId);
define_id!(WorldId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = DocumentId::new("dnBQFZWvGfHjgZjl");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"dnBQFZWvGfHjgZjl\"");
        assert_eq!(id.to_string(), "dnBQFZWvGfHjgZjl");
    }
}
