use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StorageError;

/// Models offered in the configuration sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ModelId {
    #[default]
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-1.5-flash")]
    Gemini15Flash,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [ModelId::Gemini25Flash, ModelId::Gemini15Flash];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gemini25Flash => "gemini-2.5-flash",
            ModelId::Gemini15Flash => "gemini-1.5-flash",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ModelId::ALL
            .into_iter()
            .find(|model| model.as_str() == trimmed)
            .ok_or_else(|| StorageError::UnknownModel(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_identifiers() {
        assert_eq!(
            "gemini-2.5-flash".parse::<ModelId>().unwrap(),
            ModelId::Gemini25Flash
        );
        assert_eq!(
            " gemini-1.5-flash ".parse::<ModelId>().unwrap(),
            ModelId::Gemini15Flash
        );
    }

    #[test]
    fn rejects_unknown_identifier() {
        let err = "gpt-4o".parse::<ModelId>().unwrap_err();
        assert!(matches!(err, StorageError::UnknownModel(name) if name == "gpt-4o"));
    }

    #[test]
    fn serializes_as_identifier_string() {
        let json = serde_json::to_string(&ModelId::Gemini15Flash).unwrap();
        assert_eq!(json, "\"gemini-1.5-flash\"");
    }
}
