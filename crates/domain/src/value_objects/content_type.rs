//! Content type tag supplied by the calling write path

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Kind of user-generated content being moderated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Parent-child or class message
    Message,
    /// Note attached to a homework item
    HomeworkNote,
    /// Free-text profile field (nickname, bio, ...)
    ProfileField,
    /// Comment on a grade, schedule entry or announcement
    Comment,
}

impl ContentType {
    /// Returns all content types for iteration
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Message,
            Self::HomeworkNote,
            Self::ProfileField,
            Self::Comment,
        ]
    }

    /// Stable tag used in storage and configuration
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::HomeworkNote => "homework_note",
            Self::ProfileField => "profile_field",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "message" => Ok(Self::Message),
            "homework_note" => Ok(Self::HomeworkNote),
            "profile_field" => Ok(Self::ProfileField),
            "comment" => Ok(Self::Comment),
            _ => Err(DomainError::UnknownContentType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_tags() {
        for ct in ContentType::all() {
            assert_eq!(ct.as_str().parse::<ContentType>().unwrap(), *ct);
        }
    }

    #[test]
    fn parse_accepts_dashes_and_case() {
        assert_eq!(
            "Homework-Note".parse::<ContentType>().unwrap(),
            ContentType::HomeworkNote
        );
    }

    #[test]
    fn parse_unknown_fails() {
        let err = "fax".parse::<ContentType>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownContentType(_)));
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&ContentType::ProfileField).unwrap();
        assert_eq!(json, "\"profile_field\"");
    }
}
