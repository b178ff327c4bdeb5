//! Record and user identifiers
//!
//! Both are random v4 UUIDs stored as their hyphenated text form.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parse the hyphenated text form
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a moderation record; assigned when the record is created
    ModerationId
);

uuid_id!(
    /// Identifier of a content author or reviewer, issued by the school app
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_random() {
        assert_ne!(ModerationId::new(), ModerationId::new());
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn text_form_parses_back() {
        let id = ModerationId::new();
        assert_eq!(ModerationId::parse(&id.to_string()).unwrap(), id);
        assert!(UserId::parse("teacher-42").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = UserId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"550e8400-e29b-41d4-a716-446655440000\""
        );
    }
}
