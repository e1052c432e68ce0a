//! Domain records reconstructed from reply payloads
//!
//! These are plain structures; each is built from a generic JSON mapping by a
//! decoder in [`crate::codec`], where every field extraction is a potential
//! failure point. Nothing here touches the broker or the registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One diary owned by the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diary {
    pub id: i64,
    pub title: String,
}

impl fmt::Display for Diary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// One page within a diary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: i64,
    pub title: String,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// Tokens returned by a successful sign-in
///
/// On the wire this record travels as a nested JSON *string* inside the reply
/// payload and is parsed a second time by
/// [`crate::codec::decode_signin_reply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninReply {
    pub access_token: String,
    pub refresh_token: String,
}

/// Parameters collected by the register command
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
    pub knownas: String,
    pub email: String,
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signin_reply_uses_camel_case_keys() {
        let json = r#"{"accessToken":"a","refreshToken":"b"}"#;
        let reply: SigninReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.access_token, "a");
        assert_eq!(reply.refresh_token, "b");
    }

    #[test]
    fn test_diary_display() {
        let diary = Diary {
            id: 7,
            title: "My Diary".to_string(),
        };
        assert_eq!(diary.to_string(), "My Diary (7)");
    }
}
