//! HTTP Basic credentials for the caster.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Base64 encoded `username:password` pair.
///
/// The `Debug` impl is redacted so tokens never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Encoded token text, as placed after `Basic `.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([redacted])")
    }
}

impl AsRef<str> for AuthToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encode a credential pair into a Basic authentication token.
///
/// Empty usernames or passwords are not rejected; casters that allow
/// anonymous mountpoints expect exactly this.
pub fn make_auth_token(username: &str, password: &str) -> AuthToken {
    let credentials = format!("{username}:{password}");
    AuthToken(STANDARD.encode(credentials.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(token: &AuthToken) -> String {
        String::from_utf8(STANDARD.decode(token.as_str()).unwrap()).unwrap()
    }

    #[test]
    fn test_known_token() {
        assert_eq!(make_auth_token("u", "p").as_str(), "dTpw");
    }

    #[test]
    fn test_decodes_to_credentials() {
        let pairs = [
            ("user", "secret"),
            ("", ""),
            ("rover-17", "p@ss:with:colons"),
            ("ünïcode", "pässwörd"),
        ];
        for (username, password) in pairs {
            let token = make_auth_token(username, password);
            assert_eq!(decode(&token), format!("{username}:{password}"));
        }
    }

    #[test]
    fn test_empty_credentials_still_encode_separator() {
        let token = make_auth_token("", "");
        assert!(!token.is_empty());
        assert_eq!(token.as_str(), "Og==");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = make_auth_token("user", "secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains(token.as_str()));
        assert!(debug.contains("redacted"));
    }
}
