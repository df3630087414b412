//! Auth token domain types: issued tokens and their cache entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every token cache key.
pub const TOKEN_CACHE_KEY_PREFIX: &str = "payments_auth_token";

/// An access token issued by the auth server.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds as reported by the auth server.
    pub expires_in: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

impl AccessToken {
    /// Value for an `Authorization` header.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Key of one cached token: (prefix, client id, scope).
///
/// An empty scope is a valid scope and yields its own key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenCacheKey {
    prefix: &'static str,
    client_id: String,
    scope: String,
}

impl TokenCacheKey {
    pub fn new(client_id: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            prefix: TOKEN_CACHE_KEY_PREFIX,
            client_id: client_id.into(),
            scope: scope.into(),
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl fmt::Display for TokenCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.prefix, self.client_id, self.scope)
    }
}

/// One memoized token.
///
/// Entries are replaced, never mutated, when the cache refreshes.
#[derive(Clone, PartialEq, Eq)]
pub struct CachedAuthToken {
    pub token: AccessToken,
    /// Instant after which the entry must not be served. Already shortened by
    /// the renewal buffer.
    pub expires_at: DateTime<Utc>,
    pub scope: String,
    pub client_id: String,
}

impl CachedAuthToken {
    pub fn new(
        token: AccessToken,
        expires_at: DateTime<Utc>,
        client_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            token,
            expires_at,
            scope: scope.into(),
            client_id: client_id.into(),
        }
    }

    /// An entry is expired only once `now` is strictly past its expiry.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    pub fn token_type(&self) -> &str {
        &self.token.token_type
    }
}

impl fmt::Debug for CachedAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedAuthToken")
            .field("token", &self.token)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .field("client_id", &self.client_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn token() -> AccessToken {
        AccessToken {
            access_token: "secret-token".into(),
            token_type: "Bearer".into(),
            expires_in: 3600,
            scope: Some("payments".into()),
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let expires_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let entry = CachedAuthToken::new(token(), expires_at, "c1", "payments");

        assert!(!entry.is_expired(expires_at - Duration::seconds(1)));
        assert!(!entry.is_expired(expires_at));
        assert!(entry.is_expired(expires_at + Duration::microseconds(1)));
    }

    #[test]
    fn test_cache_key_structure() {
        let a = TokenCacheKey::new("c1", "payments");
        assert_eq!(a, TokenCacheKey::new("c1", "payments"));
        assert_ne!(a, TokenCacheKey::new("c1", ""));
        assert_ne!(a, TokenCacheKey::new("c2", "payments"));
        assert_eq!(a.to_string(), "payments_auth_token:c1:payments");
        assert_eq!(TokenCacheKey::new("c1", "").to_string(), "payments_auth_token:c1:");
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", token());
        assert!(!rendered.contains("secret-token"));
        assert_eq!(token().authorization_header(), "Bearer secret-token");
    }

    #[test]
    fn test_access_token_decodes_without_scope() {
        let token: AccessToken = serde_json::from_str(
            r#"{"access_token":"t","token_type":"Bearer","expires_in":3600}"#,
        )
        .unwrap();
        assert_eq!(token.expires_in, 3600);
        assert!(token.scope.is_none());
    }
}
