use sha2::{Digest, Sha256};
use std::fmt;

/// Stand-in admin token. It is not a credential any backend will accept.
pub const PLACEHOLDER_ADMIN_TOKEN: &str = "admin_token_for_testing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Placeholder,
    Configured,
}

/// Admin bearer token handed to the authorized checks.
///
/// Carries no expiry, scope or signature; the value is passed through
/// verbatim. Only [`AdminToken::fingerprint`] should ever reach a log line.
#[derive(Clone)]
pub struct AdminToken {
    value: String,
    kind: TokenKind,
}

impl AdminToken {
    pub fn placeholder() -> Self {
        Self {
            value: PLACEHOLDER_ADMIN_TOKEN.to_string(),
            kind: TokenKind::Placeholder,
        }
    }

    /// Token from configuration. Blank values and the placeholder string
    /// itself are treated as "not configured".
    pub fn configured(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == PLACEHOLDER_ADMIN_TOKEN {
            return Self::placeholder();
        }
        Self {
            value: trimmed.to_string(),
            kind: TokenKind::Configured,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == TokenKind::Placeholder
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    /// `Authorization` header value.
    pub fn bearer_value(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// First 8 bytes of the SHA-256 of the token, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.value.as_bytes());
        let hash = hasher.finalize();
        hash[..8].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminToken")
            .field("kind", &self.kind)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}
