//! Opaque token generation for invitations and brand-kit share links.
//!
//! Randomness is injected through the [`TokenProvider`] trait so that flows
//! consuming tokens can be exercised deterministically in tests. Production
//! code wires [`OsRandomProvider`].

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

/// Number of random bytes in an opaque token (hex-encoded to 64 chars).
pub const TOKEN_BYTES: usize = 32;

/// Default invitation lifetime (7 days).
pub const DEFAULT_INVITATION_TTL_DAYS: i64 = 7;

/// Source of random bytes for token generation.
///
/// Implementations must be `Send + Sync` so a single provider can be shared
/// across request handlers.
pub trait TokenProvider: Send + Sync {
    /// Fills `buf` with random bytes.
    fn fill_bytes(&self, buf: &mut [u8]);

    /// Generates an opaque, unguessable token: 32 random bytes, hex-encoded.
    fn generate_token(&self) -> String {
        let mut buf = [0u8; TOKEN_BYTES];
        self.fill_bytes(&mut buf);
        hex::encode(buf)
    }
}

/// Provider backed by the operating system RNG.
#[derive(Debug, Clone, Default)]
pub struct OsRandomProvider;

impl TokenProvider for OsRandomProvider {
    fn fill_bytes(&self, buf: &mut [u8]) {
        rand::thread_rng().fill_bytes(buf);
    }
}

/// Provider returning a fixed byte pattern. Test use only.
#[derive(Debug, Clone)]
pub struct FixedProvider(pub u8);

impl TokenProvider for FixedProvider {
    fn fill_bytes(&self, buf: &mut [u8]) {
        buf.fill(self.0);
    }
}

/// Default invitation expiration (now + 7 days).
pub fn default_invitation_expiration() -> DateTime<Utc> {
    Utc::now() + Duration::days(DEFAULT_INVITATION_TTL_DAYS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_64_hex_chars() {
        let token = OsRandomProvider.generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let provider = OsRandomProvider;
        let token1 = provider.generate_token();
        let token2 = provider.generate_token();
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_fixed_provider_is_deterministic() {
        let provider = FixedProvider(0xab);
        assert_eq!(provider.generate_token(), provider.generate_token());
        assert_eq!(&provider.generate_token()[..4], "abab");
    }

    #[test]
    fn test_default_invitation_expiration() {
        let expiration = default_invitation_expiration();
        let diff = expiration - Utc::now();
        assert!(diff.num_days() >= 6 && diff.num_days() <= 7);
    }
}
