use moka::sync::Cache;
use std::time::Duration;

/// Token ids of logged-out sessions. Entries outlive the tokens themselves, after which an
/// expired token is rejected anyway.
pub struct TokenRevocations {
    revoked: Cache<String, ()>,
}

impl TokenRevocations {
    pub fn new(token_ttl_secs: usize) -> Self {
        Self {
            revoked: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(Duration::from_secs(token_ttl_secs as u64 + 60))
                .build(),
        }
    }

    pub fn revoke(&self, jti: &str) {
        self.revoked.insert(jti.to_string(), ());
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }
}
