//! Caller identity resolution.
//!
//! Authentication itself lives outside this crate; game operations only need
//! a stable [`PlayerId`] per authenticated caller. Services hold a resolver
//! and check it before any other validation.

use std::collections::HashMap;

/// Stable identifier for a player.
pub type PlayerId = String;

/// Maps an opaque caller credential to a stable player identifier.
pub trait IdentityResolver: Send + Sync {
    /// Resolves the credential, or `None` if the caller is unknown.
    fn resolve(&self, credential: &str) -> Option<PlayerId>;
}

/// Resolver backed by a fixed credential table.
///
/// Production wires a real identity service in; tests and local play use
/// this one.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    table: HashMap<String, PlayerId>,
}

impl StaticResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a credential-to-player mapping.
    pub fn register(mut self, credential: impl Into<String>, player: impl Into<PlayerId>) -> Self {
        self.table.insert(credential.into(), player.into());
        self
    }
}

impl IdentityResolver for StaticResolver {
    fn resolve(&self, credential: &str) -> Option<PlayerId> {
        self.table.get(credential).cloned()
    }
}

/// Resolver that treats every credential as its own player id.
///
/// Convenient for in-process callers that already hold player ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughResolver;

impl IdentityResolver for PassthroughResolver {
    fn resolve(&self, credential: &str) -> Option<PlayerId> {
        if credential.is_empty() {
            None
        } else {
            Some(credential.to_string())
        }
    }
}
