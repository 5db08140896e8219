// veilog-core/src/cipher/registry.rs
//! Maps cipher type names to strategy factories.
//!
//! The registry is an explicit table populated from a provider list, so new
//! cipher types are added by registering a provider, never by editing the
//! lookup logic itself.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::strategies::{Base64Strategy, XxteaStrategy};
use super::CipherStrategy;
use crate::errors::{Result, VeilogError};

/// A factory for one cipher type.
pub trait StrategyProvider: Send + Sync {
    /// The type name this provider answers to, e.g. `"XXTEA"`.
    fn type_name(&self) -> &'static str;

    /// Creates a strategy instance bound to `key`. Providers for keyless
    /// strategies ignore the argument.
    fn create(&self, key: &str) -> Arc<dyn CipherStrategy>;
}

struct Base64Provider;

impl StrategyProvider for Base64Provider {
    fn type_name(&self) -> &'static str {
        "BASE64"
    }

    fn create(&self, _key: &str) -> Arc<dyn CipherStrategy> {
        Arc::new(Base64Strategy)
    }
}

struct XxteaProvider;

impl StrategyProvider for XxteaProvider {
    fn type_name(&self) -> &'static str {
        "XXTEA"
    }

    fn create(&self, key: &str) -> Arc<dyn CipherStrategy> {
        Arc::new(XxteaStrategy::new(key))
    }
}

/// Registry of strategy providers, keyed by uppercased type name.
pub struct StrategyRegistry {
    providers: HashMap<String, Box<dyn StrategyProvider>>,
}

impl StrategyRegistry {
    /// A registry holding the built-in providers (`BASE64`, `XXTEA`).
    pub fn builtin() -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
        };
        registry.register(Box::new(Base64Provider));
        registry.register(Box::new(XxteaProvider));
        registry
    }

    /// Registers a provider, replacing any previous one of the same name.
    pub fn register(&mut self, provider: Box<dyn StrategyProvider>) {
        debug!("Registered cipher strategy provider '{}'.", provider.type_name());
        self.providers
            .insert(provider.type_name().to_uppercase(), provider);
    }

    /// Creates a strategy for `cipher_type`, failing fast when no provider
    /// is registered under that name. Lookup is case-insensitive.
    pub fn create_strategy(&self, cipher_type: &str, key: &str) -> Result<Arc<dyn CipherStrategy>> {
        self.providers
            .get(&cipher_type.to_uppercase())
            .map(|provider| provider.create(key))
            .ok_or_else(|| VeilogError::UnknownCipherType(cipher_type.to_string()))
    }

    /// Case-insensitive existence check, for validating configuration
    /// before the table is built.
    pub fn is_supported(&self, cipher_type: &str) -> bool {
        self.providers.contains_key(&cipher_type.to_uppercase())
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
