use std::collections::{BTreeMap, HashMap};

use super::kind::Provider;

/// API keys for every configured provider, read once per request.
///
/// Empty values are treated as absent. The set is immutable after
/// construction and shared by reference across concurrent task executions.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    keys: HashMap<Provider, String>,
}

impl Credentials {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read every provider's key from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup (used by tests and `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut keys = HashMap::new();
        for provider in Provider::ALL {
            let value = provider
                .env_vars()
                .iter()
                .filter_map(|name| lookup(name))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty());
            if let Some(value) = value {
                keys.insert(provider, value);
            }
        }
        Self { keys }
    }

    pub fn with(mut self, provider: Provider, key: impl Into<String>) -> Self {
        let key = key.into();
        if key.trim().is_empty() {
            self.keys.remove(&provider);
        } else {
            self.keys.insert(provider, key);
        }
        self
    }

    pub fn get(&self, provider: Provider) -> Option<&str> {
        self.keys.get(&provider).map(String::as_str)
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        self.keys.contains_key(&provider)
    }

    /// Boolean per caller-facing id, keyed by that id.
    pub fn status<I>(&self, providers: I) -> BTreeMap<String, bool>
    where
        I: IntoIterator<Item = (&'static str, Provider)>,
    {
        providers
            .into_iter()
            .map(|(name, p)| (name.to_string(), self.is_configured(p)))
            .collect()
    }
}
