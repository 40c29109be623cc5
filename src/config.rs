use std::env;

use crate::chain::{DEFAULT_DIFFICULTY, DEFAULT_GENESIS_DATA};

/// Settings used to start a new chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub difficulty: u64,
    pub genesis_data: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            genesis_data: DEFAULT_GENESIS_DATA.to_string(),
        }
    }
}

impl ChainConfig {
    /// Read `CHAIN_DIFFICULTY` and `CHAIN_GENESIS_DATA`, loading `.env` first
    /// when present. Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let difficulty = lookup("CHAIN_DIFFICULTY")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.difficulty);
        let genesis_data = lookup("CHAIN_GENESIS_DATA").unwrap_or(defaults.genesis_data);

        Self {
            difficulty,
            genesis_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChainConfig;
    use crate::chain::DEFAULT_DIFFICULTY;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> ChainConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ChainConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = lookup_in(&[]);
        assert_eq!(cfg, ChainConfig::default());
        assert_eq!(cfg.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(cfg.genesis_data, "genesis");
    }

    #[test]
    fn reads_overrides() {
        let cfg = lookup_in(&[("CHAIN_DIFFICULTY", " 5 "), ("CHAIN_GENESIS_DATA", "hello")]);
        assert_eq!(cfg.difficulty, 5);
        assert_eq!(cfg.genesis_data, "hello");
    }

    #[test]
    fn unparsable_difficulty_falls_back() {
        let cfg = lookup_in(&[("CHAIN_DIFFICULTY", "hard")]);
        assert_eq!(cfg.difficulty, DEFAULT_DIFFICULTY);
    }
}
