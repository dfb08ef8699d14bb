//! Network configuration and pool registry

use anyhow::{Context, Result};
use log::debug;
use pool_math::PairKey;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A liquidity pool account and the two tokens it holds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoolEntry {
    pub address: String,
    pub token_a: String,
    pub token_b: String,
}

impl PoolEntry {
    pub fn pair_key(&self) -> pool_math::Result<PairKey> {
        PairKey::new(&self.token_a, &self.token_b)
    }
}

/// On-disk layout of the optional TOML config
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    ledger_url: Option<String>,
    #[serde(default)]
    pools: Vec<PoolEntry>,
}

/// Everything a command needs to know about where it runs. Built once in
/// `main` and passed down by reference; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub network: String,
    pub ledger_url: String,
    pub pools: Vec<PoolEntry>,
    pub config_path: Option<PathBuf>,
}

impl NetworkConfig {
    pub fn new(network: &str, ledger_url: Option<String>, config_path: Option<PathBuf>) -> Result<Self> {
        let (network, default_url) = match network {
            "local" | "localnet" => ("local", "http://127.0.0.1:8080/api"),
            "test" | "testnet" => ("test", "https://rep2.test.network.api.keeta.com/api"),
            "main" | "mainnet" => ("main", "https://rep2.main.network.api.keeta.com/api"),
            _ => anyhow::bail!("Unknown network: {}. Use local, test, or main", network),
        };

        let file = match &config_path {
            Some(path) => load_config_file(path)?,
            None => ConfigFile::default(),
        };

        // CLI flag beats file, file beats network default
        let ledger_url = ledger_url
            .or(file.ledger_url)
            .unwrap_or_else(|| default_url.to_string());

        for pool in &file.pools {
            pool.pair_key()
                .with_context(|| format!("Pool {} has an invalid token pair", pool.address))?;
        }

        debug!("network={} ledger_url={} pools={}", network, ledger_url, file.pools.len());

        Ok(Self {
            network: network.to_string(),
            ledger_url,
            pools: file.pools,
            config_path,
        })
    }

    /// Look up a configured pool by its tokens, in either order
    pub fn find_pool(&self, token_a: &str, token_b: &str) -> Result<Option<&PoolEntry>> {
        let key = PairKey::new(token_a, token_b)?;
        Ok(self
            .pools
            .iter()
            .find(|pool| pool.pair_key().map_or(false, |k| k == key)))
    }

    pub fn find_pool_by_address(&self, address: &str) -> Option<&PoolEntry> {
        self.pools.iter().find(|pool| pool.address == address)
    }
}

/// Load pool definitions from a TOML file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&data).with_context(|| format!("Failed to parse config TOML: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
ledger_url = "http://ledger.internal:9000/api"

[[pools]]
address = "keeta_pool_kta_usdc"
token_a = "USDC"
token_b = "KTA"

[[pools]]
address = "keeta_pool_kta_eth"
token_a = "KTA"
token_b = "ETH"
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_network_defaults() {
        let config = NetworkConfig::new("testnet", None, None).unwrap();
        assert_eq!(config.network, "test");
        assert!(config.ledger_url.contains("test.network"));
        assert!(config.pools.is_empty());
    }

    #[test]
    fn test_unknown_network() {
        let err = NetworkConfig::new("ropsten", None, None).unwrap_err();
        assert!(err.to_string().contains("Unknown network"));
    }

    #[test]
    fn test_file_pools_and_url() {
        let file = write_config(SAMPLE);
        let config = NetworkConfig::new("main", None, Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.ledger_url, "http://ledger.internal:9000/api");
        assert_eq!(config.pools.len(), 2);

        let pool = config.find_pool("KTA", "USDC").unwrap().unwrap();
        assert_eq!(pool.address, "keeta_pool_kta_usdc");
        assert_eq!(config.find_pool("USDC", "KTA").unwrap(), Some(pool));
        assert!(config.find_pool("ETH", "USDC").unwrap().is_none());
        assert_eq!(
            config.find_pool_by_address("keeta_pool_kta_eth").map(|p| p.token_b.as_str()),
            Some("ETH")
        );
    }

    #[test]
    fn test_flag_overrides_file_url() {
        let file = write_config(SAMPLE);
        let config = NetworkConfig::new(
            "main",
            Some("http://override/api".to_string()),
            Some(file.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(config.ledger_url, "http://override/api");
    }

    #[test]
    fn test_missing_file() {
        let err = NetworkConfig::new("test", None, Some(PathBuf::from("/nonexistent/dexpool.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_example_config_parses() {
        let file = write_config(include_str!("../../dexpool.example.toml"));
        let config = NetworkConfig::new("test", None, Some(file.path().to_path_buf())).unwrap();
        assert!(config.find_pool("USDC", "KTA").unwrap().is_some());
    }

    #[test]
    fn test_find_pool_rejects_separator_in_token() {
        // "a:b"/"c" and "a"/"b:c" must not resolve to the same pool
        let file = write_config(SAMPLE);
        let config = NetworkConfig::new("main", None, Some(file.path().to_path_buf())).unwrap();
        assert!(config.find_pool("KTA:USDC", "ETH").is_err());
        assert!(config.find_pool("KTA", "USDC:ETH").is_err());
        assert!(config.find_pool("", "KTA").is_err());
    }

    #[test]
    fn test_rejects_pool_with_bad_token() {
        let file = write_config(
            "[[pools]]\naddress = \"keeta_pool_bad\"\ntoken_a = \"KTA:USDC\"\ntoken_b = \"ETH\"\n",
        );
        let err = NetworkConfig::new("test", None, Some(file.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("keeta_pool_bad"));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let file = write_config("seed = \"do-not-store-me\"\n");
        assert!(NetworkConfig::new("test", None, Some(file.path().to_path_buf())).is_err());
    }
}
