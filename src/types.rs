//! Common types used throughout the client
//!
//! Shared type aliases and small enums used by more than one module.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method used by TronGrid endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    GET,
    POST,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::GET => f.write_str("GET"),
            Method::POST => f.write_str("POST"),
        }
    }
}

// ============================================================================
// Network
// ============================================================================

/// TronGrid network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    #[default]
    Mainnet,
    /// Shasta testnet
    Shasta,
    /// Nile testnet
    Nile,
}

impl Network {
    /// Base URL of the public TronGrid endpoint for this network
    pub fn base_url(self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.trongrid.io",
            Network::Shasta => "https://api.shasta.trongrid.io",
            Network::Nile => "https://nile.trongrid.io",
        }
    }
}

impl std::str::FromStr for Network {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "shasta" | "shastatestnet" => Ok(Network::Shasta),
            "nile" | "niletestnet" => Ok(Network::Nile),
            other => Err(crate::error::Error::config(format!(
                "unknown network '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::GET), reqwest::Method::GET);
        assert_eq!(reqwest::Method::from(Method::POST), reqwest::Method::POST);
        assert_eq!(Method::default(), Method::GET);
    }

    #[test_case("mainnet", Network::Mainnet ; "mainnet")]
    #[test_case("Shasta", Network::Shasta ; "shasta mixed case")]
    #[test_case("niletestnet", Network::Nile ; "nile long form")]
    fn test_network_from_str(input: &str, expected: Network) {
        assert_eq!(input.parse::<Network>().unwrap(), expected);
    }

    #[test]
    fn test_network_unknown() {
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_network_serde() {
        let net: Network = serde_json::from_str("\"nile\"").unwrap();
        assert_eq!(net, Network::Nile);
        assert_eq!(net.base_url(), "https://nile.trongrid.io");
    }
}
