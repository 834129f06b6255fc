//! Network selection for a wallet session

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main or test network.
///
/// Chains without a separate test network derive identical material for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// Map the boolean flag used at the binding boundary
    pub fn from_test_net(test_net: bool) -> Self {
        if test_net {
            Self::Testnet
        } else {
            Self::Mainnet
        }
    }

    pub fn is_testnet(&self) -> bool {
        matches!(self, Self::Testnet)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
        }
    }
}

/// Network name that is neither main nor test
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown network: {0} (expected mainnet or testnet)")]
pub struct ParseNetworkError(pub String);

impl FromStr for Network {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Self::Mainnet),
            "test" | "testnet" => Ok(Self::Testnet),
            _ => Err(ParseNetworkError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network() {
        assert_eq!("main".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("TestNet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!(
            "regtest".parse::<Network>(),
            Err(ParseNetworkError("regtest".to_string()))
        );
        assert_eq!(
            ParseNetworkError("regtest".to_string()).to_string(),
            "Unknown network: regtest (expected mainnet or testnet)"
        );
        assert_eq!(Network::from_test_net(true), Network::Testnet);
    }

    #[test]
    fn test_network_serde() {
        assert_eq!(serde_json::to_string(&Network::Testnet).unwrap(), "\"testnet\"");
        let network: Network = serde_json::from_str("\"mainnet\"").unwrap();
        assert_eq!(network, Network::Mainnet);
    }
}
