//! Coin registry
//!
//! Maps coin symbols to the factory of the chain module serving them.
//! Several symbols may share a factory (ERC20 tokens route to Ethereum).
//! The table is the single source of truth: routing and the advertised
//! coin list are both read from it.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::crypto::mnemonic::Seed;
use crate::error::{Error, Result};
use crate::network::Network;
use super::{
    create_bitcoin, create_bitcoin_cash, create_ethereum, create_omni, create_ripple, create_tron,
    ChainFamily, Coin, CoinContext, CoinFactory,
};

/// One registered symbol
#[derive(Clone, Copy)]
pub struct CoinEntry {
    pub symbol: &'static str,
    pub family: ChainFamily,
    pub factory: CoinFactory,
}

impl CoinEntry {
    const fn new(symbol: &'static str, family: ChainFamily, factory: CoinFactory) -> Self {
        Self {
            symbol,
            family,
            factory,
        }
    }

    /// Build the chain module for this symbol
    pub fn create<'a>(&self, seed: &'a Seed, network: Network) -> Result<Box<dyn Coin + 'a>> {
        (self.factory)(CoinContext {
            symbol: self.symbol,
            seed,
            network,
        })
    }
}

impl fmt::Debug for CoinEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinEntry")
            .field("symbol", &self.symbol)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

/// Registered symbols in display order
static COINS: &[CoinEntry] = &[
    CoinEntry::new("BTC", ChainFamily::Bitcoin, create_bitcoin),
    CoinEntry::new("BCH", ChainFamily::BitcoinCash, create_bitcoin_cash),
    CoinEntry::new("USDT(Omni)", ChainFamily::Omni, create_omni),
    CoinEntry::new("ETH", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("XT", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("THM", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("ALI", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("RED", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("USO", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("BTK", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("EGT", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("HOTC(HOTCOIN)", ChainFamily::Ethereum, create_ethereum),
    CoinEntry::new("XRP", ChainFamily::Ripple, create_ripple),
    CoinEntry::new("TRX", ChainFamily::Tron, create_tron),
    CoinEntry::new("BTT", ChainFamily::Tron, create_tron),
];

fn index() -> &'static HashMap<&'static str, &'static CoinEntry> {
    static INDEX: OnceLock<HashMap<&'static str, &'static CoinEntry>> = OnceLock::new();
    INDEX.get_or_init(|| COINS.iter().map(|entry| (entry.symbol, entry)).collect())
}

/// Look up the entry for a symbol (case-sensitive)
pub fn resolve(symbol: &str) -> Result<&'static CoinEntry> {
    match index().get(symbol) {
        Some(entry) => {
            debug!(symbol, family = %entry.family, "resolved coin");
            Ok(*entry)
        }
        None => {
            warn!(symbol, "unknown coin symbol");
            Err(Error::UnknownCoin(symbol.to_string()))
        }
    }
}

/// Build the chain module serving `symbol`
pub fn create_coin<'a>(symbol: &str, seed: &'a Seed, network: Network) -> Result<Box<dyn Coin + 'a>> {
    resolve(symbol)?.create(seed, network)
}

/// All registered symbols in display order
pub fn supported_symbols() -> Vec<&'static str> {
    COINS.iter().map(|entry| entry.symbol).collect()
}

/// Symbols served by one chain family
pub fn symbols_for(family: ChainFamily) -> Vec<&'static str> {
    COINS
        .iter()
        .filter(|entry| entry.family == family)
        .map(|entry| entry.symbol)
        .collect()
}

/// Space-separated coin list
pub fn available_coin_list() -> String {
    supported_symbols().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_symbol_resolves() {
        for symbol in supported_symbols() {
            assert_eq!(resolve(symbol).unwrap().symbol, symbol);
        }
    }

    #[test]
    fn test_factories_carry_routing_symbol() {
        let seed = crate::crypto::mnemonic::seed_from_mnemonic(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
            "",
        )
        .unwrap();

        for entry in COINS {
            let coin = entry.create(&seed, Network::Testnet).unwrap();
            assert_eq!(coin.symbol(), entry.symbol);
            assert_eq!(coin.network(), Network::Testnet);
        }
    }

    #[test]
    fn test_symbols_are_unique() {
        let unique: HashSet<_> = supported_symbols().into_iter().collect();
        assert_eq!(unique.len(), COINS.len());
        assert_eq!(index().len(), COINS.len());
    }

    #[test]
    fn test_unknown_and_case_sensitive() {
        assert_eq!(
            resolve("NOT_A_COIN").unwrap_err(),
            Error::UnknownCoin("NOT_A_COIN".to_string())
        );
        assert!(matches!(resolve("btc"), Err(Error::UnknownCoin(_))));
        assert!(matches!(resolve(""), Err(Error::UnknownCoin(_))));
    }

    #[test]
    fn test_coin_list_order() {
        assert_eq!(
            available_coin_list(),
            "BTC BCH USDT(Omni) ETH XT THM ALI RED USO BTK EGT HOTC(HOTCOIN) XRP TRX BTT"
        );
        assert_eq!(available_coin_list(), available_coin_list());
    }

    #[test]
    fn test_alias_groups() {
        let erc20 = symbols_for(ChainFamily::Ethereum);
        assert_eq!(erc20.len(), 9);
        assert_eq!(erc20[0], "ETH");
        assert_eq!(symbols_for(ChainFamily::Tron), vec!["TRX", "BTT"]);
    }
}
