//! Tests for wallet sessions

use std::sync::Arc;
use std::thread;

use hdwallet_core::coin::{symbols_for, ChainFamily};
use hdwallet_core::{
    available_coin_list, mnemonic_from_entropy, supported_symbols, Error, HdWallet, Network, Seed, WalletOptions,
};

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test]
fn test_end_to_end_testnet_fixtures() {
    let mnemonic = mnemonic_from_entropy(&[0u8; 16]).unwrap();
    let wallet = HdWallet::from_mnemonic(&mnemonic, Network::Testnet).unwrap();

    assert_eq!(wallet.derive_address("BTC").unwrap(), "mkpZhYtJu2r87Js3pDiWJDmPte2NRZ8bJV");
    assert_eq!(
        wallet.derive_address("ETH").unwrap(),
        "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
    );
}

#[test]
fn test_determinism_across_sessions() {
    let first = HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap();
    let second = HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap();

    for symbol in supported_symbols() {
        assert_eq!(first.derive_address(symbol).unwrap(), second.derive_address(symbol).unwrap());
        assert_eq!(
            first.derive_public_key(symbol).unwrap(),
            second.derive_public_key(symbol).unwrap()
        );
        assert_eq!(
            *first.derive_private_key(symbol).unwrap(),
            *second.derive_private_key(symbol).unwrap()
        );
    }
}

#[test]
fn test_every_symbol_derives() {
    for network in [Network::Mainnet, Network::Testnet] {
        let wallet = HdWallet::from_mnemonic(MNEMONIC, network).unwrap();
        for symbol in wallet.supported_symbols() {
            assert!(!wallet.derive_address(symbol).unwrap().is_empty(), "{symbol}");
            assert!(!wallet.derive_public_key(symbol).unwrap().is_empty(), "{symbol}");
            assert!(!wallet.derive_private_key(symbol).unwrap().is_empty(), "{symbol}");
        }
    }
}

#[test]
fn test_alias_groups_share_keys() {
    let wallet = HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap();

    for family in [ChainFamily::Ethereum, ChainFamily::Tron] {
        let symbols = symbols_for(family);
        let address = wallet.derive_address(symbols[0]).unwrap();
        let public_key = wallet.derive_public_key(symbols[0]).unwrap();

        for symbol in &symbols[1..] {
            assert_eq!(wallet.derive_address(symbol).unwrap(), address);
            assert_eq!(wallet.derive_public_key(symbol).unwrap(), public_key);
        }
    }

    // Omni balances live on the Bitcoin address
    assert_eq!(
        wallet.derive_address("USDT(Omni)").unwrap(),
        wallet.derive_address("BTC").unwrap()
    );
}

#[test]
fn test_networks_differ_where_chains_do() {
    let main = HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap();
    let test = HdWallet::from_mnemonic(MNEMONIC, Network::Testnet).unwrap();

    assert_ne!(main.derive_address("BTC").unwrap(), test.derive_address("BTC").unwrap());
    assert_ne!(main.derive_address("BCH").unwrap(), test.derive_address("BCH").unwrap());

    for symbol in ["ETH", "TRX", "XRP"] {
        assert_eq!(main.derive_address(symbol).unwrap(), test.derive_address(symbol).unwrap());
    }
}

#[test]
fn test_unknown_coin() {
    let wallet = HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap();

    for symbol in ["NOT_A_COIN", "btc", "eth", "", "USDT"] {
        assert_eq!(
            wallet.derive_address(symbol).unwrap_err(),
            Error::UnknownCoin(symbol.to_string())
        );
        assert!(matches!(wallet.derive_private_key(symbol), Err(Error::UnknownCoin(_))));
        assert!(matches!(wallet.decode_tx(symbol, "00"), Err(Error::UnknownCoin(_))));
    }
}

#[test]
fn test_session_construction_guards() {
    assert_eq!(Seed::from_bytes(&[]).unwrap_err(), Error::EmptySeed);

    let bad_checksum = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
    assert!(matches!(
        HdWallet::from_mnemonic(bad_checksum, Network::Mainnet),
        Err(Error::InvalidMnemonic(_))
    ));
    assert!(matches!(
        HdWallet::from_mnemonic("not a real mnemonic phrase at all", Network::Mainnet),
        Err(Error::InvalidMnemonic(_))
    ));
}

#[test]
fn test_from_seed_matches_mnemonic() {
    let seed = hdwallet_core::seed_from_mnemonic(MNEMONIC, "").unwrap();
    let from_seed = HdWallet::from_seed(seed, Network::Mainnet).unwrap();
    let from_mnemonic = HdWallet::with_options(MNEMONIC, WalletOptions::new(Network::Mainnet)).unwrap();

    assert_eq!(
        from_seed.derive_address("XRP").unwrap(),
        from_mnemonic.derive_address("XRP").unwrap()
    );
}

#[test]
fn test_concurrent_derivation() {
    let wallet = Arc::new(HdWallet::from_mnemonic(MNEMONIC, Network::Mainnet).unwrap());
    let expected: Vec<String> = supported_symbols()
        .into_iter()
        .map(|symbol| wallet.derive_address(symbol).unwrap())
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let wallet = Arc::clone(&wallet);
            thread::spawn(move || {
                supported_symbols()
                    .into_iter()
                    .map(|symbol| wallet.derive_address(symbol).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_coin_list() {
    let list = available_coin_list();
    assert_eq!(list.split(' ').count(), supported_symbols().len());
    assert!(list.starts_with("BTC BCH USDT(Omni) ETH"));
}
