pub mod wallet_ledger;

pub use wallet_ledger::WalletLedger;
