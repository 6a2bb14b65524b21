pub mod wallet_card;

pub use wallet_card::{CardStatus, DeductionRecord, WalletCard};
