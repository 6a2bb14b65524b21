pub mod catalog;
pub mod documents;
pub mod wallet;
