pub mod bench;
pub mod checkout;
pub mod games;
pub mod resolve;
pub mod simulate;
