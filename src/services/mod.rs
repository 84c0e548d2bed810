pub mod post_services;
pub mod transaction_services;

pub use transaction_services::{TxOptions, run_in_transaction};
