pub mod balance_checker;

pub use balance_checker::BalanceChecker;
