//! The module contains the error the engine can throw.
//!
//! The donation errors are:
//!
//! - [`KeyNotFound`] thrown when a charity or a user is unknown.
//! - [`InsufficientBalance`] thrown when the cash balance cannot cover the
//!   amount.
//! - [`InsufficientRedeemable`] thrown when the redeemable part of the
//!   balance cannot cover the amount.
//! - [`BelowMinimum`] thrown when the amount is under the configured minimum.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
//!  [`InsufficientRedeemable`]: EngineError::InsufficientRedeemable
//!  [`BelowMinimum`]: EngineError::BelowMinimum
use sea_orm::DbErr;
use thiserror::Error;

use crate::PrizeCash;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("Insufficient prizecash balance")]
    InsufficientBalance,
    #[error("Insufficient redeemable prizecash. Only {0} prizecash can be redeemed.")]
    InsufficientRedeemable(PrizeCash),
    #[error("Minimum donation is {0} prizecash")]
    BelowMinimum(PrizeCash),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid ledger entry: {0}")]
    InvalidTxn(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InsufficientBalance, Self::InsufficientBalance) => true,
            (Self::InsufficientRedeemable(a), Self::InsufficientRedeemable(b)) => a == b,
            (Self::BelowMinimum(a), Self::BelowMinimum(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidTxn(a), Self::InvalidTxn(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeemable_message_embeds_amount() {
        let err = EngineError::InsufficientRedeemable(PrizeCash::new(1250));
        assert_eq!(
            err.to_string(),
            "Insufficient redeemable prizecash. Only 12.50 prizecash can be redeemed."
        );
    }

    #[test]
    fn minimum_message_embeds_minimum() {
        let err = EngineError::BelowMinimum(PrizeCash::whole(5));
        assert_eq!(err.to_string(), "Minimum donation is 5 prizecash");
    }

    #[test]
    fn not_found_message_names_the_key() {
        let err = EngineError::KeyNotFound("Charity".to_string());
        assert_eq!(err.to_string(), "Charity not found");
    }
}
