//! Prizecash ledger engine.
//!
//! The engine owns every read and write of user balances and of the `txns`
//! ledger. Donations are validated against a point-in-time
//! [`BalanceSnapshot`] and recorded in the same database transaction.

pub use charities::{Charity, CharityRegistry};
pub use commands::{CreditCmd, DonateCmd};
pub use error::EngineError;
pub use money::PrizeCash;
pub use ops::{
    BalanceSnapshot, CharityTotals, DEFAULT_TXN_LIMIT, Engine, EngineBuilder, MAX_TXN_LIMIT,
};
pub use txns::{NewTxn, PartyType, Token, Txn, TxnCategory};

mod charities;
mod commands;
mod error;
mod money;
mod ops;
mod txns;
mod users;

type ResultEngine<T> = Result<T, EngineError>;

/// Minimum donation when none is configured.
pub const MIN_CASH_DONATION: PrizeCash = PrizeCash::whole(25);
