//! Command structs for engine write operations.
//!
//! These types group parameters for the donation and credit operations,
//! keeping call sites readable.

use crate::{PrizeCash, Token, TxnCategory};

/// Donate prizecash to a charity.
///
/// `user_id` must come from the authentication layer, never from the
/// request body.
#[derive(Clone, Debug)]
pub struct DonateCmd {
    pub user_id: String,
    pub charity_id: String,
    pub amount: PrizeCash,
}

impl DonateCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, charity_id: impl Into<String>, amount: PrizeCash) -> Self {
        Self {
            user_id: user_id.into(),
            charity_id: charity_id.into(),
            amount,
        }
    }
}

/// Credit a user from the bank or a resolved contract.
#[derive(Clone, Debug)]
pub struct CreditCmd {
    pub user_id: String,
    pub amount: PrizeCash,
    pub category: TxnCategory,
    pub token: Token,
    /// Paying contract id for payouts; ignored for bank credits.
    pub source_id: Option<String>,
}

impl CreditCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount: PrizeCash, category: TxnCategory) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            category,
            token: Token::Cash,
            source_id: None,
        }
    }

    #[must_use]
    pub fn token(mut self, token: Token) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }
}
