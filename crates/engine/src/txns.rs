//! Ledger entries.
//!
//! A [`Txn`] is an immutable record of value moving from one party to
//! another, tagged with a [`TxnCategory`] and a [`Token`]. Rows are only ever
//! inserted; balances on `users` are derived from them by the ledger writer.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, PrizeCash, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxnCategory {
    /// User donates prizecash to a charity.
    Charity,
    /// Winnings paid out by a resolved market. Redeemable.
    ContractResolutionPayout,
    /// Promotional cash. Spendable but not redeemable.
    CashBonus,
    /// User redeems prizecash for real-world value.
    CashOut,
}

impl TxnCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Charity => "CHARITY",
            Self::ContractResolutionPayout => "CONTRACT_RESOLUTION_PAYOUT",
            Self::CashBonus => "CASH_BONUS",
            Self::CashOut => "CASH_OUT",
        }
    }

    /// Whether cash credited under this category counts towards the
    /// redeemable part of a balance.
    pub fn is_redeemable_credit(self) -> bool {
        matches!(self, Self::ContractResolutionPayout)
    }

    pub fn redeemable_credits() -> Vec<&'static str> {
        [
            Self::Charity,
            Self::ContractResolutionPayout,
            Self::CashBonus,
            Self::CashOut,
        ]
        .into_iter()
        .filter(|c| c.is_redeemable_credit())
        .map(Self::as_str)
        .collect()
    }
}

impl TryFrom<&str> for TxnCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "CHARITY" => Ok(Self::Charity),
            "CONTRACT_RESOLUTION_PAYOUT" => Ok(Self::ContractResolutionPayout),
            "CASH_BONUS" => Ok(Self::CashBonus),
            "CASH_OUT" => Ok(Self::CashOut),
            other => Err(EngineError::InvalidTxn(format!(
                "invalid txn category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartyType {
    User,
    Charity,
    Bank,
    Contract,
}

impl PartyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Charity => "CHARITY",
            Self::Bank => "BANK",
            Self::Contract => "CONTRACT",
        }
    }
}

impl TryFrom<&str> for PartyType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "USER" => Ok(Self::User),
            "CHARITY" => Ok(Self::Charity),
            "BANK" => Ok(Self::Bank),
            "CONTRACT" => Ok(Self::Contract),
            other => Err(EngineError::InvalidTxn(format!(
                "invalid party type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Token {
    #[default]
    Cash,
    Mana,
}

impl Token {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Mana => "MANA",
        }
    }
}

impl TryFrom<&str> for Token {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "CASH" => Ok(Self::Cash),
            "MANA" => Ok(Self::Mana),
            other => Err(EngineError::InvalidTxn(format!("invalid token: {other}"))),
        }
    }
}

/// A ledger entry not yet written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTxn {
    pub category: TxnCategory,
    pub from_type: PartyType,
    pub from_id: String,
    pub to_type: PartyType,
    pub to_id: String,
    pub amount: PrizeCash,
    pub token: Token,
}

impl NewTxn {
    /// The single entry recorded for a donation.
    pub fn donation(user_id: &str, charity_id: &str, amount: PrizeCash) -> Self {
        Self {
            category: TxnCategory::Charity,
            from_type: PartyType::User,
            from_id: user_id.to_string(),
            to_type: PartyType::Charity,
            to_id: charity_id.to_string(),
            amount,
            token: Token::Cash,
        }
    }

    pub(crate) fn validate(&self) -> ResultEngine<()> {
        if !self.amount.is_positive() {
            return Err(EngineError::InvalidAmount("amount must be > 0".to_string()));
        }
        if self.from_type == self.to_type && self.from_id == self.to_id {
            return Err(EngineError::InvalidTxn(
                "from and to must differ".to_string(),
            ));
        }
        if self.from_id.trim().is_empty() || self.to_id.trim().is_empty() {
            return Err(EngineError::InvalidTxn(
                "party ids must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Txn {
    pub id: Uuid,
    pub category: TxnCategory,
    pub from_type: PartyType,
    pub from_id: String,
    pub to_type: PartyType,
    pub to_id: String,
    pub amount: PrizeCash,
    pub token: Token,
    pub created_at: DateTime<Utc>,
}

impl Txn {
    pub(crate) fn from_new(new: NewTxn, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: new.category,
            from_type: new.from_type,
            from_id: new.from_id,
            to_type: new.to_type,
            to_id: new.to_id,
            amount: new.amount,
            token: new.token,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "txns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category: String,
    pub from_type: String,
    pub from_id: String,
    pub to_type: String,
    pub to_id: String,
    pub amount: i64,
    pub token: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Txn> for ActiveModel {
    fn from(txn: &Txn) -> Self {
        Self {
            id: ActiveValue::Set(txn.id.to_string()),
            category: ActiveValue::Set(txn.category.as_str().to_string()),
            from_type: ActiveValue::Set(txn.from_type.as_str().to_string()),
            from_id: ActiveValue::Set(txn.from_id.clone()),
            to_type: ActiveValue::Set(txn.to_type.as_str().to_string()),
            to_id: ActiveValue::Set(txn.to_id.clone()),
            amount: ActiveValue::Set(txn.amount.cents()),
            token: ActiveValue::Set(txn.token.as_str().to_string()),
            created_at: ActiveValue::Set(txn.created_at),
        }
    }
}

impl TryFrom<Model> for Txn {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidTxn("invalid txn id".to_string()))?,
            category: TxnCategory::try_from(model.category.as_str())?,
            from_type: PartyType::try_from(model.from_type.as_str())?,
            from_id: model.from_id,
            to_type: PartyType::try_from(model.to_type.as_str())?,
            to_id: model.to_id,
            amount: PrizeCash::new(model.amount),
            token: Token::try_from(model.token.as_str())?,
            created_at: model.created_at,
        })
    }
}
