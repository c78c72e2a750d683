use sea_orm::DatabaseConnection;

use crate::{CharityRegistry, EngineError, MIN_CASH_DONATION, PrizeCash, ResultEngine};

mod balances;
mod charities;
mod donations;
mod ledger;
mod users;

pub use balances::BalanceSnapshot;
pub use charities::CharityTotals;

/// Default page size for ledger listings.
pub const DEFAULT_TXN_LIMIT: u64 = 50;
/// Upper bound for ledger listings.
pub const MAX_TXN_LIMIT: u64 = 200;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// On `Err` the transaction is dropped without commit, which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    charities: CharityRegistry,
    min_cash_donation: PrizeCash,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn charities(&self) -> &CharityRegistry {
        &self.charities
    }

    pub fn min_cash_donation(&self) -> PrizeCash {
        self.min_cash_donation
    }
}

fn normalize_required_id(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidId(format!("{label} id must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    charities: CharityRegistry,
    min_cash_donation: Option<PrizeCash>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the charity registry donations resolve against.
    pub fn charities(mut self, charities: CharityRegistry) -> EngineBuilder {
        self.charities = charities;
        self
    }

    /// Override [`MIN_CASH_DONATION`].
    pub fn min_cash_donation(mut self, amount: PrizeCash) -> EngineBuilder {
        self.min_cash_donation = Some(amount);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let min_cash_donation = self.min_cash_donation.unwrap_or(MIN_CASH_DONATION);
        if !min_cash_donation.is_positive() {
            return Err(EngineError::InvalidAmount(
                "min_cash_donation must be > 0".to_string(),
            ));
        }
        Ok(Engine {
            database: self.database,
            charities: self.charities,
            min_cash_donation,
        })
    }
}
