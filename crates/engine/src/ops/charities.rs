use sea_orm::{QueryFilter, QuerySelect, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{EngineError, PartyType, PrizeCash, ResultEngine, Token, TxnCategory, txns};

use super::{Engine, with_tx};

/// Aggregate donations received by one charity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharityTotals {
    pub charity_id: String,
    pub total: PrizeCash,
    pub donors: u64,
}

impl Engine {
    /// Sums every CASH donation made to `charity_id`.
    pub async fn charity_totals(&self, charity_id: &str) -> ResultEngine<CharityTotals> {
        let charity = self.charities.require(charity_id)?;

        let row: Option<(Option<i64>, i64)> = with_tx!(self, |db_tx| {
            txns::Entity::find()
                .select_only()
                .column_as(Expr::col(txns::Column::Amount).sum(), "total")
                .column_as(Expr::col(txns::Column::FromId).count_distinct(), "donors")
                .filter(txns::Column::Category.eq(TxnCategory::Charity.as_str()))
                .filter(txns::Column::ToType.eq(PartyType::Charity.as_str()))
                .filter(txns::Column::ToId.eq(charity.id.as_str()))
                .filter(txns::Column::Token.eq(Token::Cash.as_str()))
                .into_tuple::<(Option<i64>, i64)>()
                .one(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;

        let (total, donors) = row.unwrap_or((None, 0));
        Ok(CharityTotals {
            charity_id: charity.id.clone(),
            total: PrizeCash::new(total.unwrap_or(0)),
            donors: u64::try_from(donors).unwrap_or(0),
        })
    }
}
