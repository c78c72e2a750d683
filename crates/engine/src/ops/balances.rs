use sea_orm::{
    Condition, DatabaseTransaction, QueryFilter, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{PartyType, PrizeCash, ResultEngine, Token, TxnCategory, txns, users};

use super::{Engine, with_tx};

/// Point-in-time view of a user's prizecash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub cash_balance: PrizeCash,
    /// Part of `cash_balance` that may be donated or cashed out.
    pub redeemable: PrizeCash,
}

impl Engine {
    /// Computes `{cash_balance, redeemable}` for `user_id` as seen by `db_tx`,
    /// after taking the user's row lock.
    ///
    /// The lock is a self-assigning `UPDATE`: a row write lock on Postgres and
    /// the database write lock on SQLite. A second transaction asking for the
    /// same snapshot waits until the first one commits or rolls back.
    pub async fn redeemable_prize_cash(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<BalanceSnapshot> {
        self.lock_user(db_tx, user_id).await?;
        self.balance_snapshot(db_tx, user_id).await
    }

    /// Read-only balance for display.
    pub async fn prize_cash_balance(&self, user_id: &str) -> ResultEngine<BalanceSnapshot> {
        with_tx!(self, |db_tx| self.balance_snapshot(&db_tx, user_id).await)
    }

    async fn lock_user(&self, db_tx: &DatabaseTransaction, user_id: &str) -> ResultEngine<()> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::CashBalance,
                Expr::col(users::Column::CashBalance).into(),
            )
            .filter(users::Column::Id.eq(user_id))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(crate::EngineError::KeyNotFound("User".to_string()));
        }
        Ok(())
    }

    /// Redeemable = redeemable CASH credits − every CASH debit, clamped into
    /// `[0, cash_balance]`. Debits consume the redeemable part first.
    async fn balance_snapshot(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<BalanceSnapshot> {
        let user = self.require_user(db_tx, user_id).await?;
        let cash_balance = PrizeCash::new(user.cash_balance);

        let credits = sum_cash(
            db_tx,
            Condition::all()
                .add(txns::Column::ToType.eq(PartyType::User.as_str()))
                .add(txns::Column::ToId.eq(user_id))
                .add(txns::Column::Category.is_in(TxnCategory::redeemable_credits())),
        )
        .await?;
        let debits = sum_cash(
            db_tx,
            Condition::all()
                .add(txns::Column::FromType.eq(PartyType::User.as_str()))
                .add(txns::Column::FromId.eq(user_id)),
        )
        .await?;

        let redeemable = (credits - debits).clamp_to(PrizeCash::ZERO, cash_balance);
        Ok(BalanceSnapshot {
            cash_balance,
            redeemable,
        })
    }
}

async fn sum_cash(db_tx: &DatabaseTransaction, condition: Condition) -> ResultEngine<PrizeCash> {
    let total: Option<i64> = txns::Entity::find()
        .select_only()
        .column_as(Expr::col(txns::Column::Amount).sum(), "total")
        .filter(txns::Column::Token.eq(Token::Cash.as_str()))
        .filter(condition)
        .into_tuple::<Option<i64>>()
        .one(db_tx)
        .await?
        .flatten();
    Ok(PrizeCash::new(total.unwrap_or(0)))
}
