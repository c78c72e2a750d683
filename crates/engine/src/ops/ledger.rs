use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*, sea_query::Expr};

use crate::{EngineError, NewTxn, PartyType, ResultEngine, Token, Txn, txns, users};

use super::Engine;

fn balance_column(token: Token) -> users::Column {
    match token {
        Token::Cash => users::Column::CashBalance,
        Token::Mana => users::Column::Balance,
    }
}

impl Engine {
    /// Appends one ledger entry and applies its balance effects.
    ///
    /// - A `USER` sender is debited with a guarded update, so a balance can
    ///   never go below zero even under concurrent writers.
    /// - A `USER` receiver is credited.
    /// - Nothing is committed here: the caller owns `db_tx`.
    pub async fn run_txn(&self, db_tx: &DatabaseTransaction, new: NewTxn) -> ResultEngine<Txn> {
        new.validate()?;

        if new.from_type == PartyType::User {
            self.debit_user(db_tx, &new.from_id, new.token, new.amount.cents())
                .await?;
        }
        if new.to_type == PartyType::User {
            self.credit_user(db_tx, &new.to_id, new.token, new.amount.cents())
                .await?;
        }

        let txn = Txn::from_new(new, Utc::now());
        txns::ActiveModel::from(&txn).insert(db_tx).await?;
        tracing::debug!(
            txn_id = %txn.id,
            category = txn.category.as_str(),
            from = %txn.from_id,
            to = %txn.to_id,
            amount = %txn.amount,
            "ledger entry appended"
        );
        Ok(txn)
    }

    async fn debit_user(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        token: Token,
        amount: i64,
    ) -> ResultEngine<()> {
        let column = balance_column(token);
        let result = users::Entity::update_many()
            .col_expr(column, Expr::col(column).sub(amount))
            .filter(users::Column::Id.eq(user_id))
            .filter(column.gte(amount))
            .exec(db_tx)
            .await?;
        if result.rows_affected > 0 {
            return Ok(());
        }

        self.require_user(db_tx, user_id).await?;
        Err(match token {
            Token::Cash => EngineError::InsufficientBalance,
            Token::Mana => EngineError::InsufficientFunds(format!(
                "{} balance of {user_id} cannot cover the debit",
                token.as_str()
            )),
        })
    }

    async fn credit_user(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        token: Token,
        amount: i64,
    ) -> ResultEngine<()> {
        let column = balance_column(token);
        let result = users::Entity::update_many()
            .col_expr(column, Expr::col(column).add(amount))
            .filter(users::Column::Id.eq(user_id))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("User".to_string()));
        }
        Ok(())
    }

    pub(super) async fn require_user(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("User".to_string()))
    }
}
