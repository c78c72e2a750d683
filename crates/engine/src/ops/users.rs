use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
};

use crate::{
    CreditCmd, EngineError, NewTxn, PartyType, ResultEngine, Txn, TxnCategory, txns, users,
};

use super::{DEFAULT_TXN_LIMIT, Engine, MAX_TXN_LIMIT, normalize_required_id, with_tx};

/// Sender id used for bank-issued credits.
const BANK_ID: &str = "BANK";

impl Engine {
    /// Registers a user with zero balances.
    pub async fn create_user(&self, user_id: &str, password: &str) -> ResultEngine<()> {
        let user_id = normalize_required_id(user_id, "user")?;
        if password.is_empty() {
            return Err(EngineError::InvalidId(
                "password must not be empty".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(user_id.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                Err(EngineError::ExistingKey(user_id.clone()))
            } else {
                users::ActiveModel {
                    id: ActiveValue::Set(user_id.clone()),
                    password: ActiveValue::Set(password.to_string()),
                    balance: ActiveValue::Set(0),
                    cash_balance: ActiveValue::Set(0),
                    created_at: ActiveValue::Set(Utc::now()),
                }
                .insert(&db_tx)
                .await?;
                Ok(())
            }
        })
    }

    /// Credits a user through the ledger.
    ///
    /// Resolution payouts come from a `CONTRACT` party and count as
    /// redeemable; bonuses come from the bank and stay locked.
    pub async fn credit(&self, cmd: CreditCmd) -> ResultEngine<Txn> {
        let CreditCmd {
            user_id,
            amount,
            category,
            token,
            source_id,
        } = cmd;
        let (from_type, from_id) = match category {
            TxnCategory::ContractResolutionPayout => {
                let contract_id = source_id.ok_or_else(|| {
                    EngineError::InvalidTxn("payouts require a contract id".to_string())
                })?;
                (
                    PartyType::Contract,
                    normalize_required_id(&contract_id, "contract")?,
                )
            }
            TxnCategory::CashBonus => (PartyType::Bank, BANK_ID.to_string()),
            TxnCategory::Charity | TxnCategory::CashOut => {
                return Err(EngineError::InvalidTxn(format!(
                    "{} is not a credit category",
                    category.as_str()
                )));
            }
        };

        let new = NewTxn {
            category,
            from_type,
            from_id,
            to_type: PartyType::User,
            to_id: user_id,
            amount,
            token,
        };
        with_tx!(self, |db_tx| self.run_txn(&db_tx, new).await)
    }

    /// Ledger entries sent or received by `user_id`, newest first.
    pub async fn list_txns(&self, user_id: &str, limit: Option<u64>) -> ResultEngine<Vec<Txn>> {
        let limit = limit.unwrap_or(DEFAULT_TXN_LIMIT).clamp(1, MAX_TXN_LIMIT);
        let user_type = PartyType::User.as_str();

        let models: Vec<txns::Model> = with_tx!(self, |db_tx| {
            txns::Entity::find()
                .filter(
                    Condition::any()
                        .add(
                            Condition::all()
                                .add(txns::Column::FromType.eq(user_type))
                                .add(txns::Column::FromId.eq(user_id)),
                        )
                        .add(
                            Condition::all()
                                .add(txns::Column::ToType.eq(user_type))
                                .add(txns::Column::ToId.eq(user_id)),
                        ),
                )
                .order_by_desc(txns::Column::CreatedAt)
                .order_by_desc(txns::Column::Id)
                .limit(limit)
                .all(&db_tx)
                .await
                .map_err(EngineError::from)
        })?;

        models.into_iter().map(Txn::try_from).collect()
    }
}
