use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{DonateCmd, EngineError, NewTxn, PrizeCash, ResultEngine, Txn};

use super::{BalanceSnapshot, Engine, with_tx};

impl Engine {
    /// Donates prizecash from `cmd.user_id` to a registered charity.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// 1. the charity exists (before any database access)
    /// 2. `amount <= cash_balance`
    /// 3. `amount <= redeemable`
    /// 4. `amount >= min_cash_donation`
    ///
    /// The balance read and the ledger write share one transaction. Every
    /// call writes a new entry: submitting the same donation twice donates
    /// twice.
    pub async fn donate(&self, cmd: DonateCmd) -> ResultEngine<Txn> {
        let DonateCmd {
            user_id,
            charity_id,
            amount,
        } = cmd;
        let charity = self.charities.require(&charity_id)?;

        let txn = with_tx!(self, |db_tx| {
            self.donate_in_tx(&db_tx, &user_id, &charity.id, amount)
                .await
        })?;
        tracing::info!(
            txn_id = %txn.id,
            user_id = %user_id,
            charity_id = %charity.id,
            amount = %amount,
            "donation recorded"
        );
        Ok(txn)
    }

    async fn donate_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        charity_id: &str,
        amount: PrizeCash,
    ) -> ResultEngine<Txn> {
        let BalanceSnapshot {
            cash_balance,
            redeemable,
        } = self.redeemable_prize_cash(db_tx, user_id).await?;

        if cash_balance < amount {
            return Err(EngineError::InsufficientBalance);
        }
        if redeemable < amount {
            return Err(EngineError::InsufficientRedeemable(redeemable));
        }
        if amount < self.min_cash_donation {
            return Err(EngineError::BelowMinimum(self.min_cash_donation));
        }

        self.run_txn(db_tx, NewTxn::donation(user_id, charity_id, amount))
            .await
    }
}
