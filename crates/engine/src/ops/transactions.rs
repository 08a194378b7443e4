use chrono::Utc;

use crate::{
    AddTransactionCmd, DeleteTransactionCmd, EditTransactionCmd, Engine, LedgerStore, Period,
    ResultEngine, Transaction, ledger::normalize_period_name, users::normalize_email,
};

impl<S: LedgerStore> Engine<S> {
    /// Appends a transaction to a period of the user's ledger.
    ///
    /// The period is created on first use. Returns every period of the
    /// ledger as stored after the change.
    pub async fn add_transaction(&self, cmd: AddTransactionCmd) -> ResultEngine<Vec<Period>> {
        let user_email = normalize_email(&cmd.user_email)?;
        let period = normalize_period_name(&cmd.period)?;
        let tx = Transaction::new(cmd.kind, cmd.amount_minor, Utc::now())?;
        let tx_id = tx.id;

        let periods = self
            .mutate_ledger(&user_email, &period, |ledger| {
                ledger.find_or_create(&period).push(tx)?;
                Ok(())
            })
            .await?;

        tracing::info!(
            user = %user_email,
            period = %period,
            transaction = %tx_id,
            kind = cmd.kind.as_str(),
            amount = cmd.amount_minor,
            "transaction added"
        );
        Ok(periods)
    }

    /// Replaces kind and amount of a transaction, resetting its date.
    ///
    /// The period totals move by the difference between the old and the new
    /// contribution, so a kind change takes the old amount out of one side
    /// and puts the new amount on the other.
    pub async fn edit_transaction(&self, cmd: EditTransactionCmd) -> ResultEngine<Vec<Period>> {
        let user_email = normalize_email(&cmd.user_email)?;
        let period = normalize_period_name(&cmd.period)?;

        let periods = self
            .mutate_ledger(&user_email, &period, |ledger| {
                ledger.period_mut(&period)?.edit(
                    cmd.transaction_id,
                    cmd.kind,
                    cmd.amount_minor,
                    Utc::now(),
                )?;
                Ok(())
            })
            .await?;

        tracing::info!(
            user = %user_email,
            period = %period,
            transaction = %cmd.transaction_id,
            kind = cmd.kind.as_str(),
            amount = cmd.amount_minor,
            "transaction updated"
        );
        Ok(periods)
    }

    /// Removes a transaction and takes its amount out of the period totals.
    pub async fn delete_transaction(&self, cmd: DeleteTransactionCmd) -> ResultEngine<Vec<Period>> {
        let user_email = normalize_email(&cmd.user_email)?;
        let period = normalize_period_name(&cmd.period)?;

        let periods = self
            .mutate_ledger(&user_email, &period, |ledger| {
                ledger.period_mut(&period)?.remove(cmd.transaction_id)?;
                Ok(())
            })
            .await?;

        tracing::info!(
            user = %user_email,
            period = %period,
            transaction = %cmd.transaction_id,
            "transaction deleted"
        );
        Ok(periods)
    }
}
