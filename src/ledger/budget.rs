use tracing::{info, warn};

use crate::config::Config;
use crate::errors::BudgetError;

use super::calendar::{Instant, LocalZone, SystemZone};
use super::ids::IdGenerator;
use super::recurring::schedule_for_window;
use super::transaction::{
    CreateRecurringTransaction, EditRecurringTransaction, RecurringTransaction,
    ScheduledTransaction, RECURRING_TRANSACTION,
};

/// Owns recurring transaction definitions and the most recently viewed schedule.
///
/// All state is mutated through `&mut self`, so one `Budget` has exactly one
/// writer. Share it across threads only behind a single lock.
#[derive(Debug)]
pub struct Budget {
    recurring_transactions: Vec<RecurringTransaction>,
    scheduled_transactions: Vec<ScheduledTransaction>,
    error: Option<String>,
    ids: IdGenerator,
    zone: Box<dyn LocalZone>,
}

impl Default for Budget {
    fn default() -> Self {
        Self::new()
    }
}

impl Budget {
    /// Creates an empty budget that reads calendar dates off the system clock zone.
    pub fn new() -> Self {
        Self::with_zone(SystemZone)
    }

    pub fn with_zone(zone: impl LocalZone + 'static) -> Self {
        Self::with_boxed_zone(Box::new(zone))
    }

    pub fn with_boxed_zone(zone: Box<dyn LocalZone>) -> Self {
        Self {
            recurring_transactions: Vec::new(),
            scheduled_transactions: Vec::new(),
            error: None,
            ids: IdGenerator::new(),
            zone,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_boxed_zone(config.local_zone())
    }

    pub fn zone(&self) -> &dyn LocalZone {
        self.zone.as_ref()
    }

    /// Stores a new recurring transaction and returns it with its assigned id.
    pub fn add_recurring_transaction(
        &mut self,
        create: CreateRecurringTransaction,
    ) -> &RecurringTransaction {
        self.error = None;
        let recurrence_rule = create.recurrence_rule.normalize(self.zone.as_ref());
        let id = self.gen_id(RECURRING_TRANSACTION);
        info!(id, name = %create.name, rule = %recurrence_rule, "recurring transaction added");
        self.recurring_transactions.push(RecurringTransaction {
            id,
            name: create.name,
            amount: create.amount,
            recurrence_rule,
        });
        &self.recurring_transactions[self.recurring_transactions.len() - 1]
    }

    /// Replaces name, amount, and rule of an existing recurring transaction.
    ///
    /// An unknown id leaves the budget untouched and is reported both through
    /// the returned error and [`Budget::error`].
    pub fn edit_recurring_transaction(
        &mut self,
        update: EditRecurringTransaction,
    ) -> Result<&RecurringTransaction, BudgetError> {
        self.error = None;
        let Some(index) = self.position(update.id) else {
            return Err(self.record_missing(update.id));
        };
        let recurrence_rule = update.recurrence_rule.normalize(self.zone.as_ref());
        let txn = &mut self.recurring_transactions[index];
        txn.name = update.name;
        txn.amount = update.amount;
        txn.recurrence_rule = recurrence_rule;
        info!(id = txn.id, name = %txn.name, rule = %txn.recurrence_rule, "recurring transaction edited");
        Ok(&self.recurring_transactions[index])
    }

    /// Removes a recurring transaction, returning it. Its id is not reissued.
    pub fn delete_recurring_transaction(
        &mut self,
        id: u64,
    ) -> Result<RecurringTransaction, BudgetError> {
        self.error = None;
        let Some(index) = self.position(id) else {
            return Err(self.record_missing(id));
        };
        let removed = self.recurring_transactions.remove(index);
        info!(id, name = %removed.name, "recurring transaction deleted");
        Ok(removed)
    }

    pub fn view_recurring_transactions(&self) -> &[RecurringTransaction] {
        &self.recurring_transactions
    }

    pub fn recurring_transaction(&self, id: u64) -> Option<&RecurringTransaction> {
        self.recurring_transactions.iter().find(|txn| txn.id == id)
    }

    /// Recomputes the schedule for the window, replacing the cached view.
    pub fn view_scheduled_transactions(
        &mut self,
        start: &Instant,
        end: &Instant,
    ) -> &[ScheduledTransaction] {
        self.error = None;
        self.scheduled_transactions = schedule_for_window(
            &self.recurring_transactions,
            start,
            end,
            self.zone.as_ref(),
        );
        &self.scheduled_transactions
    }

    /// Schedule produced by the last call to [`Budget::view_scheduled_transactions`].
    pub fn scheduled_transactions(&self) -> &[ScheduledTransaction] {
        &self.scheduled_transactions
    }

    /// Message left by the last recoverable failure, if the last operation failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn gen_id(&mut self, kind: &str) -> u64 {
        self.ids.next_id(kind)
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.recurring_transactions.iter().position(|txn| txn.id == id)
    }

    fn record_missing(&mut self, id: u64) -> BudgetError {
        let err = BudgetError::NotFound {
            kind: RECURRING_TRANSACTION,
            id,
        };
        warn!(id, "{}", err);
        self.error = Some(err.to_string());
        err
    }
}
