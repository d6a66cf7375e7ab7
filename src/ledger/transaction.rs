//! Recurring transaction definitions and the scheduled occurrences derived from them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::calendar::CalendarDate;
use super::collation::NameCollator;
use super::rule::{CreateRecurrenceRule, RecurrenceRule};

/// Entity-type key used when issuing recurring transaction ids.
pub const RECURRING_TRANSACTION: &str = "RecurringTransaction";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringTransaction {
    pub id: u64,
    pub name: String,
    pub amount: f64,
    pub recurrence_rule: RecurrenceRule,
}

/// Input for [`Budget::add_recurring_transaction`](crate::ledger::Budget::add_recurring_transaction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecurringTransaction {
    pub name: String,
    pub amount: f64,
    pub recurrence_rule: CreateRecurrenceRule,
}

impl CreateRecurringTransaction {
    pub fn new(name: impl Into<String>, amount: f64, recurrence_rule: CreateRecurrenceRule) -> Self {
        Self {
            name: name.into(),
            amount,
            recurrence_rule,
        }
    }

    pub fn monthly(name: impl Into<String>, amount: f64, day: u32) -> Self {
        Self::new(name, amount, CreateRecurrenceRule::Monthly { day })
    }
}

/// Wholesale replacement of an existing recurring transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRecurringTransaction {
    pub id: u64,
    pub name: String,
    pub amount: f64,
    pub recurrence_rule: CreateRecurrenceRule,
}

/// A dated occurrence of a recurring transaction. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTransaction {
    pub date: CalendarDate,
    pub name: String,
    pub amount: f64,
}

impl ScheduledTransaction {
    pub fn from_recurring(date: CalendarDate, transaction: &RecurringTransaction) -> Self {
        Self {
            date,
            name: transaction.name.clone(),
            amount: transaction.amount,
        }
    }

    /// Schedule order: date first, then name.
    pub fn schedule_order(&self, other: &Self, names: &NameCollator) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| names.compare(&self.name, &other.name))
    }
}
