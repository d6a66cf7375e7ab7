use chrono::NaiveDate;

use crate::ledger::{
    instant_at_local_midnight, CalendarDate, CreateRecurrenceRule, CreateRecurringTransaction,
    EditRecurringTransaction, Instant, LocalZone, RecurringTransaction,
};

use super::errors::{CommandError, CommandResult};
use super::output;
use super::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

static COMMANDS: &[CommandEntry] = &[
    CommandEntry::new(
        "add",
        "Add a recurring transaction",
        "add monthly <name> <amount> <day> | add weekly <name> <amount> <weekday> [<basis YYYY-MM-DD> <interval>]",
        cmd_add,
    ),
    CommandEntry::new(
        "edit",
        "Replace a recurring transaction",
        "edit <id> monthly|weekly <name> <amount> ...",
        cmd_edit,
    ),
    CommandEntry::new(
        "delete",
        "Delete a recurring transaction",
        "delete <id>",
        cmd_delete,
    ),
    CommandEntry::new("list", "List recurring transactions", "list", cmd_list),
    CommandEntry::new(
        "schedule",
        "Show scheduled transactions between two dates (inclusive)",
        "schedule <start YYYY-MM-DD> <end YYYY-MM-DD>",
        cmd_schedule,
    ),
    CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
    CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    CommandEntry::new("quit", "Leave the shell", "quit", cmd_exit),
];

pub fn commands() -> &'static [CommandEntry] {
    COMMANDS
}

pub fn find(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|entry| entry.name == name)
}

fn cmd_add(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, amount, recurrence_rule) = parse_definition(args, ctx.budget.zone())?;
    let txn = ctx
        .budget
        .add_recurring_transaction(CreateRecurringTransaction::new(name, amount, recurrence_rule));
    output::success(format!("Added #{} {} ({})", txn.id, txn.name, txn.recurrence_rule));
    Ok(())
}

fn cmd_edit(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (id, rest) = args
        .split_first()
        .ok_or_else(|| usage_error("edit"))?;
    let id = parse_id(id)?;
    let (name, amount, recurrence_rule) = parse_definition(rest, ctx.budget.zone())?;
    let txn = ctx.budget.edit_recurring_transaction(EditRecurringTransaction {
        id,
        name,
        amount,
        recurrence_rule,
    })?;
    output::success(format!("Updated #{} {} ({})", txn.id, txn.name, txn.recurrence_rule));
    Ok(())
}

fn cmd_delete(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage_error("delete"));
    };
    let removed = ctx.budget.delete_recurring_transaction(parse_id(id)?)?;
    output::success(format!("Deleted #{} {}", removed.id, removed.name));
    Ok(())
}

fn cmd_list(ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = ctx.budget.view_recurring_transactions();
    if transactions.is_empty() {
        output::info("No recurring transactions.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = transactions.iter().map(recurring_row).collect();
    print!("{}", output::render_table(&["Id", "Name", "Amount", "Rule"], &rows));
    Ok(())
}

fn cmd_schedule(ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [start, end] = args else {
        return Err(usage_error("schedule"));
    };
    let start = parse_local_date(start, ctx.budget.zone())?;
    let end = parse_local_date(end, ctx.budget.zone())?;
    if start >= end {
        output::warning("Start date must be before end date.");
    }

    let scheduled = ctx.budget.view_scheduled_transactions(&start, &end);
    if scheduled.is_empty() {
        output::info("No scheduled transactions in this window.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = scheduled
        .iter()
        .map(|st| vec![st.date.format(), st.name.clone(), st.amount.to_string()])
        .collect();
    print!("{}", output::render_table(&["Date", "Name", "Amount"], &rows));
    Ok(())
}

fn cmd_help(_ctx: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = find(&name.to_lowercase()).ok_or_else(|| {
            CommandError::InvalidArguments(format!("No help for unknown command `{}`", name))
        })?;
        output::info(format!("{} - {}", entry.name, entry.description));
        output::info(format!("usage: {}", entry.usage));
        return Ok(());
    }
    let rows: Vec<Vec<String>> = COMMANDS
        .iter()
        .map(|entry| vec![entry.name.to_string(), entry.description.to_string()])
        .collect();
    print!("{}", output::render_table(&["Command", "Description"], &rows));
    Ok(())
}

fn cmd_exit(_ctx: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

fn recurring_row(txn: &RecurringTransaction) -> Vec<String> {
    vec![
        txn.id.to_string(),
        txn.name.clone(),
        txn.amount.to_string(),
        txn.recurrence_rule.label(),
    ]
}

fn usage_error(command: &str) -> CommandError {
    let usage = find(command).map(|entry| entry.usage).unwrap_or(command);
    CommandError::InvalidArguments(format!("usage: {}", usage))
}

/// `<monthly|weekly> <name> <amount> <rule args...>`
fn parse_definition(
    args: &[&str],
    zone: &dyn LocalZone,
) -> Result<(String, f64, CreateRecurrenceRule), CommandError> {
    let [kind, name, amount, rule_args @ ..] = args else {
        return Err(usage_error("add"));
    };
    let amount = amount
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", amount)))?;
    let rule = match (kind.to_lowercase().as_str(), rule_args) {
        ("monthly", [day]) => CreateRecurrenceRule::Monthly {
            day: parse_number(day, "day")?,
        },
        ("weekly", [weekday]) => CreateRecurrenceRule::Weekly {
            day: parse_weekday(weekday)?,
            basis: None,
            interval: None,
        },
        ("weekly", [weekday, basis, interval]) => CreateRecurrenceRule::Weekly {
            day: parse_weekday(weekday)?,
            basis: Some(parse_local_date(basis, zone)?),
            interval: Some(parse_number(interval, "interval")?),
        },
        _ => return Err(usage_error("add")),
    };
    Ok((name.to_string(), amount, rule))
}

fn parse_id(input: &str) -> Result<u64, CommandError> {
    input
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid id `{}`", input)))
}

fn parse_number(input: &str, field: &str) -> Result<u32, CommandError> {
    input
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid {} `{}`", field, input)))
}

const WEEKDAYS: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// Accepts a number (0 = Sunday) or an English weekday name or prefix.
fn parse_weekday(input: &str) -> Result<u32, CommandError> {
    if let Ok(day) = input.parse::<u32>() {
        return Ok(day);
    }
    let lowered = input.to_lowercase();
    WEEKDAYS
        .iter()
        .position(|prefix| lowered.len() >= 3 && lowered.starts_with(prefix))
        .map(|idx| idx as u32)
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid weekday `{}`", input)))
}

/// A typed `YYYY-MM-DD` date, as the instant it begins on the local clock.
///
/// A day whose midnight is skipped begins at the first valid instant after it.
fn parse_local_date(input: &str, zone: &dyn LocalZone) -> Result<Instant, CommandError> {
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })?;
    instant_at_local_midnight(CalendarDate::from_naive(date), zone).ok_or_else(|| {
        CommandError::InvalidArguments(format!("date `{}` is out of range", input))
    })
}
