use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use tripsplit_domain::Money;

/// tripsplit: shared trip expenses, balances and who pays whom.
///
/// Entries live in `ledger.csv` and the member list in `members.json`, both
/// under the trip directory (`--home`, `TRIPSPLIT_HOME`, or the current
/// directory).
#[derive(Debug, Parser)]
#[command(name = "tripsplit", version)]
pub struct Args {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Trip directory holding the ledger and member files.
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show every member's balance and the transfers that settle them, per currency.
    Report,
    /// Manage trip members.
    #[command(subcommand)]
    Member(MemberCommand),
    /// Record, edit and list ledger entries.
    #[command(subcommand)]
    Entry(EntryCommand),
    /// Copy the ledger to a CSV file.
    Backup {
        path: PathBuf,
    },
    /// Replace the ledger with a previously saved CSV file.
    Restore {
        path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    List,
    /// Add one or more members.
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Remove a member. Their recorded entries keep counting.
    Remove {
        name: String,
    },
    /// Rename a member everywhere, including recorded entries.
    Rename {
        from: String,
        to: String,
    },
    /// Remove every member.
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum EntryCommand {
    List,
    /// Record an expense split evenly among beneficiaries.
    Add(ExpenseArgs),
    /// Record money paid back from one member to another.
    Reimburse(ReimburseArgs),
    /// Replace an entry's details. The entry keeps its kind.
    Edit {
        id: u64,
        #[command(flatten)]
        expense: ExpenseArgs,
    },
    Delete {
        id: u64,
    },
}

#[derive(Debug, ClapArgs)]
pub struct ExpenseArgs {
    #[arg(long)]
    pub payer: String,
    #[arg(long, value_parser = parse_money)]
    pub amount: Money,
    /// Defaults to the first configured currency.
    #[arg(long)]
    pub currency: Option<String>,
    /// Comma-separated names sharing the cost.
    #[arg(long = "for", value_delimiter = ',', required = true)]
    pub beneficiaries: Vec<String>,
    #[arg(long, default_value = "")]
    pub item: String,
    /// "YYYY-MM-DD HH:MM" or "YYYY-MM-DD"; defaults to now.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, ClapArgs)]
pub struct ReimburseArgs {
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    #[arg(long, value_parser = parse_money)]
    pub amount: Money,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long, default_value = "")]
    pub item: String,
    #[arg(long)]
    pub date: Option<String>,
}

fn parse_money(raw: &str) -> Result<Money, String> {
    raw.parse::<Money>()
        .map_err(|err| format!("'{raw}' is not a decimal amount: {err}"))
}
