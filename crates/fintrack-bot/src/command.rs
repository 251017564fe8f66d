//! Chat command parsing.
//!
//! Text is split on whitespace. The first token must start with `/`; an
//! optional `@botname` suffix is dropped and the name is matched
//! case-insensitively.

use fintrack::qb::Period;
use rust_decimal::Decimal;
use std::str::FromStr;

pub const ADD_USAGE: &str = "Incorrect parameters specified!\nUsage: /add <amount> [category] [description]";

pub const CATEGORY_USAGE: &str = "\
/cat [sub-command] [arguments]

/cat help       - Show command help
/cat list       - Show known expense categories
/cat add <name> - Add new expense category
/cat del <name> - Delete expense category";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Add {
        amount: Decimal,
        category: Option<String>,
        description: Option<String>,
    },
    /// Most recent expenses. `None` means the configured default.
    Latest { limit: Option<u64> },
    /// Largest expenses. `None` means the configured default.
    Top { limit: Option<u64> },
    Report(Period),
    Category(CategoryCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryCommand {
    List,
    Add(String),
    Delete(String),
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("message is not a command")]
    NotACommand,
    #[error("unknown command: /{0}")]
    Unknown(String),
    #[error("{0}")]
    Usage(&'static str),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Add { .. } => "add",
            Command::Latest { .. } => "latest",
            Command::Top { .. } => "top",
            Command::Report(Period::Day) => "day",
            Command::Report(Period::Week) => "week",
            Command::Report(Period::Month) => "month",
            Command::Report(Period::Year) => "year",
            Command::Category(_) => "cat",
        }
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tokens = text.split_whitespace();
        let head = tokens.next().ok_or(ParseError::NotACommand)?;
        let name = head.strip_prefix('/').ok_or(ParseError::NotACommand)?;
        let name = name.split('@').next().unwrap_or_default().to_lowercase();
        if name.is_empty() {
            return Err(ParseError::NotACommand);
        }

        let args: Vec<&str> = tokens.collect();

        match name.as_str() {
            "start" => Ok(Command::Start),
            "help" => Ok(Command::Help),
            "add" => parse_add(&args),
            "latest" => Ok(Command::Latest {
                limit: parse_limit(args.first().copied()),
            }),
            "top" => Ok(Command::Top {
                limit: parse_limit(args.first().copied()),
            }),
            "day" => Ok(Command::Report(Period::Day)),
            "week" => Ok(Command::Report(Period::Week)),
            "month" => Ok(Command::Report(Period::Month)),
            "year" => Ok(Command::Report(Period::Year)),
            "cat" => Ok(Command::Category(parse_category(&args))),
            _ => Err(ParseError::Unknown(name)),
        }
    }
}

fn parse_add(args: &[&str]) -> Result<Command, ParseError> {
    let (amount, rest) = args.split_first().ok_or(ParseError::Usage(ADD_USAGE))?;
    let amount = parse_amount(amount).ok_or(ParseError::Usage(ADD_USAGE))?;

    let category = rest.first().map(|s| s.to_string());
    let description = (rest.len() > 1).then(|| rest[1..].join(" "));

    Ok(Command::Add {
        amount,
        category,
        description,
    })
}

/// Positive decimal; `,` is accepted as the decimal separator.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let amount = Decimal::from_str(&raw.replace(',', ".")).ok()?;
    (amount > Decimal::ZERO).then_some(amount)
}

/// Positive row count, capped at the largest `bigint` LIMIT accepts.
fn parse_limit(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n.min(i64::MAX as u64))
}

fn parse_category(args: &[&str]) -> CategoryCommand {
    match args {
        [] | ["list"] => CategoryCommand::List,
        ["add", name @ ..] if !name.is_empty() => CategoryCommand::Add(name.join(" ")),
        ["del", name @ ..] if !name.is_empty() => CategoryCommand::Delete(name.join(" ")),
        _ => CategoryCommand::Help,
    }
}
