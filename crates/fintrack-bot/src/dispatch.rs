//! Command dispatcher: one entry point, one command table.

use crate::command::{CATEGORY_USAGE, CategoryCommand, Command, ParseError};
use crate::config::BotConfig;
use fintrack::qb::{self, Expr, Period, Statement, TableRef};
use fintrack::{Executor, OrmResult, Table, Value};
use rust_decimal::Decimal;

pub const HELP_TEXT: &str = "\
/add <amount> [category] [description] - Record an expense
/latest [n]  - Show the most recent expenses
/top [n]     - Show the largest expenses
/day         - Expenses of the last day
/week        - Expenses of the last week
/month       - Expenses of the last month
/year        - Expenses of the last year
/cat         - Manage expense categories (see /cat help)
/help        - Show this message";

const APOLOGY: &str = "Sorry, something went wrong while handling your request.";

const EXPENSES: &str = "expenses";
const CATEGORIES: &str = "expense_categories";

/// An incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub chat_id: i64,
    pub text: String,
}

impl Message {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

/// Turns messages into replies, running statements through `E`.
pub struct Dispatcher<E> {
    executor: E,
    settings: BotConfig,
}

impl<E: Executor> Dispatcher<E> {
    pub fn new(executor: E, settings: BotConfig) -> Self {
        Self { executor, settings }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn settings(&self) -> &BotConfig {
        &self.settings
    }

    /// Handle one message.
    ///
    /// Returns `None` when the message should be ignored: it is not a
    /// command, or it comes from a chat that is not allowed.
    pub async fn handle(&self, message: &Message) -> Option<String> {
        if !self.settings.is_allowed(message.chat_id) {
            tracing::debug!(chat_id = message.chat_id, "ignoring message from unknown chat");
            return None;
        }

        let command = match message.text.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::NotACommand) => return None,
            Err(err @ ParseError::Unknown(_)) => return Some(format!("{err}. Try /help")),
            Err(ParseError::Usage(hint)) => return Some(hint.to_string()),
        };

        let name = command.name();
        tracing::info!(chat_id = message.chat_id, command = name, "handling command");

        match self.run(message.chat_id, command).await {
            Ok(reply) => Some(reply),
            Err(err) => {
                tracing::warn!(chat_id = message.chat_id, command = name, error = %err, "command failed");
                Some(APOLOGY.to_string())
            }
        }
    }

    async fn run(&self, chat_id: i64, command: Command) -> OrmResult<String> {
        match command {
            Command::Start => Ok(format!(
                "Welcome to the Finance Tracking bot!\nYour chat id = {chat_id}"
            )),
            Command::Help => Ok(HELP_TEXT.to_string()),
            Command::Add {
                amount,
                category,
                description,
            } => self.add_expense(amount, category, description).await,
            Command::Latest { limit } => self.latest(self.limit_or_default(limit)).await,
            Command::Top { limit } => self.top(self.limit_or_default(limit)).await,
            Command::Report(period) => self.report(period).await,
            Command::Category(sub) => self.category(sub).await,
        }
    }

    fn limit_or_default(&self, limit: Option<u64>) -> u64 {
        limit.unwrap_or(self.settings.latest_limit)
    }

    async fn add_expense(
        &self,
        amount: Decimal,
        category: Option<String>,
        description: Option<String>,
    ) -> OrmResult<String> {
        let mut insert = qb::insert(EXPENSES).set("amount", amount);
        if let Some(category) = category {
            let cat_id = self.resolve_category(&category).await?;
            insert = insert.set("cat_id", cat_id);
        }
        insert = insert.set_opt("cat_description", description);

        self.executor.execute_statement(&insert.into()).await?;
        Ok(format!("Added {} {}", amount, self.settings.currency))
    }

    /// First category whose name contains `needle`, ignoring case.
    async fn resolve_category(&self, needle: &str) -> OrmResult<i64> {
        let stmt = qb::select(CATEGORIES).columns(&["id", "cat_name"]).order_by("id");
        let rows = self.executor.fetch_statement(&stmt.into()).await?;

        let needle = needle.to_uppercase();
        let found = rows.iter().find_map(|row| match row.as_slice() {
            [Value::Int(id), Value::Text(name), ..] if name.to_uppercase().contains(&needle) => {
                Some(*id)
            }
            _ => None,
        });

        Ok(found.unwrap_or(self.settings.default_category_id))
    }

    async fn latest(&self, limit: u64) -> OrmResult<String> {
        let stmt = expenses_with_category()
            .columns(&["e.amount", "ec.cat_name"])
            .order_by_desc("e.creation_timestamp")
            .limit(limit);
        self.table(&["Amount", "Category"], stmt.into()).await
    }

    async fn top(&self, limit: u64) -> OrmResult<String> {
        let stmt = expenses_with_category()
            .columns(&["e.amount", "ec.cat_name", "e.cat_description"])
            .order_by_desc("e.amount")
            .limit(limit);
        self.table(&["Amount", "Category", "Description"], stmt.into())
            .await
    }

    async fn report(&self, period: Period) -> OrmResult<String> {
        let stmt: Statement = expenses_with_category()
            .columns(&["e.creation_timestamp::date", "e.amount", "ec.cat_name"])
            .filter(Expr::since("e.creation_timestamp", period))
            .order_by("e.creation_timestamp")
            .into();
        let rows = self.executor.fetch_statement(&stmt).await?;

        let total: Decimal = rows
            .iter()
            .filter_map(|row| row.get(1).and_then(amount_of))
            .sum();
        let empty = rows.is_empty();

        let amount_header = format!("Amount ({})", self.settings.currency);
        let table = Table::from_rows(&["Date", amount_header.as_str(), "Category"], rows)?;

        let mut reply = table.render_code_block();
        if !empty {
            reply.push_str(&format!("\nTotal: {} {}", total, self.settings.currency));
        }
        Ok(reply)
    }

    async fn category(&self, sub: CategoryCommand) -> OrmResult<String> {
        match sub {
            CategoryCommand::List => {
                let stmt = qb::select(CATEGORIES)
                    .columns(&["cat_name"])
                    .filter(Expr::ne("id", self.settings.default_category_id))
                    .order_by("cat_name");
                self.table(&["Categories"], stmt.into()).await
            }
            CategoryCommand::Add(name) => self.add_category(name).await,
            CategoryCommand::Delete(name) => self.delete_category(name).await,
            CategoryCommand::Help => Ok(CATEGORY_USAGE.to_string()),
        }
    }

    async fn add_category(&self, name: String) -> OrmResult<String> {
        let existing = qb::select(CATEGORIES)
            .columns(&["cat_name"])
            .filter(Expr::eq("cat_name", name.clone()));
        if !self
            .executor
            .fetch_statement(&existing.into())
            .await?
            .is_empty()
        {
            return Ok(format!("Category {name} already exists"));
        }

        let insert = qb::insert(CATEGORIES).set("cat_name", name.clone());
        match self.executor.execute_statement(&insert.into()).await {
            Ok(_) => Ok(format!("Category {name} added")),
            // Lost a race with a concurrent insert.
            Err(err) if err.is_unique_violation() => Ok(format!("Category {name} already exists")),
            Err(err) => Err(err),
        }
    }

    async fn delete_category(&self, name: String) -> OrmResult<String> {
        let delete = qb::delete(CATEGORIES, Expr::eq("cat_name", name.clone()));
        match self.executor.execute_statement(&delete.into()).await {
            Ok(0) => Ok(format!("Category {name} not found")),
            Ok(_) => Ok(format!("Category {name} deleted")),
            Err(err) if err.is_foreign_key_violation() => {
                Ok(format!("Category {name} is still used by expenses"))
            }
            Err(err) => Err(err),
        }
    }

    async fn table(&self, header: &[&str], stmt: Statement) -> OrmResult<String> {
        let rows = self.executor.fetch_statement(&stmt).await?;
        let table = Table::from_rows(header, rows)?;
        Ok(table.render_code_block())
    }
}

fn expenses_with_category() -> qb::JoinSelect {
    qb::join(
        TableRef::new(EXPENSES, "e"),
        TableRef::new(CATEGORIES, "ec"),
        "e.cat_id=ec.id",
    )
}

fn amount_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::Numeric(d) => Some(*d),
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Float(f) => Decimal::try_from(*f).ok(),
        _ => None,
    }
}
