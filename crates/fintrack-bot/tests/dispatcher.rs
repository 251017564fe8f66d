use fintrack::error::ConstraintKind;
use fintrack::{BuiltQuery, Executor, OrmError, OrmResult, Value};
use fintrack_bot::command::{ADD_USAGE, CATEGORY_USAGE};
use fintrack_bot::{BotConfig, Dispatcher, Message};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Answers reads and writes from queues and records every query it sees.
#[derive(Default)]
struct Scripted {
    seen: Mutex<Vec<BuiltQuery>>,
    reads: Mutex<VecDeque<OrmResult<Vec<Vec<Value>>>>>,
    writes: Mutex<VecDeque<OrmResult<u64>>>,
}

impl Scripted {
    fn read(self, rows: Vec<Vec<Value>>) -> Self {
        self.reads.lock().unwrap().push_back(Ok(rows));
        self
    }

    fn write(self, result: OrmResult<u64>) -> Self {
        self.writes.lock().unwrap().push_back(result);
        self
    }

    fn seen(&self) -> Vec<BuiltQuery> {
        self.seen.lock().unwrap().clone()
    }
}

impl Executor for Scripted {
    async fn fetch(&self, query: &BuiltQuery) -> OrmResult<Vec<Vec<Value>>> {
        self.seen.lock().unwrap().push(query.clone());
        self.reads.lock().unwrap().pop_front().unwrap_or(Ok(Vec::new()))
    }

    async fn execute(&self, query: &BuiltQuery) -> OrmResult<u64> {
        self.seen.lock().unwrap().push(query.clone());
        self.writes.lock().unwrap().pop_front().unwrap_or(Ok(1))
    }
}

fn dispatcher(exec: Scripted) -> Dispatcher<Scripted> {
    Dispatcher::new(exec, BotConfig::default())
}

async fn reply(d: &Dispatcher<Scripted>, text: &str) -> Option<String> {
    d.handle(&Message::new(7, text)).await
}

fn categories() -> Vec<Vec<Value>> {
    vec![
        vec![Value::Int(1), Value::from("Other")],
        vec![Value::Int(2), Value::from("Food")],
        vec![Value::Int(3), Value::from("Transport")],
    ]
}

#[tokio::test]
async fn start_and_help() {
    let d = dispatcher(Scripted::default());
    let welcome = reply(&d, "/start").await.unwrap();
    assert!(welcome.ends_with("Your chat id = 7"));

    let help = reply(&d, "/help").await.unwrap();
    assert!(help.contains("/add <amount>"));
    assert!(d.executor().seen().is_empty());
}

#[tokio::test]
async fn add_resolves_category_by_substring() {
    let d = dispatcher(Scripted::default().read(categories()));
    let r = reply(&d, "/add 12.50 TRANS bus to work").await.unwrap();
    assert_eq!(r, "Added 12.50 EUR");

    let seen = d.executor().seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(
        seen[0].sql,
        "SELECT id, cat_name FROM expense_categories ORDER BY id "
    );
    assert_eq!(
        seen[1],
        BuiltQuery::new(
            "INSERT INTO expenses (amount, cat_id, cat_description) VALUES ($1, $2, $3)",
            vec![
                Value::Numeric(Decimal::new(1250, 2)),
                Value::Int(3),
                Value::from("bus to work"),
            ]
        )
    );
}

#[tokio::test]
async fn add_falls_back_to_default_category() {
    let d = dispatcher(Scripted::default().read(categories()));
    reply(&d, "/add 3 books").await.unwrap();

    let seen = d.executor().seen();
    assert_eq!(seen[1].params[1], Value::Int(1));
    assert_eq!(
        seen[1].sql,
        "INSERT INTO expenses (amount, cat_id) VALUES ($1, $2)"
    );
}

#[tokio::test]
async fn add_without_category_skips_lookup() {
    let d = dispatcher(Scripted::default());
    assert_eq!(reply(&d, "/add 4,2").await.unwrap(), "Added 4.2 EUR");

    let seen = d.executor().seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].sql, "INSERT INTO expenses (amount) VALUES ($1)");
}

#[tokio::test]
async fn add_usage_hint() {
    let d = dispatcher(Scripted::default());
    assert_eq!(reply(&d, "/add lots").await.unwrap(), ADD_USAGE);
    assert!(d.executor().seen().is_empty());
}

#[tokio::test]
async fn latest_renders_table() {
    let exec = Scripted::default().read(vec![
        vec![Value::Numeric(Decimal::new(1250, 2)), Value::from("Food")],
        vec![Value::Int(5), Value::from("Transport")],
    ]);
    let d = dispatcher(exec);

    let r = reply(&d, "/latest@fintrack_bot 2").await.unwrap();
    assert_eq!(
        r,
        "```\n| Amount | Category  |\n|--------|-----------|\n| 12.50  | Food      |\n| 5      | Transport |\n```"
    );
    assert_eq!(
        d.executor().seen()[0].sql,
        "SELECT e.amount, ec.cat_name FROM expenses AS e JOIN expense_categories AS ec \
         ON e.cat_id=ec.id ORDER BY e.creation_timestamp DESC LIMIT 2"
    );
}

#[tokio::test]
async fn latest_uses_configured_default() {
    let settings = BotConfig {
        latest_limit: 9,
        ..BotConfig::default()
    };
    let d = Dispatcher::new(Scripted::default(), settings);
    reply(&d, "/latest nine").await.unwrap();
    assert!(d.executor().seen()[0].sql.ends_with("LIMIT 9"));
}

#[tokio::test]
async fn latest_limit_capped_at_bigint() {
    let d = dispatcher(Scripted::default());
    reply(&d, "/latest 18446744073709551615").await.unwrap();
    assert!(d.executor().seen()[0]
        .sql
        .ends_with("LIMIT 9223372036854775807"));
}

#[tokio::test]
async fn top_orders_by_amount() {
    let exec = Scripted::default().read(vec![vec![
        Value::Int(100),
        Value::from("Rent"),
        Value::Null,
    ]]);
    let d = dispatcher(exec);

    let r = reply(&d, "/top").await.unwrap();
    assert!(r.contains("| Amount | Category | Description |"));
    assert!(r.contains("| 100    | Rent     |             |"));

    let sql = &d.executor().seen()[0].sql;
    assert!(sql.starts_with("SELECT e.amount, ec.cat_name, e.cat_description FROM"));
    assert!(sql.ends_with("ORDER BY e.amount DESC LIMIT 5"));
}

#[tokio::test]
async fn month_report_with_total() {
    let day = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let exec = Scripted::default().read(vec![
        vec![Value::Date(day), Value::Numeric(Decimal::new(1250, 2)), Value::from("Food")],
        vec![Value::Date(day), Value::Int(5), Value::from("Transport")],
    ]);
    let d = dispatcher(exec);

    let r = reply(&d, "/month").await.unwrap();
    assert!(r.starts_with("```\n| Date       | Amount (EUR) | Category  |\n"));
    assert!(r.ends_with("```\nTotal: 17.50 EUR"));

    let q = &d.executor().seen()[0];
    assert_eq!(
        q.sql,
        "SELECT e.creation_timestamp::date, e.amount, ec.cat_name FROM expenses AS e \
         JOIN expense_categories AS ec ON e.cat_id=ec.id \
         WHERE e.creation_timestamp > now() - interval '1 month' ORDER BY e.creation_timestamp "
    );
    assert!(q.params.is_empty());
}

#[tokio::test]
async fn empty_report_has_no_total() {
    let d = dispatcher(Scripted::default());
    let r = reply(&d, "/week").await.unwrap();
    assert_eq!(
        r,
        "```\n| Date | Amount (EUR) | Category |\n|------|--------------|----------|\n```"
    );
}

#[tokio::test]
async fn category_list_hides_default() {
    let exec = Scripted::default().read(vec![
        vec![Value::from("Food")],
        vec![Value::from("Transport")],
    ]);
    let d = dispatcher(exec);

    let r = reply(&d, "/cat").await.unwrap();
    assert!(r.contains("| Categories |"));
    assert!(r.contains("| Transport  |"));

    let q = &d.executor().seen()[0];
    assert_eq!(
        q.sql,
        "SELECT cat_name FROM expense_categories WHERE id != $1 ORDER BY cat_name "
    );
    assert_eq!(q.params, vec![Value::Int(1)]);
}

#[tokio::test]
async fn category_add_checks_duplicates() {
    let d = dispatcher(Scripted::default().read(vec![vec![Value::from("Food")]]));
    assert_eq!(
        reply(&d, "/cat add Food").await.unwrap(),
        "Category Food already exists"
    );
    assert_eq!(d.executor().seen().len(), 1);

    let d = dispatcher(Scripted::default());
    assert_eq!(reply(&d, "/cat add Pets").await.unwrap(), "Category Pets added");
    let seen = d.executor().seen();
    assert_eq!(
        seen[1],
        BuiltQuery::new(
            "INSERT INTO expense_categories (cat_name) VALUES ($1)",
            vec![Value::from("Pets")]
        )
    );
}

#[tokio::test]
async fn category_delete_binds_name() {
    let d = dispatcher(Scripted::default());
    let r = reply(&d, "/cat del x' OR '1'='1").await.unwrap();
    assert_eq!(r, "Category x' OR '1'='1 deleted");

    let q = &d.executor().seen()[0];
    assert_eq!(q.sql, "DELETE FROM expense_categories WHERE cat_name = $1");
    assert_eq!(q.params, vec![Value::from("x' OR '1'='1")]);
}

#[tokio::test]
async fn category_delete_reports_missing_and_in_use() {
    let d = dispatcher(Scripted::default().write(Ok(0)));
    assert_eq!(
        reply(&d, "/cat del Ghost").await.unwrap(),
        "Category Ghost not found"
    );

    let in_use = OrmError::constraint(ConstraintKind::ForeignKey, "expenses_cat_id_fkey", "still referenced");
    let d = dispatcher(Scripted::default().write(Err(in_use)));
    assert_eq!(
        reply(&d, "/cat del Food").await.unwrap(),
        "Category Food is still used by expenses"
    );
}

#[tokio::test]
async fn category_help() {
    let d = dispatcher(Scripted::default());
    assert_eq!(reply(&d, "/cat help").await.unwrap(), CATEGORY_USAGE);
    assert_eq!(reply(&d, "/cat frobnicate").await.unwrap(), CATEGORY_USAGE);
}

#[tokio::test]
async fn database_failure_replies_with_apology() {
    let exec = Scripted::default();
    exec.reads
        .lock()
        .unwrap()
        .push_back(Err(OrmError::Connection("refused".to_string())));
    let d = dispatcher(exec);

    let r = reply(&d, "/latest").await.unwrap();
    assert!(r.starts_with("Sorry"));
}

#[tokio::test]
async fn ignores_plain_text_and_foreign_chats() {
    let settings = BotConfig {
        allowed_chats: vec![7],
        ..BotConfig::default()
    };
    let d = Dispatcher::new(Scripted::default(), settings);

    assert_eq!(d.handle(&Message::new(7, "hello there")).await, None);
    assert_eq!(d.handle(&Message::new(8, "/help")).await, None);
    assert!(d.handle(&Message::new(7, "/help")).await.is_some());

    let unknown = d.handle(&Message::new(7, "/stats")).await.unwrap();
    assert_eq!(unknown, "unknown command: /stats. Try /help");
}
