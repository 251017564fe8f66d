use fintrack::{BuiltQuery, Executor, OrmResult, Value};
use fintrack_bot::{BotConfig, Dispatcher, shell};

struct NoRows;

impl Executor for NoRows {
    async fn fetch(&self, _query: &BuiltQuery) -> OrmResult<Vec<Vec<Value>>> {
        Ok(Vec::new())
    }

    async fn execute(&self, _query: &BuiltQuery) -> OrmResult<u64> {
        Ok(1)
    }
}

#[tokio::test]
async fn replies_are_written_per_command_line() {
    let d = Dispatcher::new(NoRows, BotConfig::default());
    let input: &[u8] = b"/start\njust chatting\n/add 2 \n";
    let mut output = Vec::new();

    let handled = shell::run(&d, 42, input, &mut output, std::future::pending())
        .await
        .unwrap();

    assert_eq!(handled, 2);
    let text = String::from_utf8(output).unwrap();
    assert_eq!(
        text,
        "Welcome to the Finance Tracking bot!\nYour chat id = 42\n\nAdded 2 EUR\n\n"
    );
}

#[tokio::test]
async fn shutdown_stops_before_reading() {
    let d = Dispatcher::new(NoRows, BotConfig::default());
    let input: &[u8] = b"/help\n";
    let mut output = Vec::new();

    let handled = shell::run(&d, 1, input, &mut output, async {}).await.unwrap();

    assert_eq!(handled, 0);
    assert!(output.is_empty());
}

#[tokio::test]
async fn disallowed_chat_gets_no_reply() {
    let settings = BotConfig {
        allowed_chats: vec![5],
        ..BotConfig::default()
    };
    let d = Dispatcher::new(NoRows, settings);
    let input: &[u8] = b"/help\n/start\n";
    let mut output = Vec::new();

    let handled = shell::run(&d, 6, input, &mut output, std::future::pending())
        .await
        .unwrap();

    assert_eq!(handled, 0);
    assert!(output.is_empty());
}
