//! Expense tracking chat bot built on the `fintrack` query builder.
//!
//! [`run`] is the binary's entry point. The pieces are public so the
//! dispatcher can be driven by other transports or by tests.

pub mod cli;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod shell;

pub use command::{CategoryCommand, Command, ParseError};
pub use config::{BotConfig, BotConfigFile, ConfigFile};
pub use dispatch::{Dispatcher, Message};

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    let args = match cmd {
        cli::Command::Help => {
            cli::print_help();
            return Ok(());
        }
        cli::Command::Run(args) => args,
    };

    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    logging::init()?;

    let config = BotConfigFile::load(args.config)?;
    let mut file = config.file;
    if let Some(url) = args.database {
        file.database.url = url;
    }
    let chat_id = args.chat_id.unwrap_or(file.bot.chat_id);

    let pool = fintrack::create_pool(&file.database.url, file.database.pool_size)?;
    tracing::info!(
        config = %config.config_path.display(),
        pool_size = file.database.pool_size,
        chat_id,
        "fintrack started"
    );

    let dispatcher = Dispatcher::new(pool, file.bot);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let handled = shell::run(&dispatcher, chat_id, stdin, tokio::io::stdout(), until_signal(tokio::signal::ctrl_c())).await?;

    tracing::info!(handled, "fintrack stopped");
    Ok(())
}

/// Resolves when `signal` fires. If the handler cannot be installed the session runs until EOF.
async fn until_signal(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; stop with end of input");
        std::future::pending::<()>().await;
    }
}
