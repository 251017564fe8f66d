use std::path::PathBuf;

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV: &str = "FINTRACK_CONFIG";
const DEFAULT_CONFIG: &str = "fintrack.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Run(RunArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunArgs {
    pub config: PathBuf,
    pub database: Option<String>,
    pub chat_id: Option<i64>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let default_config = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    parse_args_with_default(args, default_config)
}

fn parse_args_with_default(args: &[String], default_config: String) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str());

    let mut config = PathBuf::from(default_config);
    let mut database: Option<String> = None;
    let mut chat_id: Option<i64> = None;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help),
            "-c" | "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                database = Some(token.trim_start_matches("--database=").to_string());
            }
            "--chat-id" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--chat-id requires a value");
                };
                chat_id = Some(parse_chat_id(v)?);
            }
            _ if token.starts_with("--chat-id=") => {
                chat_id = Some(parse_chat_id(token.trim_start_matches("--chat-id="))?);
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Run(RunArgs {
        config,
        database,
        chat_id,
    }))
}

fn parse_chat_id(v: &str) -> anyhow::Result<i64> {
    v.parse()
        .map_err(|_| anyhow::anyhow!("--chat-id must be an integer, got {v:?}"))
}

pub fn print_help() {
    println!(
        "\
fintrack - expense tracking chat bot

USAGE:
  fintrack [OPTIONS]

Reads one chat message per line from stdin and prints the bot's replies.

OPTIONS:
  -c, --config <FILE>   Config file path (default: ${CONFIG_ENV} or {DEFAULT_CONFIG})
  --database <URL>      Override database.url from config
  --chat-id <ID>        Chat id the local session speaks as (default: bot.chat_id)
  -h, --help            Print help

ENVIRONMENT:
  FINTRACK_LOG          Log filter, e.g. `info` or `fintrack.sql=debug`"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("fintrack")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_defaults() {
        let cmd = parse_args_with_default(&args(&[]), "fintrack.toml".to_string()).unwrap();
        assert_eq!(
            cmd,
            Command::Run(RunArgs {
                config: PathBuf::from("fintrack.toml"),
                database: None,
                chat_id: None,
            })
        );
    }

    #[test]
    fn test_all_options() {
        let cmd = parse_args_with_default(
            &args(&["--config=bot.toml", "--database", "postgres://x", "--chat-id", "-42"]),
            "fintrack.toml".to_string(),
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command::Run(RunArgs {
                config: PathBuf::from("bot.toml"),
                database: Some("postgres://x".to_string()),
                chat_id: Some(-42),
            })
        );
    }

    #[test]
    fn test_help_wins() {
        let cmd = parse_args_with_default(&args(&["-c", "a.toml", "--help"]), String::new()).unwrap();
        assert_eq!(cmd, Command::Help);
    }

    #[test]
    fn test_errors() {
        assert!(parse_args_with_default(&args(&["--config"]), String::new()).is_err());
        assert!(parse_args_with_default(&args(&["--chat-id", "abc"]), String::new()).is_err());
        assert!(parse_args_with_default(&args(&["serve"]), String::new()).is_err());
    }
}
