use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BotConfigFile {
    pub config_path: PathBuf,
    pub file: ConfigFile,
}

impl BotConfigFile {
    pub fn load(config_path: PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(&config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = ConfigFile::parse(&raw, |key| std::env::var(key).ok()).map_err(|e| {
            anyhow::anyhow!("invalid config file {}: {e:#}", config_path.display())
        })?;

        Ok(Self { config_path, file })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    pub engine: Option<String>,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_pool_size() -> usize {
    4
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Chat id used by the local shell session.
    pub chat_id: i64,
    /// Chats allowed to talk to the bot; empty means everyone.
    pub allowed_chats: Vec<i64>,
    pub currency: String,
    /// Row count for `/latest` and `/top` when none is given.
    pub latest_limit: u64,
    /// Category used when `/add` names one that does not exist. Hidden from `/cat list`.
    pub default_category_id: i64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            chat_id: 0,
            allowed_chats: Vec::new(),
            currency: "EUR".to_string(),
            latest_limit: 5,
            default_category_id: 1,
        }
    }
}

impl BotConfig {
    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }
}

impl ConfigFile {
    /// Parse TOML, expand `${VAR}` references through `lookup`, and validate.
    pub fn parse(
        raw: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let mut file: ConfigFile = toml::from_str(raw)?;
        file.expand_env(&lookup)?;
        file.validate()?;
        Ok(file)
    }

    fn expand_env(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        self.database.url = expand_env_vars(&self.database.url, lookup)?;
        self.bot.currency = expand_env_vars(&self.bot.currency, lookup)?;
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.version.trim() != "1" {
            anyhow::bail!("unsupported config version: {}", self.version);
        }
        if let Some(engine) = &self.engine {
            if engine != "postgres" {
                anyhow::bail!("unsupported engine: {engine}");
            }
        }

        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must not be empty");
        }
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be at least 1");
        }

        if self.bot.currency.trim().is_empty() {
            anyhow::bail!("bot.currency must not be empty");
        }
        if self.bot.latest_limit == 0 {
            anyhow::bail!("bot.latest_limit must be at least 1");
        }

        Ok(())
    }
}

/// Replace every `${KEY}` in `input` with `lookup(KEY)`.
fn expand_env_vars(
    input: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            anyhow::bail!("unterminated env var reference: ${{{after}");
        };
        let key = &after[..end];
        if key.is_empty() {
            anyhow::bail!("invalid env var reference: ${{}}");
        }

        let v = lookup(key)
            .ok_or_else(|| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
        out.push_str(&v);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
