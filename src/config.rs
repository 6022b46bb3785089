use crate::error::ConfigError;
use log::info;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_DATABASE_URL: &str = "sqlite:r4_voting.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub struct Config {
    pub discord_token: String,
    pub database_url: String,
    pub max_connections: u32,
    pub candidates_file: Option<PathBuf>,
    pub guild_id: Option<u64>,
}

impl Config {
    // Read everything from the environment (.env is merged by main beforehand)
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?;

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            info!("DATABASE_URL not set, using default: {}", DEFAULT_DATABASE_URL);
            DEFAULT_DATABASE_URL.to_string()
        });

        let max_connections = parse_or(
            &lookup,
            "DATABASE_MAX_CONNECTIONS",
            DEFAULT_MAX_CONNECTIONS,
        )?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidVar {
                key: "DATABASE_MAX_CONNECTIONS",
                reason: "must be at least 1".to_string(),
            });
        }

        let candidates_file = lookup("CANDIDATES_FILE").map(PathBuf::from);
        let guild_id = parse_optional(&lookup, "GUILD_ID")?;

        Ok(Self {
            discord_token,
            database_url,
            max_connections,
            candidates_file,
            guild_id,
        })
    }
}

fn parse_optional<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidVar {
                key,
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match parse_optional(lookup, key)? {
        Some(value) => Ok(value),
        None => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "abc")])).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(config.candidates_file.is_none());
        assert!(config.guild_id.is_none());
    }

    #[test]
    fn test_missing_token_rejected() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "sqlite::memory:")]));
        assert!(matches!(result, Err(ConfigError::MissingVar("DISCORD_TOKEN"))));

        let blank = Config::from_lookup(lookup_from(&[("DISCORD_TOKEN", "  ")]));
        assert!(matches!(blank, Err(ConfigError::MissingVar("DISCORD_TOKEN"))));
    }

    #[test]
    fn test_overrides_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("CANDIDATES_FILE", "roster.json"),
            ("GUILD_ID", "123456789"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.candidates_file, Some(PathBuf::from("roster.json")));
        assert_eq!(config.guild_id, Some(123456789));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let bad_guild = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("GUILD_ID", "not-a-number"),
        ]));
        assert!(matches!(
            bad_guild,
            Err(ConfigError::InvalidVar { key: "GUILD_ID", .. })
        ));

        let zero_pool = Config::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]));
        assert!(matches!(
            zero_pool,
            Err(ConfigError::InvalidVar { key: "DATABASE_MAX_CONNECTIONS", .. })
        ));
    }
}
