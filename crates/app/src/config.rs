use std::fmt;
use std::path::PathBuf;

use services::DEFAULT_STORAGE_KEY;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidDbUrl { raw: String },
    InvalidKey { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidKey { raw } => write!(f, "invalid --key value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Runtime settings, from flags first and environment second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_url: String,
    pub catalog_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub storage_key: String,
    pub show_help: bool,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  question-wheel [--db <sqlite_url>] [--catalog <path>] [--seed <u64>] [--key <name>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:question-wheel.sqlite3");
    eprintln!("  --catalog <built-in questions>");
    eprintln!("  --key {DEFAULT_STORAGE_KEY}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QWHEEL_DB_URL, QWHEEL_CATALOG, QWHEEL_SEED, QWHEEL_STORAGE_KEY, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    let parsed = raw.trim().parse::<u64>();
    parsed.map_err(|_| ArgsError::InvalidSeed { raw })
}

impl Config {
    /// Parse flags, falling back to `env` for anything not given.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url =
            env("QWHEEL_DB_URL").unwrap_or_else(|| "sqlite:question-wheel.sqlite3".into());
        let mut catalog_path = env("QWHEEL_CATALOG")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let mut seed = env("QWHEEL_SEED").map(parse_seed).transpose()?;
        let mut storage_key = env("QWHEEL_STORAGE_KEY")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_owned());
        let mut show_help = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--catalog" => {
                    catalog_path = Some(PathBuf::from(require_value(&mut args, "--catalog")?));
                }
                "--seed" => {
                    seed = Some(parse_seed(require_value(&mut args, "--seed")?)?);
                }
                "--key" => {
                    let value = require_value(&mut args, "--key")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidKey { raw: value });
                    }
                    storage_key = value;
                }
                "--help" | "-h" => show_help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url: normalize_sqlite_url(db_url),
            catalog_path,
            seed,
            storage_key,
            show_help,
        })
    }
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_flags_or_env() {
        let config = Config::parse(Vec::new(), no_env).unwrap();
        assert!(config.db_url.starts_with("sqlite://"));
        assert!(config.db_url.ends_with("question-wheel.sqlite3"));
        assert_eq!(config.catalog_path, None);
        assert_eq!(config.seed, None);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(!config.show_help);
    }

    #[test]
    fn flags_override_env() {
        let env = |name: &str| match name {
            "QWHEEL_SEED" => Some("1".to_string()),
            "QWHEEL_STORAGE_KEY" => Some("from-env".to_string()),
            _ => None,
        };
        let config = Config::parse(
            args(&["--seed", "42", "--db", "sqlite::memory:", "--catalog", "q.json"]),
            env,
        )
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.db_url, "sqlite::memory:");
        assert_eq!(config.catalog_path, Some(PathBuf::from("q.json")));
        assert_eq!(config.storage_key, "from-env");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::parse(args(&["--seed", "abc"]), no_env),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            Config::parse(args(&["--db"]), no_env),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            Config::parse(args(&["--key", " "]), no_env),
            Err(ArgsError::InvalidKey { .. })
        ));
        assert!(matches!(
            Config::parse(args(&["--verbose"]), no_env),
            Err(ArgsError::UnknownArg(_))
        ));
    }

    #[test]
    fn normalize_keeps_memory_and_absolute_urls() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/a.db".into()),
            "sqlite:///tmp/a.db"
        );
        assert_eq!(normalize_sqlite_url("/tmp/b.db".into()), "sqlite:///tmp/b.db");
    }
}
