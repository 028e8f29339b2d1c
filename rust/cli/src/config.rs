//! CLI settings: defaults, then a TOML file named by `LOUNGE_CONFIG`, then
//! `LOUNGE_*` environment variables. Each value remembers where it came from.

use std::fs;

use lounge_ai::POLICY_NAMES;
use lounge_engine::config::Variant;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub variant: Variant,
    pub seats: usize,
    pub starting_stack: u32,
    pub policy: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            variant: Variant::Holdem,
            seats: 6,
            starting_stack: 1_000,
            policy: "baseline".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub variant: ValueSource,
    pub seats: ValueSource,
    pub starting_stack: ValueSource,
    pub policy: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            variant: ValueSource::Default,
            seats: ValueSource::Default,
            starting_stack: ValueSource::Default,
            policy: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    variant: Option<Variant>,
    #[serde(default)]
    seats: Option<usize>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    policy: Option<String>,
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    resolve(|key| std::env::var(key).ok())
}

/// Resolves against `env`, a lookup standing in for the process environment.
pub fn resolve<F>(env: F) -> Result<ConfigResolved, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();
    let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(path) = var("LOUNGE_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.variant {
            cfg.variant = v;
            sources.variant = ValueSource::File;
        }
        if let Some(v) = f.seats {
            cfg.seats = v;
            sources.seats = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.policy {
            cfg.policy = v;
            sources.policy = ValueSource::File;
        }
    }

    if let Some(seed) = var("LOUNGE_SEED") {
        cfg.seed = Some(parse(&seed, "LOUNGE_SEED")?);
        sources.seed = ValueSource::Env;
    }
    if let Some(variant) = var("LOUNGE_VARIANT") {
        cfg.variant = variant
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid LOUNGE_VARIANT: {}", variant)))?;
        sources.variant = ValueSource::Env;
    }
    if let Some(seats) = var("LOUNGE_SEATS") {
        cfg.seats = parse(&seats, "LOUNGE_SEATS")?;
        sources.seats = ValueSource::Env;
    }
    if let Some(stack) = var("LOUNGE_STACK") {
        cfg.starting_stack = parse(&stack, "LOUNGE_STACK")?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(policy) = var("LOUNGE_POLICY") {
        cfg.policy = policy.trim().to_string();
        sources.policy = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn parse<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", key, value)))
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let limit = cfg.variant.seat_limit();
    if !(2..=limit).contains(&cfg.seats) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: {} seats must be within 2..={}",
            cfg.variant, limit
        )));
    }
    if cfg.starting_stack == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_stack must be >0".into(),
        ));
    }
    if !POLICY_NAMES.contains(&cfg.policy.as_str()) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: unknown policy '{}' (expected one of {})",
            cfg.policy,
            POLICY_NAMES.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let r = resolve(env(&[])).unwrap();
        assert_eq!(r.config, Config::default());
        assert_eq!(r.sources.seats, ValueSource::Default);
    }

    #[test]
    fn env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 7\nvariant = \"stud\"\nseats = 5").unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let r = resolve(env(&[("LOUNGE_CONFIG", path.as_str()), ("LOUNGE_SEED", "9")])).unwrap();
        assert_eq!(r.config.seed, Some(9));
        assert_eq!(r.sources.seed, ValueSource::Env);
        assert_eq!(r.config.variant, Variant::Stud);
        assert_eq!(r.sources.variant, ValueSource::File);
        assert_eq!(r.config.seats, 5);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(resolve(env(&[("LOUNGE_SEED", "abc")])).is_err());
        assert!(resolve(env(&[("LOUNGE_SEATS", "1")])).is_err());
        assert!(resolve(env(&[("LOUNGE_STACK", "0")])).is_err());
        assert!(resolve(env(&[("LOUNGE_POLICY", "gto")])).is_err());
        assert!(resolve(env(&[("LOUNGE_VARIANT", "razz")])).is_err());
        // nine seats are fine for hold'em but not for stud
        assert!(resolve(env(&[("LOUNGE_SEATS", "9")])).is_ok());
        assert!(resolve(env(&[("LOUNGE_SEATS", "9"), ("LOUNGE_VARIANT", "stud")])).is_err());
    }

    #[test]
    fn empty_values_are_ignored() {
        let r = resolve(env(&[("LOUNGE_SEED", "  ")])).unwrap();
        assert_eq!(r.config.seed, None);
    }
}
