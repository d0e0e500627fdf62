use anyhow::{Context, bail};
use std::path::PathBuf;
use tripsplit_domain::{Currency, RoundingMode, SettlementContext};

pub const DEFAULT_CURRENCIES: &str = "JPY,TWD,USD,EUR";
const LEDGER_FILE: &str = "ledger.csv";
const MEMBERS_FILE: &str = "members.json";

/// Runtime settings resolved from the environment and CLI overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub home: PathBuf,
    pub currencies: Vec<Currency>,
    pub context: SettlementContext,
}

impl AppConfig {
    /// Loads `.env` if present, then reads `TRIPSPLIT_*` variables.
    pub fn from_env(home_override: Option<PathBuf>) -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(home_override, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(
        home_override: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let home = home_override
            .or_else(|| lookup("TRIPSPLIT_HOME").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let currencies = parse_currencies(
            lookup("TRIPSPLIT_CURRENCIES")
                .as_deref()
                .unwrap_or(DEFAULT_CURRENCIES),
        );
        if currencies.is_empty() {
            bail!("TRIPSPLIT_CURRENCIES must list at least one currency code");
        }

        let scale = match lookup("TRIPSPLIT_SCALE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("TRIPSPLIT_SCALE must be a whole number, got '{raw}'"))?,
            None => SettlementContext::cents().scale(),
        };
        let rounding_mode = match lookup("TRIPSPLIT_ROUNDING") {
            Some(raw) => parse_rounding_mode(&raw)?,
            None => RoundingMode::default(),
        };
        let context = SettlementContext::try_new(scale, rounding_mode)?;

        Ok(Self {
            home,
            currencies,
            context,
        })
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.home.join(LEDGER_FILE)
    }

    pub fn members_path(&self) -> PathBuf {
        self.home.join(MEMBERS_FILE)
    }

    /// Currency used when an entry does not name one.
    pub fn default_currency(&self) -> Option<&Currency> {
        self.currencies.first()
    }
}

fn parse_currencies(raw: &str) -> Vec<Currency> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(Currency::from)
        .collect()
}

fn parse_rounding_mode(raw: &str) -> anyhow::Result<RoundingMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "half-up" | "half_up" => Ok(RoundingMode::HalfUp),
        "half-even" | "half_even" | "bankers" => Ok(RoundingMode::HalfEven),
        other => bail!("TRIPSPLIT_ROUNDING must be 'half-up' or 'half-even', got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(None, lookup(&[])).unwrap();
        assert_eq!(config.home, PathBuf::from("."));
        let codes: Vec<&str> = config.currencies.iter().map(Currency::as_str).collect();
        assert_eq!(codes, vec!["JPY", "TWD", "USD", "EUR"]);
        assert_eq!(config.context, SettlementContext::cents());
        assert_eq!(config.ledger_path(), PathBuf::from("./ledger.csv"));
    }

    #[test]
    fn override_beats_environment() {
        let config = AppConfig::from_lookup(
            Some(PathBuf::from("/trip")),
            lookup(&[("TRIPSPLIT_HOME", "/elsewhere")]),
        )
        .unwrap();
        assert_eq!(config.members_path(), PathBuf::from("/trip/members.json"));
    }

    #[test]
    fn environment_configures_currencies_and_rounding() {
        let config = AppConfig::from_lookup(
            None,
            lookup(&[
                ("TRIPSPLIT_CURRENCIES", " TWD, ,KRW "),
                ("TRIPSPLIT_SCALE", "0"),
                ("TRIPSPLIT_ROUNDING", "half-even"),
            ]),
        )
        .unwrap();
        let codes: Vec<&str> = config.currencies.iter().map(Currency::as_str).collect();
        assert_eq!(codes, vec!["TWD", "KRW"]);
        assert_eq!(config.default_currency().map(Currency::as_str), Some("TWD"));
        assert_eq!(config.context.scale(), 0);
        assert_eq!(config.context.rounding_mode(), RoundingMode::HalfEven);
    }

    #[rstest]
    #[case::no_currencies(&[("TRIPSPLIT_CURRENCIES", " , ")])]
    #[case::bad_scale(&[("TRIPSPLIT_SCALE", "two")])]
    #[case::scale_too_large(&[("TRIPSPLIT_SCALE", "29")])]
    #[case::bad_rounding(&[("TRIPSPLIT_ROUNDING", "up")])]
    fn rejects_bad_settings(#[case] vars: &[(&str, &str)]) {
        assert!(AppConfig::from_lookup(None, lookup(vars)).is_err());
    }
}
