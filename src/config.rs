use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{invalid_config_error, Error};
use crate::suggestions::{DEFAULT_LIMIT, DEFAULT_MIN_LENGTH};

/// How a geolocation result is treated when the field changed after the
/// request was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    LastResolutionWins,
    DiscardStale,
}

impl FromStr for StalePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last_resolution_wins" => Ok(Self::LastResolutionWins),
            "discard_stale" => Ok(Self::DiscardStale),
            other => Err(invalid_config_error(other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub suggestion_min_length: usize,
    pub suggestion_limit: usize,
    pub suggestion_debounce: Duration,
    pub submit_delay: Duration,
    pub banner_delay: Duration,
    pub stale_policy: StalePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suggestion_min_length: DEFAULT_MIN_LENGTH,
            suggestion_limit: DEFAULT_LIMIT,
            suggestion_debounce: Duration::ZERO,
            submit_delay: Duration::from_millis(800),
            banner_delay: Duration::from_millis(800),
            stale_policy: StalePolicy::LastResolutionWins,
        }
    }
}

fn optional_var<T>(name: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Debug,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|err| invalid_config_error((name, err))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

impl Config {
    /// Reads `.env` (if any) and the `WAYFINDER_*` variables; anything unset
    /// keeps its default.
    #[tracing::instrument(name = "Config::from_env")]
    pub fn from_env() -> Result<Self, Error> {
        dotenv::dotenv().ok();

        let defaults = Self::default();
        let millis = |name: &str, default: Duration| -> Result<Duration, Error> {
            Ok(optional_var::<u64>(name)?
                .map(Duration::from_millis)
                .unwrap_or(default))
        };

        Ok(Self {
            suggestion_min_length: optional_var("WAYFINDER_SUGGESTION_MIN_LENGTH")?
                .unwrap_or(defaults.suggestion_min_length),
            suggestion_limit: optional_var("WAYFINDER_SUGGESTION_LIMIT")?
                .unwrap_or(defaults.suggestion_limit),
            suggestion_debounce: millis(
                "WAYFINDER_SUGGESTION_DEBOUNCE_MS",
                defaults.suggestion_debounce,
            )?,
            submit_delay: millis("WAYFINDER_SUBMIT_DELAY_MS", defaults.submit_delay)?,
            banner_delay: millis("WAYFINDER_BANNER_DELAY_MS", defaults.banner_delay)?,
            stale_policy: optional_var("WAYFINDER_STALE_POLICY")?
                .unwrap_or(defaults.stale_policy),
        })
    }

    /// Defaults with every artificial delay removed.
    pub fn immediate() -> Self {
        Self {
            submit_delay: Duration::ZERO,
            banner_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

#[test]
fn stale_policy_parses_known_names() {
    assert_eq!(
        "discard_stale".parse::<StalePolicy>().unwrap(),
        StalePolicy::DiscardStale
    );
    assert_eq!(
        " last_resolution_wins ".parse::<StalePolicy>().unwrap(),
        StalePolicy::LastResolutionWins
    );
    assert_eq!("newest".parse::<StalePolicy>().unwrap_err().code, 2);
}

// All env-driven assertions live in one test so parallel tests never race
// on the process environment.
#[test]
fn from_env_overrides_and_rejects() {
    env::set_var("WAYFINDER_SUBMIT_DELAY_MS", "250");
    env::set_var("WAYFINDER_STALE_POLICY", "discard_stale");

    let config = Config::from_env().unwrap();
    assert_eq!(config.submit_delay, Duration::from_millis(250));
    assert_eq!(config.stale_policy, StalePolicy::DiscardStale);
    assert_eq!(config.suggestion_limit, 5);
    assert_eq!(config.banner_delay, Duration::from_millis(800));

    env::set_var("WAYFINDER_SUGGESTION_LIMIT", "five");
    assert_eq!(Config::from_env().unwrap_err().code, 2);

    env::remove_var("WAYFINDER_SUGGESTION_LIMIT");
    env::remove_var("WAYFINDER_SUBMIT_DELAY_MS");
    env::remove_var("WAYFINDER_STALE_POLICY");
}
