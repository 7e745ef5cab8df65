use std::{env, fmt::Display, str::FromStr, time::Duration};

use crate::error::{AppError, AppResult};

pub const DEFAULT_API_URL: &str = "https://forkify-api.herokuapp.com/api";

pub struct Config {
    pub api_url: String,
    pub likes_db_path: String,
    pub results_per_page: usize,
    pub http_timeout: Duration,
}

impl Config {
    /// Reads the settings from the environment, `.env` included when the
    /// binary loaded it beforehand.
    pub fn from_env() -> AppResult<Self> {
        let results_per_page: usize = try_load("RESULTS_PER_PAGE", "10")?;
        if results_per_page == 0 {
            return Err(AppError::Config {
                key: "RESULTS_PER_PAGE",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            api_url: try_load::<String>("RECIPE_API_URL", DEFAULT_API_URL)?
                .trim_end_matches('/')
                .to_string(),
            likes_db_path: try_load("LIKES_DB_PATH", "likes.db")?,
            results_per_page,
            http_timeout: Duration::from_secs(try_load("HTTP_TIMEOUT_SECS", "10")?),
        })
    }
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> AppResult<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        log::info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e: T::Err| {
        log::warn!("Invalid {key} value: {e}");
        AppError::Config {
            key,
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_numbers_are_config_errors() {
        let err = try_load::<usize>("RECIPE_LOOKUP_TEST_UNSET_KEY", "ten").unwrap_err();
        assert!(matches!(
            err,
            AppError::Config {
                key: "RECIPE_LOOKUP_TEST_UNSET_KEY",
                ..
            }
        ));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let n: u64 = try_load("RECIPE_LOOKUP_TEST_OTHER_KEY", "10").unwrap();
        assert_eq!(n, 10);
    }
}
