use crate::*;
use std::env::var;
use std::str::FromStr;

/// Upper bound on `root_history_size`
pub const MAX_ROOT_HISTORY: usize = 4096;

/// Operational limits of a ledger
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    /// Most candidates an election may list
    pub max_candidates: usize,

    /// Longest candidate label, in bytes
    pub max_candidate_name_len: usize,

    /// Most votes in one batch
    pub max_batch_size: usize,

    /// How many past accumulator roots a vote proof may still target
    pub root_history_size: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            max_candidates: 10,
            max_candidate_name_len: 50,
            max_batch_size: 50,
            root_history_size: 64,
        }
    }
}

impl LedgerConfig {
    /// Read the configuration from `BALLOTLEDGER_*` environment variables.
    ///
    /// Unset variables keep their default.
    pub fn from_env() -> Result<Self, Error> {
        let defaults = LedgerConfig::default();

        let config = LedgerConfig {
            max_candidates: env_or("BALLOTLEDGER_MAX_CANDIDATES", defaults.max_candidates)?,
            max_candidate_name_len: env_or(
                "BALLOTLEDGER_MAX_CANDIDATE_NAME_LEN",
                defaults.max_candidate_name_len,
            )?,
            max_batch_size: env_or("BALLOTLEDGER_MAX_BATCH_SIZE", defaults.max_batch_size)?,
            root_history_size: env_or(
                "BALLOTLEDGER_ROOT_HISTORY_SIZE",
                defaults.root_history_size,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject limits no election could be run under
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_candidates == 0 || self.max_candidates > MAX_CHOICES {
            return Err(Error::Config(
                "max_candidates",
                self.max_candidates.to_string(),
            ));
        }
        if self.max_candidate_name_len == 0 {
            return Err(Error::Config(
                "max_candidate_name_len",
                self.max_candidate_name_len.to_string(),
            ));
        }
        if self.max_batch_size == 0 {
            return Err(Error::Config(
                "max_batch_size",
                self.max_batch_size.to_string(),
            ));
        }
        if self.root_history_size > MAX_ROOT_HISTORY {
            return Err(Error::Config(
                "root_history_size",
                self.root_history_size.to_string(),
            ));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| Error::Config(name, val.clone())),
        Err(_e) => Ok(default),
    }
}
