//! Private leagues.

use crate::domain::{LeagueId, UserId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Length of a league join code.
pub const JOIN_CODE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub code: String,
    pub owner_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeagueNameError {
    #[error("league name must be 1-64 characters")]
    InvalidLength,
}

/// Trim and validate a league name.
pub fn normalize_league_name(name: &str) -> Result<String, LeagueNameError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(LeagueNameError::InvalidLength);
    }
    Ok(name.to_string())
}

/// Generate a fresh join code: uppercase hex drawn from a hashed random UUID.
pub fn generate_join_code() -> String {
    let seed = uuid::Uuid::new_v4();
    let digest = Sha256::digest(seed.as_bytes());
    hex::encode_upper(&digest[..JOIN_CODE_LEN / 2])
}

/// Canonical form of a user-entered join code.
pub fn normalize_join_code(code: &str) -> Option<String> {
    let code = code.trim().to_ascii_uppercase();
    (code.len() == JOIN_CODE_LEN && code.chars().all(|c| c.is_ascii_hexdigit())).then_some(code)
}
