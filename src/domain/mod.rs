//! Domain types for the prediction platform.
//!
//! This module provides:
//! - Identity and time primitives: UserId, FixtureId, PredictionId, LeagueId, TimeMs
//! - Validated scorelines and match outcomes
//! - Fixture records with their status lifecycle
//! - Predictions, users and private leagues

pub mod fixture;
pub mod league;
pub mod prediction;
pub mod primitives;
pub mod scoreline;
pub mod user;

pub use fixture::{Fixture, FixtureError, FixtureStatus, NewFixture};
pub use league::League;
pub use prediction::Prediction;
pub use primitives::{FixtureId, LeagueId, PredictionId, TimeMs, UserId};
pub use scoreline::{Outcome, Scoreline, ScorelineError};
pub use user::{NewUser, User, UserError};
