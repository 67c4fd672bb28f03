pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notify;
pub mod orchestration;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{
    Fixture, FixtureId, FixtureStatus, League, LeagueId, Prediction, PredictionId, Scoreline,
    TimeMs, User, UserId,
};
pub use error::AppError;
pub use notify::{LogNotifier, MockNotifier, Notifier, NotifyError};
