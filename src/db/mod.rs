//! SQLite persistence.
//!
//! - `migrations`: pool setup, pragmas and the bundled schema
//! - `repo`: the `Repository` with one submodule per table group

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
