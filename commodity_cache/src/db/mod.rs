//! SQLite utilities for the document store.
//!
//! This module provides:
//! - [`connection::connect_sqlite`], which opens a connection with WAL journaling and a
//!   5000ms busy_timeout.
//! - Embedded Diesel migrations and [`migrate::run_sqlite`] to bring a database up to date.
//!
//! Example:
//! ```no_run
//! use commodity_cache::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("commodity_cache_example.db");
//! migrate::run_sqlite(db_path.to_str().unwrap()).expect("migrations");
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;
