//! Tubely database layer
//!
//! Persistence of video records. Handlers depend on the [`VideoStore`] trait; the
//! PostgreSQL implementation is [`VideoRepository`].

pub mod db;

pub use db::{VideoRepository, VideoStore};
