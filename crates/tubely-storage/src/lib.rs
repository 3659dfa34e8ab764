//! Tubely Storage Library
//!
//! Object storage abstraction and its backends (S3 via `object_store`, local filesystem
//! for development).
//!
//! # Key format
//!
//! - Videos: `{category}/{random}.{subtype}` where category is `landscape`, `portrait` or `other`
//! - Thumbnails: `{random}.{subtype}`
//!
//! `random` is 32 bytes from a cryptographically secure generator, base64url without padding.
//! Keys must not contain `..`, a leading `/` or `,`. Key generation is centralized in the
//! `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storage, ConfiguredStorage};
pub use keys::derive_object_key;
#[cfg(feature = "storage-local")]
pub use local::{LocalObject, LocalStorage};
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
