//! # skipkv
//!
//! An in-memory ordered key-value store with:
//! - A skip list index (expected O(log n) insert/search/delete)
//! - Single-writer/multi-reader concurrency model
//! - Plain-text snapshot export and import
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Callers (CLI, threads)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store                                 │
//! │            (Single Writer / Multi Reader)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  SkipList   │◄─────────│  Snapshot   │
//!   │  (RwLock)   │ enumerate│ (text file) │
//!   └─────────────┘ / insert └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use skipkv::{InsertOutcome, Store};
//!
//! let store: Store<i32, String> = Store::with_max_level(12).unwrap();
//! assert_eq!(store.insert(3, "a".into()), InsertOutcome::Inserted);
//! assert_eq!(store.insert(3, "b".into()), InsertOutcome::AlreadyExists);
//! assert_eq!(store.search(&3), Some("a".to_string()));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod skiplist;
pub mod snapshot;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError};
pub use config::Config;
pub use skiplist::{DeleteOutcome, InsertOutcome, SkipList};
pub use snapshot::ImportStats;
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of skipkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
