//! # edumart-store: Durable Session Storage for the Edumart Cart Engine
//!
//! This crate provides durable storage for cart and discount-code state.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Edumart Session Data Flow                          │
//! │                                                                         │
//! │  CartStore mutation (add_to_cart)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   edumart-store (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Storage     │    │ SessionState  │    │ SessionCodec │  │   │
//! │  │   │   (pool.rs)   │    │  Repository   │    │  (codec.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ get/put/del   │◄───│ typed save / │  │   │
//! │  │   │ Migrations    │    │ JSON payloads │    │ fail-soft    │  │   │
//! │  │   │               │    │               │    │ load         │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │            <app data dir>/edumart-session.db                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Key-value repository over `session_state`
//! - [`codec`] - Typed cart/voucher/referral payload codec
//!
//! ## Usage
//!
//! ```rust,ignore
//! use edumart_store::{SessionCodec, Storage, StorageConfig};
//!
//! let storage = Storage::new(StorageConfig::new("path/to/session.db")).await?;
//! let codec = SessionCodec::new(storage);
//!
//! codec.save_cart(&cart).await?;
//! let restored = codec.load_cart().await; // fail-soft: never errors
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use codec::SessionCodec;
pub use error::{StoreError, StoreResult};
pub use pool::{Storage, StorageConfig};
pub use repository::state::SessionStateRepository;
