//! # edumart-session: Session Orchestration for the Edumart Cart Engine
//!
//! The layer the web front end talks to. Owns the canonical in-memory
//! session state (cart + discount codes), persists every change through
//! `edumart-store`, and runs the points checkout against external
//! collaborators.
//!
//! ## Module Organization
//! ```text
//! edumart_session/
//! ├── lib.rs          ◄─── You are here (exports & bootstrap)
//! ├── session.rs      ◄─── SessionContext: startup wiring
//! ├── cart_store.rs   ◄─── Cart state management
//! ├── codes.rs        ◄─── Voucher / referral slots
//! ├── pricing.rs      ◄─── Derived pricing summary
//! ├── checkout.rs     ◄─── Points checkout orchestration
//! ├── ledger.rs       ◄─── External collaborator traits
//! ├── notify.rs       ◄─── Outcome notifications & sink trait
//! ├── config.rs       ◄─── Session configuration
//! └── error.rs        ◄─── Boundary error type
//! ```
//!
//! ## State Management (Multiple State Types)
//! Instead of a single `AppState` struct, focused state types:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Management                             │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐   │
//! │  │    CartStore     │ │    CodeStore     │ │ CheckoutOrchestrator │   │
//! │  │                  │ │                  │ │                      │   │
//! │  │  • Current cart  │ │  • Voucher slot  │ │  • Balance guards    │   │
//! │  │  • Derived totals│ │  • Referral slot │ │  • Purchase call     │   │
//! │  │  • Persistence   │ │  • Registries    │ │  • Settlement        │   │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘   │
//! │                                                                         │
//! │  WHY: The UI layer holds exactly the stores it needs. Better           │
//! │       separation of concerns and testability.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart_store;
pub mod checkout;
pub mod codes;
pub mod config;
pub mod error;
pub mod ledger;
pub mod notify;
pub mod pricing;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use cart_store::CartStore;
pub use checkout::{CheckoutOrchestrator, CheckoutOutcome, FollowUp};
pub use codes::CodeStore;
pub use config::SessionConfig;
pub use error::{ErrorCode, SessionError};
pub use ledger::{PointsLedger, PurchaseCallError, PurchaseReceipt, PurchaseRequest, PurchaseService};
pub use notify::{Notification, NotificationKind, NotificationSink, NullSink};
pub use pricing::PricingSummary;
pub use session::SessionContext;
