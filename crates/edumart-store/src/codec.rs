//! # Session Codec
//!
//! Typed serialization of cart and code state to and from the durable
//! key-value store.
//!
//! ## Fail-Soft Loads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Load Behavior                                     │
//! │                                                                         │
//! │  load_cart()                                                            │
//! │       │                                                                 │
//! │       ├── key absent ───────────────► empty Cart                       │
//! │       ├── storage error ── warn! ───► empty Cart                       │
//! │       ├── corrupt JSON ─── warn! ───► empty Cart                       │
//! │       └── valid payload ────────────► Cart (totals re-derived)         │
//! │                                                                         │
//! │  Loads run at application startup, before any error-display UI         │
//! │  exists. Nothing on the load path ever returns an error.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Temporal Round-Trip
//! `CartItem.added_at` is persisted as an RFC 3339 string inside the JSON
//! payload and deserialized back into a real `DateTime<Utc>`. Anything
//! downstream doing date arithmetic or display formatting gets a true
//! temporal value, never a string that happens to look like one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use edumart_core::{Cart, ReferralCode, VoucherCode};

use crate::error::StoreResult;
use crate::pool::Storage;
use crate::repository::state::SessionStateRepository;

// =============================================================================
// Storage Keys
// =============================================================================

/// Key holding the serialized cart aggregate.
pub const CART_KEY: &str = "cart";

/// Key holding the active voucher, if any.
pub const VOUCHER_KEY: &str = "voucher_code";

/// Key holding the active referral code, if any.
pub const REFERRAL_KEY: &str = "referral_code";

// =============================================================================
// Session Codec
// =============================================================================

/// Typed codec over the session state repository.
///
/// Saves are explicit and fallible (the session layer decides what a
/// failed write means); loads are fail-soft and infallible.
#[derive(Debug, Clone)]
pub struct SessionCodec {
    repo: SessionStateRepository,
}

impl SessionCodec {
    /// Creates a codec over the given storage handle.
    pub fn new(storage: Storage) -> Self {
        SessionCodec {
            repo: storage.session_state(),
        }
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Persists the cart under [`CART_KEY`].
    pub async fn save_cart(&self, cart: &Cart) -> StoreResult<()> {
        self.save(CART_KEY, cart).await
    }

    /// Loads the cart, failing soft to the empty cart.
    ///
    /// Totals are re-derived from the restored item sequence rather than
    /// trusted from the payload.
    pub async fn load_cart(&self) -> Cart {
        let mut cart: Cart = self.load_or_default(CART_KEY).await.unwrap_or_default();
        cart.restore_invariants();
        cart
    }

    // -------------------------------------------------------------------------
    // Voucher
    // -------------------------------------------------------------------------

    /// Persists the active voucher under [`VOUCHER_KEY`].
    pub async fn save_voucher(&self, voucher: &VoucherCode) -> StoreResult<()> {
        self.save(VOUCHER_KEY, voucher).await
    }

    /// Loads the active voucher, failing soft to `None`.
    pub async fn load_voucher(&self) -> Option<VoucherCode> {
        self.load_or_default(VOUCHER_KEY).await
    }

    /// Removes the persisted voucher.
    pub async fn clear_voucher(&self) -> StoreResult<()> {
        self.repo.delete(VOUCHER_KEY).await
    }

    // -------------------------------------------------------------------------
    // Referral
    // -------------------------------------------------------------------------

    /// Persists the active referral code under [`REFERRAL_KEY`].
    pub async fn save_referral(&self, referral: &ReferralCode) -> StoreResult<()> {
        self.save(REFERRAL_KEY, referral).await
    }

    /// Loads the active referral code, failing soft to `None`.
    pub async fn load_referral(&self) -> Option<ReferralCode> {
        self.load_or_default(REFERRAL_KEY).await
    }

    /// Removes the persisted referral code.
    pub async fn clear_referral(&self) -> StoreResult<()> {
        self.repo.delete(REFERRAL_KEY).await
    }

    // -------------------------------------------------------------------------
    // Bulk
    // -------------------------------------------------------------------------

    /// Removes all three session keys.
    ///
    /// The terminal step of a successful checkout (and of an explicit
    /// "empty cart"): a page refresh mid-redirect must not resurrect
    /// stale cart or code state.
    pub async fn clear_all(&self) -> StoreResult<()> {
        self.repo.delete(CART_KEY).await?;
        self.repo.delete(VOUCHER_KEY).await?;
        self.repo.delete(REFERRAL_KEY).await?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn save<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        let payload = serde_json::to_string(value)?;
        self.repo.put(key, &payload).await
    }

    /// Fail-soft load: absent, unreadable, or corrupt payloads become `None`.
    async fn load_or_default<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = match self.repo.get(key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %key, error = %err, "Session state unreadable, falling back to default");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = %key, error = %err, "Corrupt session payload, falling back to default");
                None
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StorageConfig;
    use edumart_core::{Course, Money, Points, VoucherBenefit};

    async fn test_codec() -> (SessionCodec, SessionStateRepository) {
        let storage = Storage::new(StorageConfig::in_memory()).await.unwrap();
        (SessionCodec::new(storage.clone()), storage.session_state())
    }

    fn test_course(id: &str, price_cents: i64, points: i64) -> Course {
        Course {
            id: id.to_string(),
            title: format!("Course {}", id),
            price: Money::from_cents(price_cents),
            points_price: Points::new(points),
            image_url: Some(format!("https://img.example/{}.jpg", id)),
            teacher_name: "Ada Lovelace".to_string(),
            subject: "Mathematics".to_string(),
        }
    }

    #[tokio::test]
    async fn test_cart_round_trip() {
        let (codec, _) = test_codec().await;

        let mut cart = Cart::new();
        cart.add_course(&test_course("algebra", 9900, 50));
        cart.add_course(&test_course("guitar", 4900, 25));

        codec.save_cart(&cart).await.unwrap();
        let restored = codec.load_cart().await;

        assert_eq!(restored, cart);
        // added_at must come back as a true temporal value, not a string:
        // typed DateTime equality, and date arithmetic must work on it
        assert_eq!(restored.items[0].added_at, cart.items[0].added_at);
        let age = chrono::Utc::now() - restored.items[0].added_at;
        assert!(age.num_seconds() >= 0);
    }

    #[tokio::test]
    async fn test_load_cart_absent_is_empty() {
        let (codec, _) = test_codec().await;
        let cart = codec.load_cart().await;
        assert!(cart.is_empty());
        assert!(cart.total_price.is_zero());
    }

    #[tokio::test]
    async fn test_load_cart_corrupt_fails_soft() {
        let (codec, repo) = test_codec().await;

        repo.put(CART_KEY, "{ not json").await.unwrap();
        let cart = codec.load_cart().await;
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_load_cart_rederives_totals() {
        let (codec, repo) = test_codec().await;

        let mut cart = Cart::new();
        cart.add_course(&test_course("algebra", 9900, 50));
        let mut payload: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&cart).unwrap()).unwrap();
        // Tamper with the stored totals; the item sequence is authoritative
        payload["totalPrice"] = serde_json::json!(1);
        payload["totalPointsPrice"] = serde_json::json!(99999);
        repo.put(CART_KEY, &payload.to_string()).await.unwrap();

        let restored = codec.load_cart().await;
        assert_eq!(restored.total_price, Money::from_cents(9900));
        assert_eq!(restored.total_points_price, Points::new(50));
    }

    #[tokio::test]
    async fn test_voucher_round_trip_and_clear() {
        let (codec, _) = test_codec().await;

        assert_eq!(codec.load_voucher().await, None);

        let voucher = VoucherCode::new("DISCOUNT20", VoucherBenefit::Percentage { percent: 20 });
        codec.save_voucher(&voucher).await.unwrap();
        assert_eq!(codec.load_voucher().await, Some(voucher));

        codec.clear_voucher().await.unwrap();
        assert_eq!(codec.load_voucher().await, None);
    }

    #[tokio::test]
    async fn test_referral_round_trip_and_clear() {
        let (codec, _) = test_codec().await;

        let referral = ReferralCode {
            code: "FRIEND10".to_string(),
        };
        codec.save_referral(&referral).await.unwrap();
        assert_eq!(codec.load_referral().await, Some(referral));

        codec.clear_referral().await.unwrap();
        assert_eq!(codec.load_referral().await, None);
    }

    #[tokio::test]
    async fn test_corrupt_voucher_fails_soft() {
        let (codec, repo) = test_codec().await;

        repo.put(VOUCHER_KEY, r#"{"code": 42}"#).await.unwrap();
        assert_eq!(codec.load_voucher().await, None);
    }

    #[tokio::test]
    async fn test_clear_all_removes_every_key() {
        let (codec, repo) = test_codec().await;

        let mut cart = Cart::new();
        cart.add_course(&test_course("algebra", 9900, 50));
        codec.save_cart(&cart).await.unwrap();
        codec
            .save_voucher(&VoucherCode::new(
                "SAVE15",
                VoucherBenefit::Fixed {
                    amount: Money::from_cents(1500),
                },
            ))
            .await
            .unwrap();
        codec
            .save_referral(&ReferralCode {
                code: "FRIEND10".to_string(),
            })
            .await
            .unwrap();

        codec.clear_all().await.unwrap();

        assert_eq!(repo.get(CART_KEY).await.unwrap(), None);
        assert_eq!(repo.get(VOUCHER_KEY).await.unwrap(), None);
        assert_eq!(repo.get(REFERRAL_KEY).await.unwrap(), None);
        assert!(codec.load_cart().await.is_empty());
    }
}
