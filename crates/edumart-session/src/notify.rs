//! # Outcome Notifications
//!
//! Typed outcome events and the sink trait the UI adapter implements.
//!
//! The stores compute WHAT happened (a typed [`Notification`]); a thin
//! adapter at the boundary decides HOW to show it (toast, banner, sound).
//! Nothing in this workspace renders anything.

use serde::{Deserialize, Serialize};

// =============================================================================
// Notification
// =============================================================================

/// Severity of an outcome event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

/// A structured outcome event emitted by the stores and the checkout flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// Creates an informational notification.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Creates a success notification.
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Creates an error notification.
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notification {
            kind: NotificationKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

// =============================================================================
// Sink
// =============================================================================

/// Where outcome events go.
///
/// The UI adapter implements this once and hands it to the stores at
/// bootstrap. Publishing must not block: implementations should enqueue
/// and return.
pub trait NotificationSink: Send + Sync {
    /// Publishes one outcome event.
    fn publish(&self, notification: Notification);
}

/// A sink that discards everything.
///
/// For headless embedders and tests that don't assert on notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn publish(&self, _notification: Notification) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        assert_eq!(Notification::info("t", "d").kind, NotificationKind::Info);
        assert_eq!(
            Notification::success("t", "d").kind,
            NotificationKind::Success
        );
        assert_eq!(Notification::error("t", "d").kind, NotificationKind::Error);
    }

    #[test]
    fn test_serialization_shape() {
        let n = Notification::success("Added to cart", "Algebra I is in your cart.");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["kind"], "success");
        assert_eq!(json["title"], "Added to cart");
    }
}
