//! Shared fixtures for this crate's unit tests.

use std::sync::Mutex as StdMutex;

use edumart_core::{Course, Money, Points};

use crate::notify::{Notification, NotificationSink};

/// Sink that records everything published, for assertions.
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub notifications: StdMutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn titles(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn publish(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

pub(crate) fn test_course(id: &str, price_cents: i64, points: i64) -> Course {
    Course {
        id: id.to_string(),
        title: format!("Course {}", id),
        price: Money::from_cents(price_cents),
        points_price: Points::new(points),
        image_url: None,
        teacher_name: "Ada Lovelace".to_string(),
        subject: "Mathematics".to_string(),
    }
}
