//! Notification Sink Port - Outbound patient notifications.

use async_trait::async_trait;

use crate::domain::booking::BookingRecord;

use super::SinkError;

/// Port for notifying the patient about their booking.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Send a booking confirmation to the patient's phone.
    ///
    /// Only called when a phone number was collected. Best-effort.
    async fn send_confirmation(&self, phone: &str, record: &BookingRecord)
        -> Result<(), SinkError>;
}
