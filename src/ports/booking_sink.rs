//! Booking Sink Port - Destination for booking records.
//!
//! Each time a session first enters a booking checkpoint state, the manager
//! emits one [`BookingRecord`] here. Implementations forward it to whatever
//! the clinic uses: a CRM, a spreadsheet exporter, or just the log.

use async_trait::async_trait;

use crate::domain::booking::BookingRecord;

use super::SinkError;

/// Port for recording booking progress outside the conversation.
#[async_trait]
pub trait BookingSink: Send + Sync {
    /// Record a booking snapshot.
    ///
    /// Failures are reported but must not abort the conversation turn.
    async fn log_booking(&self, record: &BookingRecord) -> Result<(), SinkError>;
}
