use chrono::FixedOffset;

use crate::models::booking::YOU;
use crate::models::{DisplayBooking, OptimisticBooking, RawBooking, StartTime};

const SLOT_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";
const INVALID_DATE: &str = "Invalid Date";

/// Renders a slot as `6/16/2025, 10:00:00 AM (30 mins)`. Zoned starts are
/// shifted into `offset`; wall-clock starts are shown as sent.
pub fn format_slot_time(start: &StartTime, duration_minutes: i64, offset: &FixedOffset) -> String {
    let when = match start {
        StartTime::Zoned(dt) => dt.with_timezone(offset).format(SLOT_FORMAT).to_string(),
        StartTime::Naive(dt) => dt.format(SLOT_FORMAT).to_string(),
        StartTime::Invalid(_) => INVALID_DATE.to_string(),
    };
    format!("{when} ({duration_minutes} mins)")
}

pub fn to_display(raw: &RawBooking, offset: &FixedOffset) -> DisplayBooking {
    if let StartTime::Invalid(value) = &raw.start_time {
        tracing::warn!(booking_id = %raw.id, value = %value, "unreadable booking start time");
    }
    DisplayBooking {
        id: raw.id.clone(),
        user: YOU.to_string(),
        station: raw.station_name.clone(),
        slot_time: format_slot_time(&raw.start_time, raw.duration, offset),
        status: raw.status.display_label(),
    }
}

/// Builds the table rows: fetched bookings in API order, with the just-made
/// booking (if any) in front.
pub fn shape_bookings(
    raw: &[RawBooking],
    optimistic: Option<&OptimisticBooking>,
    offset: &FixedOffset,
) -> Vec<DisplayBooking> {
    let mapped = raw.iter().map(|b| to_display(b, offset));

    match optimistic {
        Some(booking) => std::iter::once(booking.clone().into_display())
            .chain(mapped)
            .collect(),
        None => mapped.collect(),
    }
}
