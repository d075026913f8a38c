use crate::models::{BookingId, DisplayBooking};

/// Row actions the booking table exposes.
pub trait TableActions: Send + Sync {
    fn cancel(&self, id: &BookingId);
    fn complete(&self, id: &BookingId);
}

/// Placeholder hooks: the cancel/complete flows live elsewhere, so requests
/// are only logged.
pub struct LoggingTableActions;

impl TableActions for LoggingTableActions {
    fn cancel(&self, id: &BookingId) {
        tracing::info!(booking_id = %id, "cancel booking requested");
    }

    fn complete(&self, id: &BookingId) {
        tracing::info!(booking_id = %id, "complete booking requested");
    }
}

const HEADERS: [&str; 5] = ["ID", "User", "Station", "Slot", "Status"];

pub struct BookingTable<'a> {
    bookings: &'a [DisplayBooking],
    actions: &'a dyn TableActions,
}

impl<'a> BookingTable<'a> {
    pub fn new(bookings: &'a [DisplayBooking], actions: &'a dyn TableActions) -> Self {
        Self { bookings, actions }
    }

    pub fn cancel(&self, id: &BookingId) {
        self.actions.cancel(id);
    }

    pub fn complete(&self, id: &BookingId) {
        self.actions.complete(id);
    }

    pub fn render(&self) -> String {
        let rows: Vec<[String; 5]> = self
            .bookings
            .iter()
            .map(|b| {
                [
                    b.id.to_string(),
                    b.user.clone(),
                    b.station.clone(),
                    b.slot_time.clone(),
                    b.status.clone(),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let mut out = format_row(&HEADERS.map(String::from), &widths);
        out.push_str(&format_row(&widths.map(|w| "-".repeat(w)), &widths));
        if rows.is_empty() {
            out.push_str("No bookings yet.\n");
        }
        for row in &rows {
            out.push_str(&format_row(row, &widths));
        }
        out
    }
}

fn format_row(cells: &[String; 5], widths: &[usize; 5]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{}\n", line.trim_end())
}
