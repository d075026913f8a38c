pub mod bookings;
pub mod table;

pub use bookings::{render_page, BookingListView, ViewState, FETCH_FAILED_MESSAGE};
pub use table::{BookingTable, LoggingTableActions, TableActions};
