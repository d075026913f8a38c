pub mod booking;
pub mod navigation;
pub mod user;

pub use booking::{BookingId, BookingStatus, DisplayBooking, OptimisticBooking, RawBooking, StartTime};
pub use navigation::{NavigationState, Route};
pub use user::{SessionUser, UserId};
