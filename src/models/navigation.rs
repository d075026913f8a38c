use serde::{Deserialize, Serialize};

use super::booking::OptimisticBooking;

/// Payload the previous view hands over when navigating here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    #[serde(default)]
    pub just_booked: bool,
    #[serde(default)]
    pub booking: Option<OptimisticBooking>,
}

impl NavigationState {
    pub fn just_booked(booking: OptimisticBooking) -> Self {
        Self {
            just_booked: true,
            booking: Some(booking),
        }
    }

    /// The booking to show ahead of the fetched list, if any.
    pub fn optimistic(&self) -> Option<&OptimisticBooking> {
        if self.just_booked {
            self.booking.as_ref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Stations,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Stations => "/stations",
        }
    }
}
