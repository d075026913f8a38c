pub mod http;

use async_trait::async_trait;

use crate::models::{RawBooking, UserId};

#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn get_bookings_for_user(&self, user_id: &UserId) -> anyhow::Result<Vec<RawBooking>>;
}
