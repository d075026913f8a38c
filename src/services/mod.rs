pub mod api;
pub mod navigation;
pub mod session;
pub mod shaping;
