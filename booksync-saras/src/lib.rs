//! SARAS implementation of [`booksync_core::BookingTarget`].

pub mod client;
pub mod convert;
pub mod retry_after;
pub mod target;
pub mod wire;

pub use client::SarasClient;
pub use convert::to_saras;
pub use retry_after::parse_retry_after;
pub use target::SarasTarget;
pub use wire::SarasBooking;
