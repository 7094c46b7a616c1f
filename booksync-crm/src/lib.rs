//! CRM (Dynamics Web API) implementation of [`booksync_core::BookingSource`].
//!
//! - [`client`]: HTTP transport with retry, paging and egress checks
//! - [`query`]: OData filters for the three booking queries
//! - [`records`] / [`mapper`]: raw records and their mapping to bookings
//! - [`source`]: the gateway itself

pub mod client;
pub mod mapper;
pub mod query;
pub mod records;
pub mod retry;
pub mod source;

pub use client::CrmClient;
pub use mapper::{map_batch, MappedBatch};
pub use retry::RetryPolicy;
pub use source::CrmSource;
