//! booksync core library: domain types, configuration, errors and the
//! gateway contracts shared by the CRM and SARAS crates.
//!
//! - [`types`] / [`codes`]: bookings and the CRM option-set codes
//! - [`error`]: [`SyncError`] and friends
//! - [`gateway`]: [`BookingSource`] / [`BookingTarget`]
//! - [`config`], [`auth`], [`egress`]: what a run needs before it starts
//! - [`clock`], [`telemetry`]: time sources and business events

pub mod auth;
pub mod clock;
pub mod codes;
pub mod config;
pub mod egress;
pub mod error;
pub mod gateway;
pub mod telemetry;
pub mod types;

pub use auth::{AccessToken, Credentials, TokenSource};
pub use clock::{Clock, FixedClock, RecordingSleeper, Sleeper, SystemClock, TokioSleeper};
pub use codes::{Organisation, TestType};
pub use config::{AppConfig, Secret};
pub use egress::EgressFilter;
pub use error::{AuthError, ConfigError, DownstreamError, DownstreamKind, ErrorKind, SyncError};
pub use gateway::{BookingSource, BookingTarget};
pub use telemetry::BusinessEvent;
pub use types::{
    Address, BookingDetails, BookingProduct, BookingProductId, BookingReference, Contact, Licence,
    Product, SyncTimestamp, TestCentre,
};
