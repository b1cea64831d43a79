//! Flight information resolution.
//!
//! [`FlightResolver`] turns a flight identifier into a [`FlightRecord`] by
//! combining a schedule provider with a live-position provider, and falls back
//! to a synthetic record when neither knows the flight.

pub mod config;
pub mod enrichment;
pub mod merge;
pub mod metrics_defs;
pub mod providers;
pub mod resolver;
pub mod status;
pub mod synthetic;
pub mod types;
pub mod variants;

#[cfg(test)]
mod testutils;

pub use config::{ResolverConfig, ValidationError};
pub use enrichment::AirportInfo;
pub use resolver::{FlightResolver, ResolverError};
pub use types::{FlightEndpoint, FlightRecord, FlightStatus, Source};
pub use variants::{FlightCode, IdentifierError};
