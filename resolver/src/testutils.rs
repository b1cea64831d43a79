use crate::providers::{FlightProvider, Lookup, ProviderError};
use crate::types::{FlightEndpoint, FlightRecord, FlightStatus, Source};
use crate::variants::FlightCode;
use async_trait::async_trait;
use chrono::{Duration as TimeDelta, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A record on the LHR to JFK route departing in an hour.
pub fn sample_record(flight_number: &str, source: Source) -> FlightRecord {
    let departure_time = Utc::now() + TimeDelta::hours(1);
    FlightRecord {
        flight_number: flight_number.to_string(),
        airline: Some("British Airways".into()),
        aircraft: None,
        status: FlightStatus::Scheduled,
        departure: FlightEndpoint::scheduled("Heathrow Airport", "LHR", departure_time),
        arrival: FlightEndpoint::scheduled(
            "John F. Kennedy International Airport",
            "JFK",
            departure_time + TimeDelta::hours(8),
        ),
        live: source == Source::Live,
        source,
    }
}

enum Reply {
    Found(FlightRecord),
    NotFound,
    Failing,
}

/// Provider returning a canned answer, optionally after a delay.
pub struct StubProvider {
    name: &'static str,
    reply: Reply,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    fn with_reply(name: &'static str, reply: Reply) -> Self {
        StubProvider {
            name,
            reply,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn found(name: &'static str, record: FlightRecord) -> Self {
        Self::with_reply(name, Reply::Found(record))
    }

    pub fn not_found(name: &'static str) -> Self {
        Self::with_reply(name, Reply::NotFound)
    }

    pub fn failing(name: &'static str) -> Self {
        Self::with_reply(name, Reply::Failing)
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared handle to the number of `resolve` calls.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl FlightProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn resolve(&self, _code: &FlightCode) -> Lookup {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Found(record) => Lookup::Found(record.clone()),
            Reply::NotFound => Lookup::NotFound,
            Reply::Failing => Lookup::Failed(ProviderError::Malformed("stub failure".into())),
        }
    }
}
