use crate::config::{ResolverConfig, ValidationError};
use crate::enrichment::{self, AirportInfo};
use crate::merge::overlay_live;
use crate::metrics_defs::{PROVIDER_DURATION, PROVIDER_REQUESTS, RESOLUTION_SOURCE};
use crate::providers::{
    AviationStackProvider, FlightProvider, Lookup, OpenSkyProvider, ProviderError,
};
use crate::synthetic;
use crate::types::FlightRecord;
use crate::variants::FlightCode;
use chrono::Utc;
use shared::{counter, histogram};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(thiserror::Error, Debug)]
pub enum ResolverError {
    #[error("invalid resolver config: {0}")]
    Config(#[from] ValidationError),
    #[error("invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Resolves flight identifiers to records.
///
/// The schedule provider is asked first. A schedule match is enriched with
/// the live provider's status when the live provider also knows the flight.
/// Without a schedule match the live provider is used on its own, and when
/// neither provider has the flight a synthetic record is returned. Provider
/// failures are logged and never reach the caller.
///
/// Cloning is cheap and clones share the providers.
#[derive(Clone, Default)]
pub struct FlightResolver {
    schedule: Option<Arc<dyn FlightProvider>>,
    live: Option<Arc<dyn FlightProvider>>,
    budget: Option<Duration>,
}

impl FlightResolver {
    /// A resolver with no providers. Every flight resolves to a synthetic record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ResolverConfig) -> Result<Self, ResolverError> {
        config.validate()?;

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let mut resolver = FlightResolver::new();

        if let Some(schedule) = &config.schedule_provider {
            let access_key = schedule
                .access_key
                .clone()
                .ok_or(ValidationError::MissingAccessKey)?;
            resolver = resolver.with_schedule_provider(Arc::new(AviationStackProvider::new(
                client.clone(),
                &schedule.base_url()?,
                access_key,
                schedule.timeout(),
            )));
        }

        if let Some(live) = &config.live_provider {
            resolver = resolver.with_live_provider(Arc::new(OpenSkyProvider::new(
                client,
                &live.base_url()?,
                live.credentials(),
                live.timeout(),
            )));
        }

        if let Some(budget) = config.resolution_budget() {
            resolver = resolver.with_budget(budget);
        }

        Ok(resolver)
    }

    pub fn with_schedule_provider(mut self, provider: Arc<dyn FlightProvider>) -> Self {
        self.schedule = Some(provider);
        self
    }

    pub fn with_live_provider(mut self, provider: Arc<dyn FlightProvider>) -> Self {
        self.live = Some(provider);
        self
    }

    /// Caps the total time spent on provider calls per resolution.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Resolves a flight within the configured budget, if any. Always
    /// returns a record.
    pub async fn resolve_flight(&self, code: &FlightCode) -> FlightRecord {
        let deadline = self.budget.map(|budget| Instant::now() + budget);
        self.resolve(code, deadline).await
    }

    /// Resolves a flight, giving up on providers at `deadline`. Once the
    /// deadline passes the remaining provider calls are skipped and a
    /// synthetic record is returned.
    pub async fn resolve_flight_before(
        &self,
        code: &FlightCode,
        deadline: Instant,
    ) -> FlightRecord {
        self.resolve(code, Some(deadline)).await
    }

    pub fn resolve_airport(&self, code: &str) -> AirportInfo {
        enrichment::resolve_airport(code)
    }

    async fn resolve(&self, code: &FlightCode, deadline: Option<Instant>) -> FlightRecord {
        let record = match self.lookup_providers(code, deadline).await {
            Some(record) => record,
            None => synthetic::synthesize(code, Utc::now()),
        };

        counter!(RESOLUTION_SOURCE, "source" => record.source.as_str()).increment(1);
        tracing::info!(
            flight = %code,
            source = record.source.as_str(),
            status = record.status.as_str(),
            "Resolved flight"
        );

        record
    }

    async fn lookup_providers(
        &self,
        code: &FlightCode,
        deadline: Option<Instant>,
    ) -> Option<FlightRecord> {
        if let Some(schedule) = &self.schedule
            && let Lookup::Found(record) = call(schedule.as_ref(), code, deadline).await
        {
            if let Some(live) = &self.live
                && let Lookup::Found(live_record) = call(live.as_ref(), code, deadline).await
            {
                return Some(overlay_live(record, &live_record));
            }
            return Some(record);
        }

        if let Some(live) = &self.live
            && let Lookup::Found(record) = call(live.as_ref(), code, deadline).await
        {
            return Some(record);
        }

        None
    }
}

/// Calls one provider, bounded by `deadline`, and records the outcome.
async fn call(
    provider: &dyn FlightProvider,
    code: &FlightCode,
    deadline: Option<Instant>,
) -> Lookup {
    let name = provider.name();

    if let Some(deadline) = deadline
        && Instant::now() >= deadline
    {
        tracing::debug!(provider = name, flight = %code, "Deadline passed, skipping provider");
        return Lookup::Failed(ProviderError::DeadlineExceeded);
    }

    let start = Instant::now();
    let lookup = match deadline {
        Some(deadline) => tokio::time::timeout_at(deadline, provider.resolve(code))
            .await
            .unwrap_or_else(|_| Lookup::Failed(ProviderError::DeadlineExceeded)),
        None => provider.resolve(code).await,
    };

    histogram!(PROVIDER_DURATION, "provider" => name).record(start.elapsed().as_secs_f64());
    counter!(PROVIDER_REQUESTS, "provider" => name, "outcome" => lookup.outcome()).increment(1);

    match &lookup {
        Lookup::Failed(e) => {
            tracing::warn!(provider = name, flight = %code, error = %e, "Provider lookup failed")
        }
        Lookup::NotFound => {
            tracing::debug!(provider = name, flight = %code, "Flight not found")
        }
        Lookup::Found(_) => {
            tracing::debug!(provider = name, flight = %code, "Flight found")
        }
    }

    lookup
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LiveProviderConfig, ScheduleProviderConfig};
    use crate::testutils::{StubProvider, sample_record};
    use crate::types::{FlightStatus, Source};
    use std::sync::atomic::Ordering;

    fn code(s: &str) -> FlightCode {
        FlightCode::parse(s).unwrap()
    }

    fn live_record() -> FlightRecord {
        let mut live = sample_record("BAW117", Source::Live);
        live.status = FlightStatus::InFlight;
        live.departure.iata_code = "JFK".into();
        live.arrival.iata_code = "LAX".into();
        live
    }

    #[tokio::test]
    async fn test_hybrid_merge() {
        let schedule = sample_record("BA117", Source::Schedule);
        let resolver = FlightResolver::new()
            .with_schedule_provider(Arc::new(StubProvider::found("schedule", schedule.clone())))
            .with_live_provider(Arc::new(StubProvider::found("live", live_record())));

        let record = resolver.resolve_flight(&code("BA117")).await;

        assert_eq!(record.source, Source::Hybrid);
        assert_eq!(record.status, FlightStatus::InFlight);
        assert!(record.live);
        // Route and schedule come from the schedule provider.
        assert_eq!(record.flight_number, "BA117");
        assert_eq!(record.departure, schedule.departure);
        assert_eq!(record.arrival, schedule.arrival);
    }

    #[tokio::test]
    async fn test_schedule_only() {
        let schedule = sample_record("BA117", Source::Schedule);
        let resolver = FlightResolver::new()
            .with_schedule_provider(Arc::new(StubProvider::found("schedule", schedule.clone())))
            .with_live_provider(Arc::new(StubProvider::failing("live")));

        let record = resolver.resolve_flight(&code("BA117")).await;
        assert_eq!(record, schedule);
        assert!(!record.live);
    }

    #[tokio::test]
    async fn test_live_only_after_schedule_failure() {
        let live = StubProvider::found("live", live_record());
        let live_calls = live.calls();
        let resolver = FlightResolver::new()
            .with_schedule_provider(Arc::new(StubProvider::failing("schedule")))
            .with_live_provider(Arc::new(live));

        let record = resolver.resolve_flight(&code("BA117")).await;
        assert_eq!(record.source, Source::Live);
        assert_eq!(record.departure.iata_code, "JFK");
        assert!(record.live);
        assert_eq!(live_calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_live_without_schedule_provider() {
        let live = StubProvider::found("live", live_record());
        let resolver = FlightResolver::new().with_live_provider(Arc::new(live));

        let record = resolver.resolve_flight(&code("BAW117")).await;
        assert_eq!(record.source, Source::Live);
    }

    #[tokio::test]
    async fn test_synthetic_fallback() {
        let resolver = FlightResolver::new()
            .with_schedule_provider(Arc::new(StubProvider::not_found("schedule")))
            .with_live_provider(Arc::new(StubProvider::failing("live")));

        let record = resolver.resolve_flight(&code("HA451")).await;
        assert_eq!(record.source, Source::SyntheticFixed);
        assert_eq!(record.departure.iata_code, "HNL");
        assert!(!record.live);

        let record = resolver.resolve_flight(&code("ZZ9999")).await;
        assert_eq!(record.source, Source::SyntheticRandom);
        assert!(!record.live);
    }

    #[tokio::test]
    async fn test_identifier_without_alphanumerics() {
        let resolver = FlightResolver::new()
            .with_schedule_provider(Arc::new(StubProvider::not_found("schedule")))
            .with_live_provider(Arc::new(StubProvider::not_found("live")));

        let record = resolver.resolve_flight(&code("--")).await;
        assert_eq!(record.source, Source::SyntheticRandom);
        assert_eq!(record.flight_number, "--");
        assert!(!record.live);
    }

    #[tokio::test]
    async fn test_no_providers() {
        let record = FlightResolver::new().resolve_flight(&code("QF3")).await;
        assert_eq!(record.source, Source::SyntheticFixed);
        assert_eq!(record.flight_number, "QF3");
    }

    #[tokio::test]
    async fn test_budget_exceeded_skips_remaining_providers() {
        let live = StubProvider::found("live", live_record());
        let live_calls = live.calls();
        let resolver = FlightResolver::new()
            .with_schedule_provider(Arc::new(
                StubProvider::found("schedule", sample_record("BA117", Source::Schedule))
                    .slow(Duration::from_secs(5)),
            ))
            .with_live_provider(Arc::new(live))
            .with_budget(Duration::from_millis(50));

        let started = Instant::now();
        let record = resolver.resolve_flight(&code("BA117")).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(record.source.is_synthetic());
        assert_eq!(live_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_deadline_already_passed() {
        let schedule = StubProvider::found("schedule", sample_record("BA117", Source::Schedule));
        let schedule_calls = schedule.calls();
        let resolver = FlightResolver::new().with_schedule_provider(Arc::new(schedule));

        let record = resolver
            .resolve_flight_before(&code("BA117"), Instant::now())
            .await;

        assert!(record.source.is_synthetic());
        assert_eq!(schedule_calls.load(Ordering::Relaxed), 0);
    }

    #[tokio::test]
    async fn test_from_config() {
        let config = ResolverConfig {
            resolution_budget_secs: Some(5),
            schedule_provider: Some(ScheduleProviderConfig {
                access_key: Some("key".into()),
                ..Default::default()
            }),
            live_provider: Some(LiveProviderConfig::default()),
        };
        let resolver = FlightResolver::from_config(&config).unwrap();
        assert!(resolver.schedule.is_some());
        assert!(resolver.live.is_some());
        assert_eq!(resolver.budget, Some(Duration::from_secs(5)));

        let invalid = ResolverConfig {
            schedule_provider: Some(ScheduleProviderConfig::default()),
            ..Default::default()
        };
        assert!(matches!(
            FlightResolver::from_config(&invalid),
            Err(ResolverError::Config(ValidationError::MissingAccessKey))
        ));
    }

    #[test]
    fn test_resolve_airport() {
        let resolver = FlightResolver::new();
        assert_eq!(resolver.resolve_airport("syd").city, "Sydney");

        let unknown = resolver.resolve_airport("XQZ");
        assert_eq!(unknown.name, "XQZ Airport");
        assert_eq!(unknown.city, "Unknown");
        assert_eq!(unknown.country, "Unknown");
    }
}
