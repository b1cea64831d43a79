//! Schedule-capable provider backed by the AviationStack flights API.
//!
//! Each identifier variant is queried twice: first restricted to flights that
//! are currently active, then unrestricted. The first variant that returns any
//! usable row wins. A failure on one variant moves on to the next one.

use super::{FlightProvider, Lookup, ProviderError, get_json};
use crate::enrichment;
use crate::status::{FlightTimes, infer_status};
use crate::types::{FlightEndpoint, FlightRecord, Source};
use crate::variants::{FlightCode, QueryAttempt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const NAME: &str = "aviationstack";
pub const DEFAULT_BASE_URL: &str = "http://api.aviationstack.com/v1";

#[derive(Deserialize, Debug)]
struct FlightsResponse {
    data: Option<Vec<FlightRow>>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Debug)]
struct FlightRow {
    departure: Option<EndpointRow>,
    arrival: Option<EndpointRow>,
    airline: Option<AirlineRow>,
    flight: Option<FlightIdRow>,
    aircraft: Option<AircraftRow>,
}

#[derive(Deserialize, Debug, Default)]
struct EndpointRow {
    airport: Option<String>,
    iata: Option<String>,
    icao: Option<String>,
    terminal: Option<String>,
    gate: Option<String>,
    delay: Option<i64>,
    scheduled: Option<String>,
    estimated: Option<String>,
    actual: Option<String>,
}

#[derive(Deserialize, Debug)]
struct AirlineRow {
    name: Option<String>,
    iata: Option<String>,
    icao: Option<String>,
}

#[derive(Deserialize, Debug)]
struct FlightIdRow {
    iata: Option<String>,
    icao: Option<String>,
}

#[derive(Deserialize, Debug)]
struct AircraftRow {
    registration: Option<String>,
    iata: Option<String>,
    icao: Option<String>,
}

pub struct AviationStackProvider {
    client: reqwest::Client,
    flights_url: String,
    access_key: String,
    timeout: Duration,
}

impl AviationStackProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: &Url,
        access_key: String,
        timeout: Duration,
    ) -> Self {
        let flights_url = format!("{}/flights", base_url.as_str().trim_end_matches('/'));

        AviationStackProvider {
            client,
            flights_url,
            access_key,
            timeout,
        }
    }

    async fn query(
        &self,
        attempt: &QueryAttempt,
        active_only: bool,
    ) -> Result<Vec<FlightRow>, ProviderError> {
        let mut request = self
            .client
            .get(&self.flights_url)
            .query(&[("access_key", self.access_key.as_str())])
            .query(&attempt.params);
        if active_only {
            request = request.query(&[("flight_status", "active")]);
        }

        let response: FlightsResponse = get_json(request, self.timeout).await?;

        // The API reports some failures with a 200 and an error object.
        if let Some(error) = response.error {
            return Err(ProviderError::Api {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.data.unwrap_or_default())
    }
}

#[async_trait]
impl FlightProvider for AviationStackProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn resolve(&self, code: &FlightCode) -> Lookup {
        let mut last_error = None;

        'variants: for attempt in code.attempts() {
            for active_only in [true, false] {
                let rows = match self.query(&attempt, active_only).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        tracing::warn!(
                            provider = NAME,
                            variant = ?attempt.kind,
                            error = %e,
                            "Flight query failed, trying next variant"
                        );
                        last_error = Some(e);
                        continue 'variants;
                    }
                };

                tracing::debug!(
                    provider = NAME,
                    variant = ?attempt.kind,
                    active_only,
                    rows = rows.len(),
                    "Flight query completed"
                );

                if rows.is_empty() {
                    continue;
                }

                let now = Utc::now();
                for row in rows {
                    match row.into_record(code, now) {
                        Ok(record) => return Lookup::Found(record),
                        Err(e) => last_error = Some(e),
                    }
                }
                continue 'variants;
            }
        }

        match last_error {
            Some(e) => Lookup::Failed(e),
            None => Lookup::NotFound,
        }
    }
}

fn parse_time(value: Option<&str>) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value?)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

impl EndpointRow {
    fn actual_time(&self) -> Option<DateTime<Utc>> {
        parse_time(self.actual.as_deref())
    }

    // Some rows only carry an estimate or the recorded time.
    fn scheduled_time(&self) -> Option<DateTime<Utc>> {
        parse_time(self.scheduled.as_deref())
            .or_else(|| parse_time(self.estimated.as_deref()))
            .or_else(|| self.actual_time())
    }

    fn into_endpoint(self, scheduled_time: DateTime<Utc>) -> FlightEndpoint {
        let actual_time = self.actual_time();
        let iata_code = self.iata.or(self.icao).unwrap_or_default();
        let airport = match self.airport.filter(|name| !name.trim().is_empty()) {
            Some(name) => name,
            None if iata_code.is_empty() => enrichment::UNKNOWN.to_string(),
            None => enrichment::airport_name(&iata_code),
        };

        FlightEndpoint {
            airport,
            iata_code,
            scheduled_time,
            actual_time,
            terminal: self.terminal,
            gate: self.gate,
            delay_minutes: self
                .delay
                .map(|minutes| u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)),
        }
    }
}

impl FlightRow {
    fn into_record(
        self,
        code: &FlightCode,
        now: DateTime<Utc>,
    ) -> Result<FlightRecord, ProviderError> {
        let departure = self.departure.unwrap_or_default();
        let arrival = self.arrival.unwrap_or_default();

        let scheduled_departure = departure
            .scheduled_time()
            .ok_or_else(|| ProviderError::Malformed("flight has no departure time".into()))?;
        let scheduled_arrival = arrival
            .scheduled_time()
            .ok_or_else(|| ProviderError::Malformed("flight has no arrival time".into()))?;

        let times = FlightTimes {
            scheduled_departure,
            actual_departure: departure.actual_time(),
            scheduled_arrival,
            actual_arrival: arrival.actual_time(),
        };

        let flight_number = self
            .flight
            .and_then(|f| f.iata.or(f.icao))
            .unwrap_or_else(|| code.compact().to_string());

        let airline = self.airline.and_then(|a| {
            a.name.filter(|name| !name.trim().is_empty()).or_else(|| {
                a.iata
                    .as_deref()
                    .and_then(enrichment::airline_name)
                    .or_else(|| a.icao.as_deref().and_then(enrichment::airline_name))
                    .map(String::from)
            })
        });

        let aircraft = self
            .aircraft
            .and_then(|a| a.registration.or(a.iata).or(a.icao));

        Ok(FlightRecord {
            flight_number,
            airline,
            aircraft,
            status: infer_status(&times, now),
            departure: departure.into_endpoint(scheduled_departure),
            arrival: arrival.into_endpoint(scheduled_arrival),
            live: false,
            source: Source::Schedule,
        })
    }
}
