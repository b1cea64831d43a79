//! Live-position provider backed by the OpenSky Network state vectors API.
//!
//! OpenSky has no per-flight lookup, so the full set of current states is
//! fetched and matched on callsign locally. States carry no route or timetable,
//! so endpoints are filled in from the enrichment tables with placeholder times.

use super::{FlightProvider, Lookup, ProviderError, get_json};
use crate::enrichment;
use crate::types::{FlightEndpoint, FlightRecord, FlightStatus, Source};
use crate::variants::FlightCode;
use async_trait::async_trait;
use chrono::{DateTime, Duration as TimeDelta, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const NAME: &str = "opensky";
pub const DEFAULT_BASE_URL: &str = "https://opensky-network.org/api";

// Placeholder hours either side of "now" for the synthesized route.
const PLACEHOLDER_OFFSET_HOURS: i64 = 2;

// Positions within a state vector row.
const ICAO24: usize = 0;
const CALLSIGN: usize = 1;
const ORIGIN_COUNTRY: usize = 2;
const ON_GROUND: usize = 8;

#[derive(Deserialize, Debug)]
struct StatesResponse {
    // null when no aircraft are tracked
    states: Option<Vec<Vec<Value>>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateVector {
    pub icao24: String,
    pub callsign: String,
    pub origin_country: String,
    pub on_ground: bool,
}

impl StateVector {
    /// Decodes one positional row. Rows without a callsign are skipped.
    fn from_row(row: &[Value]) -> Option<Self> {
        let callsign = row.get(CALLSIGN)?.as_str()?.trim().to_ascii_uppercase();
        if callsign.is_empty() {
            return None;
        }

        Some(StateVector {
            icao24: row.get(ICAO24)?.as_str()?.trim().to_string(),
            callsign,
            origin_country: row
                .get(ORIGIN_COUNTRY)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            on_ground: row.get(ON_GROUND).and_then(Value::as_bool).unwrap_or(false),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// Callsign contains one of the identifier forms.
    Callsign,
    /// Only the carrier prefix matched. The state may be a different flight of
    /// the same carrier.
    CarrierPrefix,
}

/// Finds the state vector for a flight.
pub fn find_flight<'a>(
    states: &'a [StateVector],
    code: &FlightCode,
) -> Option<(&'a StateVector, MatchKind)> {
    let mut needles: Vec<String> = Vec::with_capacity(4);
    let candidates = [
        Some(code.as_str().to_string()),
        code.icao_form(),
        code.carrier().map(String::from),
        Some(code.compact().to_string()),
    ];
    for needle in candidates.into_iter().flatten() {
        if !needle.is_empty() && !needles.contains(&needle) {
            needles.push(needle);
        }
    }

    for needle in &needles {
        if let Some(state) = states.iter().find(|s| s.callsign.contains(needle.as_str())) {
            return Some((state, MatchKind::Callsign));
        }
    }

    let prefix = code.compact().get(..2)?;
    states
        .iter()
        .find(|s| s.callsign.starts_with(prefix))
        .map(|state| (state, MatchKind::CarrierPrefix))
}

/// Builds a record for a matched state, synthesizing the route.
pub fn state_to_record(state: &StateVector, now: DateTime<Utc>) -> FlightRecord {
    let airline_icao = state
        .callsign
        .get(..3)
        .filter(|prefix| prefix.bytes().all(|b| b.is_ascii_alphabetic()));
    let route = enrichment::plausible_route(airline_icao, Some(&state.origin_country));

    let departure = FlightEndpoint::scheduled(
        enrichment::airport_name(route.departure),
        route.departure,
        now - TimeDelta::hours(PLACEHOLDER_OFFSET_HOURS),
    );
    let arrival = FlightEndpoint::scheduled(
        enrichment::airport_name(route.arrival),
        route.arrival,
        now + TimeDelta::hours(PLACEHOLDER_OFFSET_HOURS),
    );

    // The provider reports ground state in real time; no inference needed.
    let status = if state.on_ground {
        FlightStatus::Landed
    } else {
        FlightStatus::InFlight
    };

    FlightRecord {
        flight_number: state.callsign.clone(),
        airline: airline_icao
            .and_then(enrichment::airline_name)
            .map(String::from),
        aircraft: Some(state.icao24.to_ascii_uppercase()).filter(|a| !a.is_empty()),
        status,
        departure,
        arrival,
        live: true,
        source: Source::Live,
    }
}

pub struct OpenSkyProvider {
    client: reqwest::Client,
    states_url: String,
    credentials: Option<(String, String)>,
    timeout: Duration,
}

impl OpenSkyProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: &Url,
        credentials: Option<(String, String)>,
        timeout: Duration,
    ) -> Self {
        let states_url = format!("{}/states/all", base_url.as_str().trim_end_matches('/'));

        OpenSkyProvider {
            client,
            states_url,
            credentials,
            timeout,
        }
    }

    async fn load_states(&self) -> Result<Vec<StateVector>, ProviderError> {
        let mut request = self.client.get(&self.states_url);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response: StatesResponse = get_json(request, self.timeout).await?;

        Ok(response
            .states
            .unwrap_or_default()
            .iter()
            .filter_map(|row| StateVector::from_row(row))
            .collect())
    }
}

#[async_trait]
impl FlightProvider for OpenSkyProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn resolve(&self, code: &FlightCode) -> Lookup {
        let states = match self.load_states().await {
            Ok(states) => states,
            Err(e) => return Lookup::Failed(e),
        };

        tracing::debug!(provider = NAME, states = states.len(), "Loaded state vectors");

        match find_flight(&states, code) {
            Some((state, kind)) => {
                if kind == MatchKind::CarrierPrefix {
                    tracing::warn!(
                        provider = NAME,
                        flight = %code,
                        callsign = %state.callsign,
                        "No callsign match, using first flight of the same carrier"
                    );
                }
                Lookup::Found(state_to_record(state, Utc::now()))
            }
            None => Lookup::NotFound,
        }
    }
}
