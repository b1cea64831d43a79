//! Synthetic flight records, used when no provider knows the flight.
//!
//! A small registry of well-known flights always yields the same route. Any
//! other identifier gets a randomized but internally consistent record.

use crate::enrichment;
use crate::types::{FlightEndpoint, FlightRecord, FlightStatus, Source};
use crate::variants::FlightCode;
use chrono::{DateTime, Duration as TimeDelta, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

struct FixedFlight {
    flight_number: &'static str,
    airline: &'static str,
    aircraft: &'static str,
    departure: &'static str,
    arrival: &'static str,
}

const REGISTRY: &[FixedFlight] = &[
    FixedFlight {
        flight_number: "HA451",
        airline: "Hawaiian Airlines",
        aircraft: "Airbus A330-200",
        departure: "HNL",
        arrival: "SYD",
    },
    FixedFlight {
        flight_number: "HA452",
        airline: "Hawaiian Airlines",
        aircraft: "Airbus A330-200",
        departure: "SYD",
        arrival: "HNL",
    },
    FixedFlight {
        flight_number: "QF3",
        airline: "Qantas",
        aircraft: "Boeing 787-9",
        departure: "SYD",
        arrival: "HNL",
    },
];

const FIXED_DEPARTS_IN_HOURS: i64 = 2;
const FIXED_DURATION_MINUTES: i64 = 10 * 60 + 30;

const RANDOM_AIRLINES: &[&str] = &[
    "American Airlines",
    "United Airlines",
    "Delta Air Lines",
    "British Airways",
    "Lufthansa",
    "Air France",
    "Emirates",
    "Qantas",
    "Singapore Airlines",
    "Hawaiian Airlines",
];

const RANDOM_AIRPORTS: &[&str] = &[
    "JFK", "LAX", "ORD", "ATL", "SFO", "LHR", "CDG", "FRA", "DXB", "SIN", "HND", "SYD",
];

const DELAY_PROBABILITY: f64 = 0.3;

/// Produces a record for a flight no provider could resolve. Never fails.
/// Synthetic flights are always reported as scheduled.
pub fn synthesize(code: &FlightCode, now: DateTime<Utc>) -> FlightRecord {
    match fixed_flight(code) {
        Some(fixed) => fixed_record(fixed, now),
        None => random_record(code, now, &mut rand::thread_rng()),
    }
}

fn fixed_flight(code: &FlightCode) -> Option<&'static FixedFlight> {
    let iata = code.iata_form();
    REGISTRY.iter().find(|fixed| {
        fixed.flight_number == code.compact() || iata.as_deref() == Some(fixed.flight_number)
    })
}

fn fixed_record(fixed: &FixedFlight, now: DateTime<Utc>) -> FlightRecord {
    let departure_time = now + TimeDelta::hours(FIXED_DEPARTS_IN_HOURS);
    let arrival_time = departure_time + TimeDelta::minutes(FIXED_DURATION_MINUTES);

    FlightRecord {
        flight_number: fixed.flight_number.to_string(),
        airline: Some(fixed.airline.to_string()),
        aircraft: Some(fixed.aircraft.to_string()),
        status: FlightStatus::Scheduled,
        departure: FlightEndpoint::scheduled(
            enrichment::airport_name(fixed.departure),
            fixed.departure,
            departure_time,
        ),
        arrival: FlightEndpoint::scheduled(
            enrichment::airport_name(fixed.arrival),
            fixed.arrival,
            arrival_time,
        ),
        live: false,
        source: Source::SyntheticFixed,
    }
}

/// Builds a plausible record for an unknown flight from `rng`.
pub fn random_record<R>(code: &FlightCode, now: DateTime<Utc>, rng: &mut R) -> FlightRecord
where
    R: Rng + ?Sized,
{
    let airline = RANDOM_AIRLINES.choose(rng).copied().map(String::from);
    let mut picks = RANDOM_AIRPORTS.choose_multiple(rng, 2).copied();
    let (from, to) = match (picks.next(), picks.next()) {
        (Some(from), Some(to)) => (from, to),
        _ => (enrichment::DEFAULT_ROUTE.departure, enrichment::DEFAULT_ROUTE.arrival),
    };

    let departure_time = now + TimeDelta::minutes(rng.gen_range(0..=120));
    let arrival_time = departure_time + TimeDelta::minutes(rng.gen_range(120..=300));

    let mut departure =
        FlightEndpoint::scheduled(enrichment::airport_name(from), from, departure_time);
    departure.terminal = Some(rng.gen_range(1..=5).to_string());
    departure.gate = Some(rng.gen_range(1..=30).to_string());
    departure.delay_minutes = Some(if rng.gen_bool(DELAY_PROBABILITY) {
        rng.gen_range(1..=30)
    } else {
        0
    });

    let mut arrival = FlightEndpoint::scheduled(enrichment::airport_name(to), to, arrival_time);
    arrival.terminal = Some(rng.gen_range(1..=5).to_string());
    arrival.gate = Some(rng.gen_range(1..=30).to_string());

    let flight_number = match code.compact() {
        "" => code.as_str(),
        compact => compact,
    };

    FlightRecord {
        flight_number: flight_number.to_string(),
        airline,
        aircraft: None,
        status: FlightStatus::Scheduled,
        departure,
        arrival,
        live: false,
        source: Source::SyntheticRandom,
    }
}
