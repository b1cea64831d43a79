use chrono::{DateTime, Utc};
use serde::Serialize;

/// Phase of a flight. Serialized as `scheduled`, `in-flight` or `landed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightStatus {
    Scheduled,
    InFlight,
    Landed,
}

impl FlightStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::InFlight => "in-flight",
            FlightStatus::Landed => "landed",
        }
    }
}

/// Where the data in a record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Source {
    #[serde(rename = "aviationstack")]
    Schedule,
    #[serde(rename = "opensky")]
    Live,
    #[serde(rename = "hybrid")]
    Hybrid,
    #[serde(rename = "synthetic-fixed")]
    SyntheticFixed,
    #[serde(rename = "synthetic-random")]
    SyntheticRandom,
}

impl Source {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Source::Schedule => "aviationstack",
            Source::Live => "opensky",
            Source::Hybrid => "hybrid",
            Source::SyntheticFixed => "synthetic-fixed",
            Source::SyntheticRandom => "synthetic-random",
        }
    }

    pub const fn is_synthetic(&self) -> bool {
        matches!(self, Source::SyntheticFixed | Source::SyntheticRandom)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    pub airport: String,
    pub iata_code: String,
    pub scheduled_time: DateTime<Utc>,
    pub actual_time: Option<DateTime<Utc>>,
    pub terminal: Option<String>,
    pub gate: Option<String>,
    pub delay_minutes: Option<u32>,
}

impl FlightEndpoint {
    /// An endpoint with only the airport and schedule known.
    pub fn scheduled<A, C>(airport: A, iata_code: C, scheduled_time: DateTime<Utc>) -> Self
    where
        A: Into<String>,
        C: Into<String>,
    {
        FlightEndpoint {
            airport: airport.into(),
            iata_code: iata_code.into(),
            scheduled_time,
            actual_time: None,
            terminal: None,
            gate: None,
            delay_minutes: None,
        }
    }
}

/// The single normalized shape every provider result is adapted into.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub flight_number: String,
    pub airline: Option<String>,
    pub aircraft: Option<String>,
    pub status: FlightStatus,
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    /// True only when the status was reported by a live-position provider.
    pub live: bool,
    pub source: Source,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_serialization() {
        let departure_time = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let arrival_time = Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0).unwrap();

        let mut departure = FlightEndpoint::scheduled("Heathrow", "LHR", departure_time);
        departure.delay_minutes = Some(5);

        let record = FlightRecord {
            flight_number: "BA117".into(),
            airline: Some("British Airways".into()),
            aircraft: None,
            status: FlightStatus::InFlight,
            departure,
            arrival: FlightEndpoint::scheduled("JFK International", "JFK", arrival_time),
            live: false,
            source: Source::Schedule,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["flightNumber"], "BA117");
        assert_eq!(json["status"], "in-flight");
        assert_eq!(json["source"], "aviationstack");
        assert_eq!(json["aircraft"], serde_json::Value::Null);
        assert_eq!(json["departure"]["iataCode"], "LHR");
        assert_eq!(json["departure"]["delayMinutes"], 5);
        assert_eq!(json["departure"]["scheduledTime"], "2025-03-01T10:00:00Z");
        // Endpoints keep every key even when values are unknown.
        assert_eq!(json["arrival"]["gate"], serde_json::Value::Null);
        assert_eq!(json["arrival"]["actualTime"], serde_json::Value::Null);
    }

    #[test]
    fn test_tags_match_serialized_form() {
        for source in [
            Source::Schedule,
            Source::Live,
            Source::Hybrid,
            Source::SyntheticFixed,
            Source::SyntheticRandom,
        ] {
            let json = serde_json::to_value(source).unwrap();
            assert_eq!(json, source.as_str());
        }
        for status in [
            FlightStatus::Scheduled,
            FlightStatus::InFlight,
            FlightStatus::Landed,
        ] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
    }
}
