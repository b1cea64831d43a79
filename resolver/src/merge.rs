//! Field-level merge of a live observation onto a schedule record.

use crate::types::{FlightRecord, Source};

/// Takes the route, times and gate data from `schedule` and only the
/// real-time phase from `live`.
pub fn overlay_live(schedule: FlightRecord, live: &FlightRecord) -> FlightRecord {
    FlightRecord {
        flight_number: schedule.flight_number,
        airline: schedule.airline,
        aircraft: schedule.aircraft,
        departure: schedule.departure,
        arrival: schedule.arrival,
        status: live.status,
        live: live.live,
        source: Source::Hybrid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::sample_record;
    use crate::types::FlightStatus;

    #[test]
    fn test_overlay_keeps_schedule_fields() {
        let mut schedule = sample_record("BA117", Source::Schedule);
        schedule.departure.gate = Some("B32".into());
        schedule.aircraft = Some("G-XWBA".into());

        let mut live = sample_record("BAW117", Source::Live);
        live.status = FlightStatus::InFlight;
        live.live = true;
        live.departure.iata_code = "JFK".into();
        live.arrival.iata_code = "LAX".into();

        let merged = overlay_live(schedule.clone(), &live);

        assert_eq!(merged.status, FlightStatus::InFlight);
        assert!(merged.live);
        assert_eq!(merged.source, Source::Hybrid);
        assert_eq!(merged.flight_number, "BA117");
        assert_eq!(merged.aircraft, schedule.aircraft);
        assert_eq!(merged.departure, schedule.departure);
        assert_eq!(merged.arrival, schedule.arrival);
    }

    #[test]
    fn test_overlay_ignores_live_descriptive_fields() {
        let mut schedule = sample_record("QF1", Source::Schedule);
        schedule.airline = None;
        schedule.aircraft = None;
        schedule.arrival.gate = None;

        let mut live = sample_record("QFA1", Source::Live);
        live.airline = Some("Qantas".into());
        live.aircraft = Some("VH-ZNA".into());
        live.arrival.gate = Some("7".into());
        live.status = FlightStatus::Landed;
        live.live = true;

        let merged = overlay_live(schedule.clone(), &live);

        assert_eq!(merged.flight_number, "QF1");
        assert_eq!(merged.airline, None);
        assert_eq!(merged.aircraft, None);
        assert_eq!(merged.arrival.gate, None);
        assert_eq!(merged.departure, schedule.departure);
        assert_eq!(merged.status, FlightStatus::Landed);
        assert_eq!(merged.source, Source::Hybrid);
    }
}
