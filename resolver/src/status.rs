//! Flight phase inference from timestamps.
//!
//! Recorded (actual) times take precedence over scheduled ones. A flight that is
//! past its scheduled arrival with nothing recorded to the contrary is treated as
//! landed.

use crate::types::FlightStatus;
use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightTimes {
    pub scheduled_departure: DateTime<Utc>,
    pub actual_departure: Option<DateTime<Utc>>,
    pub scheduled_arrival: DateTime<Utc>,
    pub actual_arrival: Option<DateTime<Utc>>,
}

/// Computes the flight phase at `now`. The first matching rule wins.
pub fn infer_status(times: &FlightTimes, now: DateTime<Utc>) -> FlightStatus {
    if let Some(arrived) = times.actual_arrival
        && now > arrived
    {
        return FlightStatus::Landed;
    }

    if let Some(departed) = times.actual_departure
        && now > departed
    {
        let before_arrival = match times.actual_arrival {
            Some(arrived) => now < arrived,
            None => now < times.scheduled_arrival,
        };
        return if before_arrival {
            FlightStatus::InFlight
        } else {
            FlightStatus::Landed
        };
    }

    if now > times.scheduled_arrival {
        FlightStatus::Landed
    } else if now > times.scheduled_departure {
        FlightStatus::InFlight
    } else {
        FlightStatus::Scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn scheduled(departure: Duration, arrival: Duration) -> FlightTimes {
        FlightTimes {
            scheduled_departure: now() + departure,
            actual_departure: None,
            scheduled_arrival: now() + arrival,
            actual_arrival: None,
        }
    }

    #[test]
    fn test_between_scheduled_times_is_in_flight() {
        let times = scheduled(Duration::hours(-1), Duration::hours(1));
        assert_eq!(infer_status(&times, now()), FlightStatus::InFlight);
    }

    #[test]
    fn test_actual_arrival_in_past_is_landed() {
        // Scheduled times say the flight has not even left yet.
        let mut times = scheduled(Duration::hours(2), Duration::hours(5));
        times.actual_arrival = Some(now() - Duration::minutes(10));
        assert_eq!(infer_status(&times, now()), FlightStatus::Landed);
    }

    #[test]
    fn test_future_departure_is_scheduled() {
        let times = scheduled(Duration::hours(1), Duration::hours(3));
        assert_eq!(infer_status(&times, now()), FlightStatus::Scheduled);
    }

    #[test]
    fn test_past_scheduled_arrival_is_landed() {
        let times = scheduled(Duration::hours(-4), Duration::hours(-1));
        assert_eq!(infer_status(&times, now()), FlightStatus::Landed);
    }

    #[test]
    fn test_actual_departure_rules() {
        // Departed late, still before the scheduled arrival.
        let mut times = scheduled(Duration::hours(-3), Duration::hours(1));
        times.actual_departure = Some(now() - Duration::hours(2));
        assert_eq!(infer_status(&times, now()), FlightStatus::InFlight);

        // Departed, scheduled arrival has passed, nothing recorded on arrival.
        let mut times = scheduled(Duration::hours(-3), Duration::minutes(-5));
        times.actual_departure = Some(now() - Duration::hours(3));
        assert_eq!(infer_status(&times, now()), FlightStatus::Landed);

        // Departed, running late against a recorded arrival still ahead.
        let mut times = scheduled(Duration::hours(-3), Duration::minutes(-5));
        times.actual_departure = Some(now() - Duration::hours(2));
        times.actual_arrival = Some(now() + Duration::minutes(20));
        assert_eq!(infer_status(&times, now()), FlightStatus::InFlight);
    }

    #[test]
    fn test_actual_departure_in_future_falls_back_to_schedule() {
        let mut times = scheduled(Duration::hours(-1), Duration::hours(2));
        times.actual_departure = Some(now() + Duration::minutes(30));
        assert_eq!(infer_status(&times, now()), FlightStatus::InFlight);
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        let times = scheduled(Duration::zero(), Duration::hours(2));
        assert_eq!(infer_status(&times, now()), FlightStatus::Scheduled);

        let times = scheduled(Duration::hours(-2), Duration::zero());
        assert_eq!(infer_status(&times, now()), FlightStatus::InFlight);
    }
}
