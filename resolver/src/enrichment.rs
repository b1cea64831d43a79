//! Static lookup tables used to fill gaps in partial provider data.
//!
//! The tables are built on first access and never mutated afterwards, so they
//! can be read from any number of concurrent resolutions.
//!
//! Known data defect: the airline source list reuses some codes for more than
//! one carrier (`VA` is listed for both Viasa and Virgin Australia). Codes are
//! inserted in list order and the last entry wins. The list is kept as
//! received rather than guessing which carrier was intended.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Airline {
    pub iata: &'static str,
    pub icao: &'static str,
    pub name: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Airport {
    pub iata: &'static str,
    pub icao: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub country: &'static str,
}

/// A plausible departure/arrival pair, as IATA airport codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub departure: &'static str,
    pub arrival: &'static str,
}

const fn route(departure: &'static str, arrival: &'static str) -> Route {
    Route { departure, arrival }
}

/// Used when neither the airline nor the country has a known route.
pub const DEFAULT_ROUTE: Route = route("JFK", "LAX");

pub const UNKNOWN: &str = "Unknown";

#[rustfmt::skip]
const AIRLINES: &[Airline] = &[
    Airline { iata: "AA", icao: "AAL", name: "American Airlines" },
    Airline { iata: "UA", icao: "UAL", name: "United Airlines" },
    Airline { iata: "DL", icao: "DAL", name: "Delta Air Lines" },
    Airline { iata: "WN", icao: "SWA", name: "Southwest Airlines" },
    Airline { iata: "AS", icao: "ASA", name: "Alaska Airlines" },
    Airline { iata: "B6", icao: "JBU", name: "JetBlue Airways" },
    Airline { iata: "HA", icao: "HAL", name: "Hawaiian Airlines" },
    Airline { iata: "AC", icao: "ACA", name: "Air Canada" },
    Airline { iata: "BA", icao: "BAW", name: "British Airways" },
    Airline { iata: "VS", icao: "VIR", name: "Virgin Atlantic" },
    Airline { iata: "LH", icao: "DLH", name: "Lufthansa" },
    Airline { iata: "AF", icao: "AFR", name: "Air France" },
    Airline { iata: "KL", icao: "KLM", name: "KLM Royal Dutch Airlines" },
    Airline { iata: "EK", icao: "UAE", name: "Emirates" },
    Airline { iata: "QR", icao: "QTR", name: "Qatar Airways" },
    Airline { iata: "EY", icao: "ETD", name: "Etihad Airways" },
    Airline { iata: "TK", icao: "THY", name: "Turkish Airlines" },
    Airline { iata: "SQ", icao: "SIA", name: "Singapore Airlines" },
    Airline { iata: "CX", icao: "CPA", name: "Cathay Pacific" },
    Airline { iata: "QF", icao: "QFA", name: "Qantas" },
    Airline { iata: "VA", icao: "VIA", name: "Viasa" },
    Airline { iata: "VA", icao: "VOZ", name: "Virgin Australia" },
    Airline { iata: "NZ", icao: "ANZ", name: "Air New Zealand" },
    Airline { iata: "JL", icao: "JAL", name: "Japan Airlines" },
    Airline { iata: "NH", icao: "ANA", name: "All Nippon Airways" },
    Airline { iata: "KE", icao: "KAL", name: "Korean Air" },
    Airline { iata: "AI", icao: "AIC", name: "Air India" },
    Airline { iata: "FR", icao: "RYR", name: "Ryanair" },
    Airline { iata: "U2", icao: "EZY", name: "easyJet" },
    Airline { iata: "IB", icao: "IBE", name: "Iberia" },
    Airline { iata: "LX", icao: "SWR", name: "Swiss International Air Lines" },
    Airline { iata: "EI", icao: "EIN", name: "Aer Lingus" },
    Airline { iata: "DY", icao: "NOZ", name: "Norwegian Air Shuttle" },
];

#[rustfmt::skip]
const AIRPORTS: &[Airport] = &[
    Airport { iata: "JFK", icao: "KJFK", name: "John F. Kennedy International Airport", city: "New York", country: "United States" },
    Airport { iata: "LAX", icao: "KLAX", name: "Los Angeles International Airport", city: "Los Angeles", country: "United States" },
    Airport { iata: "ORD", icao: "KORD", name: "O'Hare International Airport", city: "Chicago", country: "United States" },
    Airport { iata: "ATL", icao: "KATL", name: "Hartsfield-Jackson Atlanta International Airport", city: "Atlanta", country: "United States" },
    Airport { iata: "DFW", icao: "KDFW", name: "Dallas/Fort Worth International Airport", city: "Dallas", country: "United States" },
    Airport { iata: "DEN", icao: "KDEN", name: "Denver International Airport", city: "Denver", country: "United States" },
    Airport { iata: "SFO", icao: "KSFO", name: "San Francisco International Airport", city: "San Francisco", country: "United States" },
    Airport { iata: "SEA", icao: "KSEA", name: "Seattle-Tacoma International Airport", city: "Seattle", country: "United States" },
    Airport { iata: "BOS", icao: "KBOS", name: "Logan International Airport", city: "Boston", country: "United States" },
    Airport { iata: "HNL", icao: "PHNL", name: "Daniel K. Inouye International Airport", city: "Honolulu", country: "United States" },
    Airport { iata: "YYZ", icao: "CYYZ", name: "Toronto Pearson International Airport", city: "Toronto", country: "Canada" },
    Airport { iata: "YVR", icao: "CYVR", name: "Vancouver International Airport", city: "Vancouver", country: "Canada" },
    Airport { iata: "LHR", icao: "EGLL", name: "Heathrow Airport", city: "London", country: "United Kingdom" },
    Airport { iata: "LGW", icao: "EGKK", name: "Gatwick Airport", city: "London", country: "United Kingdom" },
    Airport { iata: "STN", icao: "EGSS", name: "London Stansted Airport", city: "London", country: "United Kingdom" },
    Airport { iata: "DUB", icao: "EIDW", name: "Dublin Airport", city: "Dublin", country: "Ireland" },
    Airport { iata: "CDG", icao: "LFPG", name: "Charles de Gaulle Airport", city: "Paris", country: "France" },
    Airport { iata: "FRA", icao: "EDDF", name: "Frankfurt Airport", city: "Frankfurt", country: "Germany" },
    Airport { iata: "MUC", icao: "EDDM", name: "Munich Airport", city: "Munich", country: "Germany" },
    Airport { iata: "AMS", icao: "EHAM", name: "Amsterdam Airport Schiphol", city: "Amsterdam", country: "Netherlands" },
    Airport { iata: "MAD", icao: "LEMD", name: "Adolfo Suarez Madrid-Barajas Airport", city: "Madrid", country: "Spain" },
    Airport { iata: "FCO", icao: "LIRF", name: "Leonardo da Vinci-Fiumicino Airport", city: "Rome", country: "Italy" },
    Airport { iata: "ZRH", icao: "LSZH", name: "Zurich Airport", city: "Zurich", country: "Switzerland" },
    Airport { iata: "OSL", icao: "ENGM", name: "Oslo Airport Gardermoen", city: "Oslo", country: "Norway" },
    Airport { iata: "IST", icao: "LTFM", name: "Istanbul Airport", city: "Istanbul", country: "Turkey" },
    Airport { iata: "DXB", icao: "OMDB", name: "Dubai International Airport", city: "Dubai", country: "United Arab Emirates" },
    Airport { iata: "AUH", icao: "OMAA", name: "Zayed International Airport", city: "Abu Dhabi", country: "United Arab Emirates" },
    Airport { iata: "DOH", icao: "OTHH", name: "Hamad International Airport", city: "Doha", country: "Qatar" },
    Airport { iata: "DEL", icao: "VIDP", name: "Indira Gandhi International Airport", city: "Delhi", country: "India" },
    Airport { iata: "SIN", icao: "WSSS", name: "Singapore Changi Airport", city: "Singapore", country: "Singapore" },
    Airport { iata: "HKG", icao: "VHHH", name: "Hong Kong International Airport", city: "Hong Kong", country: "Hong Kong" },
    Airport { iata: "NRT", icao: "RJAA", name: "Narita International Airport", city: "Tokyo", country: "Japan" },
    Airport { iata: "HND", icao: "RJTT", name: "Haneda Airport", city: "Tokyo", country: "Japan" },
    Airport { iata: "ICN", icao: "RKSI", name: "Incheon International Airport", city: "Seoul", country: "South Korea" },
    Airport { iata: "SYD", icao: "YSSY", name: "Sydney Kingsford Smith Airport", city: "Sydney", country: "Australia" },
    Airport { iata: "MEL", icao: "YMML", name: "Melbourne Airport", city: "Melbourne", country: "Australia" },
    Airport { iata: "AKL", icao: "NZAA", name: "Auckland Airport", city: "Auckland", country: "New Zealand" },
];

// Keyed by ICAO airline code, which is the prefix of live callsigns.
const AIRLINE_ROUTES: &[(&str, Route)] = &[
    ("AAL", route("DFW", "JFK")),
    ("UAL", route("SFO", "ORD")),
    ("DAL", route("ATL", "JFK")),
    ("SWA", route("DEN", "LAX")),
    ("ASA", route("SEA", "LAX")),
    ("JBU", route("JFK", "BOS")),
    ("HAL", route("HNL", "LAX")),
    ("ACA", route("YYZ", "YVR")),
    ("BAW", route("LHR", "JFK")),
    ("VIR", route("LHR", "JFK")),
    ("DLH", route("FRA", "JFK")),
    ("AFR", route("CDG", "JFK")),
    ("KLM", route("AMS", "JFK")),
    ("UAE", route("DXB", "LHR")),
    ("QTR", route("DOH", "LHR")),
    ("ETD", route("AUH", "LHR")),
    ("THY", route("IST", "FRA")),
    ("SIA", route("SIN", "SYD")),
    ("CPA", route("HKG", "SIN")),
    ("QFA", route("SYD", "MEL")),
    ("VOZ", route("SYD", "MEL")),
    ("ANZ", route("AKL", "SYD")),
    ("JAL", route("HND", "HNL")),
    ("ANA", route("HND", "LAX")),
    ("KAL", route("ICN", "LAX")),
    ("AIC", route("DEL", "LHR")),
    ("RYR", route("STN", "DUB")),
    ("EZY", route("LGW", "CDG")),
    ("IBE", route("MAD", "JFK")),
    ("SWR", route("ZRH", "JFK")),
    ("EIN", route("DUB", "LHR")),
    ("NOZ", route("OSL", "LGW")),
];

// Keyed by the origin country reported with live state vectors.
const COUNTRY_ROUTES: &[(&str, Route)] = &[
    ("United States", route("JFK", "LAX")),
    ("Canada", route("YYZ", "YVR")),
    ("United Kingdom", route("LHR", "JFK")),
    ("Ireland", route("DUB", "LHR")),
    ("France", route("CDG", "JFK")),
    ("Germany", route("FRA", "JFK")),
    ("Kingdom of the Netherlands", route("AMS", "LHR")),
    ("Spain", route("MAD", "CDG")),
    ("Italy", route("FCO", "CDG")),
    ("Switzerland", route("ZRH", "LHR")),
    ("Norway", route("OSL", "LHR")),
    ("Turkey", route("IST", "FRA")),
    ("United Arab Emirates", route("DXB", "LHR")),
    ("Qatar", route("DOH", "LHR")),
    ("India", route("DEL", "DXB")),
    ("Singapore", route("SIN", "SYD")),
    ("Japan", route("HND", "HNL")),
    ("Republic of Korea", route("ICN", "LAX")),
    ("Australia", route("SYD", "MEL")),
    ("New Zealand", route("AKL", "SYD")),
];

struct Tables {
    airline_names: HashMap<&'static str, &'static str>,
    iata_to_icao: HashMap<&'static str, &'static str>,
    icao_to_iata: HashMap<&'static str, &'static str>,
    airports: HashMap<&'static str, &'static Airport>,
    airline_routes: HashMap<&'static str, Route>,
    country_routes: HashMap<&'static str, Route>,
}

impl Tables {
    fn build() -> Self {
        let mut airline_names = HashMap::new();
        let mut iata_to_icao = HashMap::new();
        let mut icao_to_iata = HashMap::new();
        // Plain inserts: a later entry for the same code replaces the earlier one.
        for airline in AIRLINES {
            airline_names.insert(airline.iata, airline.name);
            airline_names.insert(airline.icao, airline.name);
            iata_to_icao.insert(airline.iata, airline.icao);
            icao_to_iata.insert(airline.icao, airline.iata);
        }

        let mut airports = HashMap::new();
        for airport in AIRPORTS {
            airports.insert(airport.iata, airport);
            airports.insert(airport.icao, airport);
        }

        Tables {
            airline_names,
            iata_to_icao,
            icao_to_iata,
            airports,
            airline_routes: AIRLINE_ROUTES.iter().copied().collect(),
            country_routes: COUNTRY_ROUTES.iter().copied().collect(),
        }
    }
}

static TABLES: LazyLock<Tables> = LazyLock::new(Tables::build);

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Airline name for a 2-letter IATA or 3-letter ICAO code.
pub fn airline_name(code: &str) -> Option<&'static str> {
    TABLES.airline_names.get(normalize(code).as_str()).copied()
}

pub fn airline_icao(iata: &str) -> Option<&'static str> {
    TABLES.iata_to_icao.get(normalize(iata).as_str()).copied()
}

pub fn airline_iata(icao: &str) -> Option<&'static str> {
    TABLES.icao_to_iata.get(normalize(icao).as_str()).copied()
}

/// Airport entry for an IATA or ICAO code.
pub fn airport(code: &str) -> Option<&'static Airport> {
    TABLES.airports.get(normalize(code).as_str()).copied()
}

/// Airport name for a code, or the `"<code> Airport"` placeholder.
pub fn airport_name(code: &str) -> String {
    match airport(code) {
        Some(airport) => airport.name.to_string(),
        None => placeholder_name(code),
    }
}

fn placeholder_name(code: &str) -> String {
    format!("{} Airport", normalize(code))
}

/// Picks a plausible route for a flight that carries no route data, trying the
/// airline first, then the country, then the global default.
pub fn plausible_route(airline_icao: Option<&str>, country: Option<&str>) -> Route {
    airline_icao
        .and_then(|code| TABLES.airline_routes.get(normalize(code).as_str()))
        .or_else(|| country.and_then(|c| TABLES.country_routes.get(c.trim())))
        .copied()
        .unwrap_or(DEFAULT_ROUTE)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AirportInfo {
    pub name: String,
    pub city: String,
    pub country: String,
}

/// Looks up an airport by IATA or ICAO code. Never fails: unknown codes get a
/// placeholder name with unknown city and country.
pub fn resolve_airport(code: &str) -> AirportInfo {
    match airport(code) {
        Some(airport) => AirportInfo {
            name: airport.name.to_string(),
            city: airport.city.to_string(),
            country: airport.country.to_string(),
        },
        None => AirportInfo {
            name: placeholder_name(code),
            city: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_airline_lookup_by_either_code() {
        assert_eq!(airline_name("BA"), Some("British Airways"));
        assert_eq!(airline_name("baw"), Some("British Airways"));
        assert_eq!(airline_name("ZZ"), None);
        assert_eq!(airline_icao("ua"), Some("UAL"));
        assert_eq!(airline_iata("QFA"), Some("QF"));
    }

    #[test]
    fn test_colliding_code_keeps_last_entry() {
        assert_eq!(airline_name("VA"), Some("Virgin Australia"));
        assert_eq!(airline_icao("VA"), Some("VOZ"));
        // The earlier carrier is still reachable through its own ICAO code.
        assert_eq!(airline_name("VIA"), Some("Viasa"));
    }

    #[test]
    fn test_resolve_known_airport() {
        let info = resolve_airport("hnl");
        assert_eq!(
            info,
            AirportInfo {
                name: "Daniel K. Inouye International Airport".into(),
                city: "Honolulu".into(),
                country: "United States".into(),
            }
        );
        assert_eq!(resolve_airport("YSSY").city, "Sydney");
    }

    #[test]
    fn test_resolve_unknown_airport() {
        let info = resolve_airport("xyz");
        assert_eq!(info.name, "XYZ Airport");
        assert_eq!(info.city, UNKNOWN);
        assert_eq!(info.country, UNKNOWN);
        assert_eq!(airport_name("QQQ"), "QQQ Airport");
    }

    #[test]
    fn test_plausible_route() {
        assert_eq!(plausible_route(Some("BAW"), Some("Germany")), route("LHR", "JFK"));
        assert_eq!(plausible_route(Some("XXX"), Some("Germany")), route("FRA", "JFK"));
        assert_eq!(plausible_route(None, Some("Atlantis")), DEFAULT_ROUTE);
        assert_eq!(plausible_route(None, None), DEFAULT_ROUTE);
    }

    #[test]
    fn test_route_airports_are_in_table() {
        let routes = AIRLINE_ROUTES
            .iter()
            .chain(COUNTRY_ROUTES)
            .map(|(_, r)| *r)
            .chain([DEFAULT_ROUTE]);
        for r in routes {
            assert!(airport(r.departure).is_some(), "missing {}", r.departure);
            assert!(airport(r.arrival).is_some(), "missing {}", r.arrival);
        }
    }
}
