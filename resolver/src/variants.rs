//! Flight identifiers and the alternate forms they are searched under.
//!
//! Providers disagree on how a flight is written: `BA117`, `BAW117`, `BA 0117`
//! and `airline_iata=BA&flight_number=117` can all name the same flight.
//! [`FlightCode::attempts`] yields those forms lazily and in priority order;
//! calling it again restarts the sequence.

use crate::enrichment;
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum IdentifierError {
    #[error("flight identifier is empty")]
    Empty,
}

/// A validated, non-blank flight identifier.
///
/// An identifier with no letters or digits (`"--"`) is still valid. It has an
/// empty compact form, no carrier and no query attempts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlightCode {
    raw: String,
    compact: String,
    carrier: Option<String>,
    number: Option<String>,
}

impl FlightCode {
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let raw = input.trim().to_ascii_uppercase();
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let compact: String = raw.chars().filter(|c| c.is_ascii_alphanumeric()).collect();

        let (carrier, number) = match split_carrier(&compact) {
            Some((carrier, number)) => (Some(carrier.to_string()), Some(number.to_string())),
            None => (None, None),
        };

        Ok(FlightCode {
            raw,
            compact,
            carrier,
            number,
        })
    }

    /// The identifier as given, trimmed and uppercased.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The identifier with everything but letters and digits removed.
    pub fn compact(&self) -> &str {
        &self.compact
    }

    /// 2-character IATA or 3-letter ICAO carrier code, when the identifier has one.
    pub fn carrier(&self) -> Option<&str> {
        self.carrier.as_deref()
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    /// The identifier with an ICAO carrier code, e.g. `UAL123` for `UA123`.
    pub fn icao_form(&self) -> Option<String> {
        let carrier = self.carrier()?;
        let number = self.number()?;
        if carrier.len() == 3 {
            return Some(self.compact.clone());
        }
        enrichment::airline_icao(carrier).map(|icao| format!("{icao}{number}"))
    }

    /// The identifier with an IATA carrier code and no leading zeros, e.g.
    /// `BA117` for `BAW0117`.
    pub fn iata_form(&self) -> Option<String> {
        let carrier = self.carrier()?;
        let number = trim_number(self.number()?);
        if carrier.len() == 2 {
            return Some(format!("{carrier}{number}"));
        }
        enrichment::airline_iata(carrier).map(|iata| format!("{iata}{number}"))
    }

    pub fn attempts(&self) -> QueryAttempts<'_> {
        QueryAttempts {
            code: self,
            next: Some(VariantKind::Exact),
            seen: Vec::new(),
        }
    }

    fn attempt(&self, kind: VariantKind) -> Option<QueryAttempt> {
        let params = match kind {
            VariantKind::Exact => {
                if self.compact.is_empty() {
                    return None;
                }
                let param = if self.carrier().is_some_and(|c| c.len() == 3) {
                    "flight_icao"
                } else {
                    "flight_iata"
                };
                vec![(param, self.compact.clone())]
            }
            VariantKind::Icao => vec![("flight_icao", self.icao_form()?)],
            VariantKind::Iata => vec![("flight_iata", self.iata_form()?)],
            VariantKind::Split => {
                let carrier = self.carrier()?;
                let param = if carrier.len() == 3 {
                    "airline_icao"
                } else {
                    "airline_iata"
                };
                vec![
                    (param, carrier.to_string()),
                    ("flight_number", trim_number(self.number()?).to_string()),
                ]
            }
        };
        Some(QueryAttempt { kind, params })
    }
}

impl FromStr for FlightCode {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlightCode::parse(s)
    }
}

impl fmt::Display for FlightCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// Splits `UAL123` into (`UAL`, `123`) and `U2123` into (`U2`, `123`).
fn split_carrier(compact: &str) -> Option<(&str, &str)> {
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    if compact.len() >= 4 {
        let (carrier, number) = compact.split_at(3);
        if carrier.bytes().all(|b| b.is_ascii_alphabetic()) && all_digits(number) {
            return Some((carrier, number));
        }
    }

    if compact.len() >= 3 {
        let (carrier, number) = compact.split_at(2);
        if carrier.bytes().any(|b| b.is_ascii_alphabetic()) && all_digits(number) {
            return Some((carrier, number));
        }
    }

    None
}

fn trim_number(number: &str) -> &str {
    let trimmed = number.trim_start_matches('0');
    if trimmed.is_empty() { "0" } else { trimmed }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariantKind {
    Exact,
    Icao,
    Iata,
    Split,
}

impl VariantKind {
    fn following(self) -> Option<VariantKind> {
        match self {
            VariantKind::Exact => Some(VariantKind::Icao),
            VariantKind::Icao => Some(VariantKind::Iata),
            VariantKind::Iata => Some(VariantKind::Split),
            VariantKind::Split => None,
        }
    }
}

/// One identifier variant, as the query parameters a provider is called with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryAttempt {
    pub kind: VariantKind,
    pub params: Vec<(&'static str, String)>,
}

/// Lazy sequence of distinct query attempts for one identifier.
pub struct QueryAttempts<'a> {
    code: &'a FlightCode,
    next: Option<VariantKind>,
    seen: Vec<Vec<(&'static str, String)>>,
}

impl Iterator for QueryAttempts<'_> {
    type Item = QueryAttempt;

    fn next(&mut self) -> Option<QueryAttempt> {
        loop {
            let kind = self.next?;
            self.next = kind.following();

            let Some(attempt) = self.code.attempt(kind) else {
                continue;
            };
            if self.seen.contains(&attempt.params) {
                continue;
            }
            self.seen.push(attempt.params.clone());
            return Some(attempt);
        }
    }
}
