//! Field-level validation for location records.
//!
//! Each rule is an independent pure function over a [`LocationCandidate`]
//! snapshot; the aggregate [`validate_fields`] runs all of them and collects
//! every violation instead of stopping at the first. The uniqueness rule for
//! `(country_code, country, city)` needs a store lookup and lives in
//! `LocationService::validate`.

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::validation::COUNTRY_CODE_REGEX;

pub const MSG_BLANK: &str = "can't be blank";
pub const MSG_BAD_IP: &str = "is not a valid IP address";
pub const MSG_COUNTRY_CODE: &str = "only allows two letters";
pub const MSG_LATITUDE: &str = "must lie strictly between -90 and +90";
pub const MSG_LONGITUDE: &str = "must lie strictly between -180 and +180";
pub const MSG_TAKEN: &str = "has already been taken";
pub const MSG_NOT_A_NUMBER: &str = "is not a number";

/// A candidate location record before persistence. All fields optional so a
/// partially filled CSV row can still be validated as a whole.
#[derive(Debug, Clone, Default)]
pub struct LocationCandidate {
    pub ip_address: Option<String>,
    pub country_code: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub mystery_value: Option<i64>,
}

impl LocationCandidate {
    /// City counts as present only when non-empty; empty city is exempt from
    /// the uniqueness constraint.
    pub fn has_city(&self) -> bool {
        !is_blank(self.city.as_deref())
    }
}

/// Mapping from field name to the list of violation messages on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldViolations(BTreeMap<String, Vec<String>>);

impl FieldViolations {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn merge(&mut self, other: FieldViolations) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    /// Flatten into "field message" strings for the error envelope.
    pub fn to_messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| format!("{} {}", field, m))
            })
            .collect()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn check_ip_address(candidate: &LocationCandidate, violations: &mut FieldViolations) {
    match candidate.ip_address.as_deref() {
        None => violations.add("ip_address", MSG_BLANK),
        Some(ip) if ip.trim().is_empty() => violations.add("ip_address", MSG_BLANK),
        Some(ip) => {
            if ip.parse::<IpAddr>().is_err() {
                violations.add("ip_address", MSG_BAD_IP);
            }
        }
    }
}

fn check_country(candidate: &LocationCandidate, violations: &mut FieldViolations) {
    if is_blank(candidate.country.as_deref()) {
        violations.add("country", MSG_BLANK);
    }
}

fn check_country_code(candidate: &LocationCandidate, violations: &mut FieldViolations) {
    if let Some(code) = candidate.country_code.as_deref() {
        if !code.trim().is_empty() && !COUNTRY_CODE_REGEX.is_match(code) {
            violations.add("country_code", MSG_COUNTRY_CODE);
        }
    }
}

// Bounds are exclusive: exactly +/-90 is invalid.
fn check_latitude(candidate: &LocationCandidate, violations: &mut FieldViolations) {
    if let Some(latitude) = candidate.latitude {
        if !(latitude > -90.0 && latitude < 90.0) {
            violations.add("latitude", MSG_LATITUDE);
        }
    }
}

// Bounds are exclusive: exactly +/-180 is invalid.
fn check_longitude(candidate: &LocationCandidate, violations: &mut FieldViolations) {
    if let Some(longitude) = candidate.longitude {
        if !(longitude > -180.0 && longitude < 180.0) {
            violations.add("longitude", MSG_LONGITUDE);
        }
    }
}

/// Run every field rule and collect all violations. Does not include the
/// store-backed uniqueness rule.
pub fn validate_fields(candidate: &LocationCandidate) -> FieldViolations {
    let checks: &[fn(&LocationCandidate, &mut FieldViolations)] = &[
        check_ip_address,
        check_country,
        check_country_code,
        check_latitude,
        check_longitude,
    ];

    let mut violations = FieldViolations::default();
    for check in checks {
        check(candidate, &mut violations);
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_candidate() -> LocationCandidate {
        LocationCandidate {
            ip_address: Some("200.106.141.15".to_string()),
            country_code: Some("TL".to_string()),
            country: Some("Saudi Arabia".to_string()),
            city: Some("Gradymouth".to_string()),
            latitude: Some(-49.16675918861615),
            longitude: Some(-86.05920084416894),
            mystery_value: Some(2559997162),
        }
    }

    #[test]
    fn test_valid_location() {
        assert!(validate_fields(&valid_candidate()).is_empty());
    }

    #[test]
    fn test_invalid_with_illegal_ip_address() {
        let mut candidate = valid_candidate();
        candidate.ip_address = Some("illegal_ip_address".to_string());
        let violations = validate_fields(&candidate);
        assert_eq!(
            violations.get("ip_address"),
            Some(&vec![MSG_BAD_IP.to_string()])
        );
    }

    #[test]
    fn test_invalid_with_missing_ip_address() {
        let mut candidate = valid_candidate();
        candidate.ip_address = None;
        let violations = validate_fields(&candidate);
        assert_eq!(
            violations.get("ip_address"),
            Some(&vec![MSG_BLANK.to_string()])
        );
    }

    #[test]
    fn test_valid_with_ipv6_address() {
        let mut candidate = valid_candidate();
        candidate.ip_address = Some("2001:db8::8a2e:370:7334".to_string());
        assert!(validate_fields(&candidate).is_empty());
    }

    #[test]
    fn test_invalid_with_illegal_country_code() {
        let mut candidate = valid_candidate();
        candidate.country_code = Some("#$@!".to_string());
        let violations = validate_fields(&candidate);
        assert_eq!(
            violations.get("country_code"),
            Some(&vec![MSG_COUNTRY_CODE.to_string()])
        );
    }

    #[test]
    fn test_valid_with_missing_country_code() {
        let mut candidate = valid_candidate();
        candidate.country_code = None;
        assert!(validate_fields(&candidate).is_empty());
    }

    #[test]
    fn test_valid_with_lowercase_country_code() {
        let mut candidate = valid_candidate();
        candidate.country_code = Some("nl".to_string());
        assert!(validate_fields(&candidate).is_empty());
    }

    #[test]
    fn test_invalid_with_missing_country() {
        let mut candidate = valid_candidate();
        candidate.country = None;
        let violations = validate_fields(&candidate);
        assert_eq!(
            violations.get("country"),
            Some(&vec![MSG_BLANK.to_string()])
        );
    }

    #[test]
    fn test_invalid_with_empty_country() {
        let mut candidate = valid_candidate();
        candidate.country = Some("".to_string());
        let violations = validate_fields(&candidate);
        assert_eq!(
            violations.get("country"),
            Some(&vec![MSG_BLANK.to_string()])
        );
    }

    #[test]
    fn test_valid_with_missing_city() {
        let mut candidate = valid_candidate();
        candidate.city = None;
        assert!(validate_fields(&candidate).is_empty());
        assert!(!candidate.has_city());
    }

    #[test]
    fn test_latitude_below_range() {
        let mut candidate = valid_candidate();
        candidate.latitude = Some(-91.12345);
        let violations = validate_fields(&candidate);
        assert_eq!(
            violations.get("latitude"),
            Some(&vec![MSG_LATITUDE.to_string()])
        );
    }

    #[test]
    fn test_latitude_above_range() {
        let mut candidate = valid_candidate();
        candidate.latitude = Some(90.12345);
        assert!(!validate_fields(&candidate).is_empty());
    }

    #[test]
    fn test_latitude_boundary_is_invalid() {
        // exclusive bounds: exactly 90 / -90 fail
        for boundary in [90.0, -90.0] {
            let mut candidate = valid_candidate();
            candidate.latitude = Some(boundary);
            let violations = validate_fields(&candidate);
            assert_eq!(
                violations.get("latitude"),
                Some(&vec![MSG_LATITUDE.to_string()]),
                "latitude {} should be invalid",
                boundary
            );
        }
    }

    #[test]
    fn test_latitude_just_inside_bounds() {
        for legal in [89.999999, -89.999999] {
            let mut candidate = valid_candidate();
            candidate.latitude = Some(legal);
            assert!(validate_fields(&candidate).is_empty());
        }
    }

    #[test]
    fn test_valid_with_missing_latitude() {
        let mut candidate = valid_candidate();
        candidate.latitude = None;
        assert!(validate_fields(&candidate).is_empty());
    }

    #[test]
    fn test_longitude_out_of_range() {
        for illegal in [-185.12345, 190.12345, 180.0, -180.0] {
            let mut candidate = valid_candidate();
            candidate.longitude = Some(illegal);
            let violations = validate_fields(&candidate);
            assert_eq!(
                violations.get("longitude"),
                Some(&vec![MSG_LONGITUDE.to_string()]),
                "longitude {} should be invalid",
                illegal
            );
        }
    }

    #[test]
    fn test_valid_with_missing_longitude() {
        let mut candidate = valid_candidate();
        candidate.longitude = None;
        assert!(validate_fields(&candidate).is_empty());
    }

    #[test]
    fn test_valid_with_missing_mystery_value() {
        let mut candidate = valid_candidate();
        candidate.mystery_value = None;
        assert!(validate_fields(&candidate).is_empty());
    }

    #[test]
    fn test_latitude_mutation_adds_only_latitude_violation() {
        // The known-good row with only latitude mutated to 91 must fail on
        // latitude and nothing else.
        let mut candidate = valid_candidate();
        candidate.latitude = Some(91.0);
        let violations = validate_fields(&candidate);
        assert_eq!(
            violations.to_messages(),
            vec![format!("latitude {}", MSG_LATITUDE)]
        );
    }

    #[test]
    fn test_multiple_violations_collected() {
        let candidate = LocationCandidate {
            ip_address: Some("not-an-ip".to_string()),
            country_code: Some("NLD".to_string()),
            country: None,
            city: None,
            latitude: Some(95.0),
            longitude: Some(-200.0),
            mystery_value: None,
        };
        let violations = validate_fields(&candidate);
        assert_eq!(violations.to_messages().len(), 5);
    }
}
