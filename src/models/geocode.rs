//! Reverse geocoding and country metadata payloads

use serde::{Deserialize, Serialize};

/// Subset of a Nominatim `/reverse` response
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ReverseGeocodeResult {
    #[serde(default)]
    pub address: Option<Address>,
}

/// Address details returned with `addressdetails=1`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Address {
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2, lower case as Nominatim returns it
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub county: Option<String>,
    pub municipality: Option<String>,
}

impl ReverseGeocodeResult {
    /// Upper-cased country code, if the address carries a non-empty one
    #[must_use]
    pub fn country_code(&self) -> Option<String> {
        self.address
            .as_ref()
            .and_then(|address| address.country_code.as_deref())
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_uppercase)
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.address.as_ref().and_then(|address| address.country.as_deref())
    }

    /// First available administrative area: state, region, county, municipality
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        let address = self.address.as_ref()?;
        address
            .state
            .as_deref()
            .or(address.region.as_deref())
            .or(address.county.as_deref())
            .or(address.municipality.as_deref())
    }
}

/// Subset of a REST Countries `/alpha/{code}` entry
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CountryInfo {
    /// Continent-level region, e.g. "Europe" or "Americas"
    pub region: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nominatim_payload() {
        let json = r#"{
            "place_id": 1234,
            "display_name": "Bern, Bern-Mittelland, Bern, Switzerland",
            "address": {
                "city": "Bern",
                "county": "Bern-Mittelland",
                "state": "Bern",
                "country": "Switzerland",
                "country_code": "ch"
            }
        }"#;
        let result: ReverseGeocodeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.country(), Some("Switzerland"));
        assert_eq!(result.country_code().as_deref(), Some("CH"));
        assert_eq!(result.region(), Some("Bern"));
    }

    #[test]
    fn test_region_fallback_order() {
        let mut address = Address {
            county: Some("Cork".to_string()),
            municipality: Some("Kinsale".to_string()),
            ..Address::default()
        };
        let result = ReverseGeocodeResult {
            address: Some(address.clone()),
        };
        assert_eq!(result.region(), Some("Cork"));

        address.county = None;
        let result = ReverseGeocodeResult {
            address: Some(address),
        };
        assert_eq!(result.region(), Some("Kinsale"));
    }

    #[test]
    fn test_missing_address() {
        let result: ReverseGeocodeResult =
            serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
        assert!(result.country().is_none());
        assert!(result.country_code().is_none());
        assert!(result.region().is_none());
    }
}
