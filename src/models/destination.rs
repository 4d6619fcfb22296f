use serde::{Deserialize, Serialize};

/// A travel destination from the catalog file
///
/// `name`, `iata` and `categories` are required; any other fields in the
/// source document are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Destination {
    pub name: String,
    /// IATA airport code, e.g. "HND"
    pub iata: String,
    /// Descriptive tags such as "beach" or "city life"
    pub categories: Vec<String>,
}

impl Destination {
    pub fn new<S: Into<String>>(name: S, iata: S, categories: &[&str]) -> Self {
        Self {
            name: name.into(),
            iata: iata.into(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// A destination ranked against a preference set
///
/// `categories` holds only the tags that matched, in the destination's
/// original order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub name: String,
    pub iata: String,
    pub categories: Vec<String>,
}

impl Recommendation {
    /// Number of matched categories
    pub fn match_score(&self) -> usize {
        self.categories.len()
    }
}

/// Public shape returned by the recommendation endpoint
///
/// Kept apart from [`Recommendation`] on purpose: this is the wire contract
/// the frontend depends on, and the scorer's type may grow fields (scores,
/// debug data) that must not leak into responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationResponse {
    pub name: String,
    pub iata: String,
    pub categories: Vec<String>,
}

impl From<Recommendation> for RecommendationResponse {
    fn from(recommendation: Recommendation) -> Self {
        Self {
            name: recommendation.name,
            iata: recommendation.iata,
            categories: recommendation.categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_ignores_extra_fields() {
        let json = r#"{
            "name": "Lisbon",
            "iata": "LIS",
            "categories": ["city life", "seafood"],
            "entityId": "27544072",
            "type": "PLACE_TYPE_CITY"
        }"#;

        let destination: Destination = serde_json::from_str(json).unwrap();
        assert_eq!(
            destination,
            Destination::new("Lisbon", "LIS", &["city life", "seafood"])
        );
    }

    #[test]
    fn test_destination_requires_categories() {
        let json = r#"{"name": "Lisbon", "iata": "LIS"}"#;
        let result = serde_json::from_str::<Destination>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_destination_rejects_non_array_categories() {
        let json = r#"{"name": "Lisbon", "iata": "LIS", "categories": "beach"}"#;
        let result = serde_json::from_str::<Destination>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_response_hides_score() {
        let recommendation = Recommendation {
            name: "Bali".to_string(),
            iata: "DPS".to_string(),
            categories: vec!["beach".to_string(), "relaxing/spa".to_string()],
        };
        assert_eq!(recommendation.match_score(), 2);

        let value = serde_json::to_value(RecommendationResponse::from(recommendation)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Bali",
                "iata": "DPS",
                "categories": ["beach", "relaxing/spa"]
            })
        );
    }
}
