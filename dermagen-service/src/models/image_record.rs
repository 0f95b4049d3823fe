use super::DiseaseClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated image awaiting insertion; `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImageRecord {
    pub class: DiseaseClass,
    /// Relative path, URL or self-contained data URI.
    pub path: String,
}

impl NewImageRecord {
    pub fn new(class: DiseaseClass, path: impl Into<String>) -> Self {
        Self {
            class,
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub class: DiseaseClass,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

/// Query filter as received from the client.
///
/// The class is kept raw: a value that is not a known disease code is
/// treated as no filter at all rather than as an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageFilter {
    pub class: Option<String>,
}

impl ImageFilter {
    pub fn by_class(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
        }
    }

    /// The class restriction that actually applies, if any.
    pub fn effective_class(&self) -> Option<DiseaseClass> {
        self.class.as_deref().and_then(|c| c.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_codes_restrict() {
        assert_eq!(
            ImageFilter::by_class("BCC").effective_class(),
            Some(DiseaseClass::Bcc)
        );
        assert_eq!(ImageFilter::by_class("nope").effective_class(), None);
        assert_eq!(ImageFilter::default().effective_class(), None);
    }

    #[test]
    fn record_serializes_with_snake_case_timestamp() {
        let record = ImageRecord {
            class: DiseaseClass::Nv,
            path: "data:image/png;base64,AAA".to_string(),
            created_at: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["class"], "NV");
        assert_eq!(json["path"], "data:image/png;base64,AAA");
        assert_eq!(json["created_at"], "2024-05-01T10:00:00Z");
    }
}
