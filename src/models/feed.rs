//! Preparedness feed document types.
//!
//! Field names follow the JSON shape consumed by the web front-end
//! (`answerIndex`, `type`).

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::mode::DisasterMode;

/// Alert severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

/// A regional disaster alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DisasterMode,
    pub region: String,
    pub severity: Severity,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub summary: String,
}

/// A multiple-choice preparedness question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer
    pub answer_index: usize,
}

impl Quiz {
    /// The text of the correct answer, if the index is in range.
    pub fn answer(&self) -> Option<&str> {
        self.options.get(self.answer_index).map(String::as_str)
    }
}

/// Share of respondents prepared on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwarenessEntry {
    pub topic: String,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub awareness: Vec<AwarenessEntry>,
}

/// An upcoming training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub title: String,
    #[serde(with = "iso_millis")]
    pub datetime: DateTime<Utc>,
    pub host: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ping {
    pub message: String,
}

/// `2024-05-01T10:00:00.000Z` style timestamps.
mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_alert_json_shape() {
        let alert = Alert {
            id: "a9".to_string(),
            kind: DisasterMode::Fire,
            region: "Somewhere".to_string(),
            severity: Severity::Moderate,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            summary: "Smoke".to_string(),
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "fire");
        assert_eq!(json["severity"], "moderate");
        assert_eq!(json["timestamp"], "2024-05-01T10:00:00.000Z");

        let back: Alert = serde_json::from_value(json).unwrap();
        assert_eq!(back, alert);
    }

    #[test]
    fn test_quiz_camel_case() {
        let quiz = Quiz {
            id: "q".to_string(),
            question: "?".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            answer_index: 1,
        };
        let json = serde_json::to_value(&quiz).unwrap();
        assert_eq!(json["answerIndex"], 1);
        assert_eq!(quiz.answer(), Some("b"));
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::Low < Severity::Moderate);
    }
}
