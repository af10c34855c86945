//! Static preparedness feed documents
//!
//! Alerts, quizzes, awareness stats, training sessions and a ping message.
//! The content is fixed; only timestamps move with the supplied clock.

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::models::{Alert, AwarenessEntry, DisasterMode, Ping, Quiz, Session, Severity, Stats};

/// Environment variable overriding the ping message.
pub const PING_MESSAGE_VAR: &str = "AURA_PING_MESSAGE";

/// Ping message used when [`PING_MESSAGE_VAR`] is unset.
pub const DEFAULT_PING_MESSAGE: &str = "ping";

/// Which document to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Alerts,
    Quizzes,
    Stats,
    Sessions,
    Ping,
}

fn alert(
    id: &str,
    kind: DisasterMode,
    region: &str,
    severity: Severity,
    timestamp: DateTime<Utc>,
    summary: &str,
) -> Alert {
    Alert {
        id: id.to_string(),
        kind,
        region: region.to_string(),
        severity,
        timestamp,
        summary: summary.to_string(),
    }
}

/// Current regional alerts, stamped relative to `now`.
pub fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    let ago = |minutes| now - Duration::minutes(minutes);
    vec![
        alert(
            "a1",
            DisasterMode::Flood,
            "Assam, IN",
            Severity::High,
            ago(5),
            "River Brahmaputra rising; low-lying areas inundated.",
        ),
        alert(
            "a2",
            DisasterMode::Fire,
            "Nashik, IN",
            Severity::Moderate,
            ago(14),
            "Dry winds increasing wildfire spread near outskirts.",
        ),
        alert(
            "a3",
            DisasterMode::Cyclone,
            "Odisha Coast, IN",
            Severity::Critical,
            ago(1),
            "Cyclone Sagira approaching; gusts up to 130 km/h.",
        ),
        alert(
            "a4",
            DisasterMode::Flood,
            "Guwahati, IN",
            Severity::Low,
            ago(25),
            "Localized waterlogging after heavy showers.",
        ),
    ]
}

fn quiz(id: &str, question: &str, options: [&str; 4], answer_index: usize) -> Quiz {
    Quiz {
        id: id.to_string(),
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer_index,
    }
}

pub fn quizzes() -> Vec<Quiz> {
    vec![
        quiz(
            "q1",
            "What should you do first during a flood warning?",
            [
                "Drive through water to move fast",
                "Move to higher ground immediately",
                "Wait until water rises",
                "Open all windows",
            ],
            1,
        ),
        quiz(
            "q2",
            "During a fire, which is safest?",
            ["Use elevators", "Get low and crawl under smoke", "Hide in a closet", "Break windows"],
            1,
        ),
        quiz(
            "q3",
            "Cyclone prep includes:",
            [
                "Tape windows only",
                "Secure loose objects outdoors",
                "Open doors for airflow",
                "Ignore alerts",
            ],
            1,
        ),
        quiz(
            "q4",
            "Earthquake drill means:",
            ["Drop, Cover, Hold On", "Run outside immediately", "Stand in doorway", "Use elevator"],
            0,
        ),
    ]
}

pub fn stats() -> Stats {
    let awareness = [
        ("Flood kit readiness", 62),
        ("Fire escape plan", 48),
        ("Cyclone safe zones", 55),
        ("First-aid basics", 71),
        ("Emergency contacts", 67),
    ]
    .into_iter()
    .map(|(topic, percent)| AwarenessEntry { topic: topic.to_string(), percent })
    .collect();

    Stats { awareness }
}

/// Upcoming sessions, one per hour starting an hour after `now`.
pub fn sessions(now: DateTime<Utc>) -> Vec<Session> {
    [
        ("s1", "Cyclone Readiness 101", "NDRF Trainer A"),
        ("s2", "Community Flood Drill", "Relief Org B"),
        ("s3", "Home Fire Safety", "Fire Dept C"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((id, title, host), hours)| Session {
        id: id.to_string(),
        title: title.to_string(),
        datetime: now + Duration::hours(hours),
        host: host.to_string(),
        url: "#".to_string(),
    })
    .collect()
}

pub fn ping(message: &str) -> Ping {
    Ping { message: message.to_string() }
}

/// Ping message from the environment, or the default.
pub fn ping_message() -> String {
    std::env::var(PING_MESSAGE_VAR).unwrap_or_else(|_| DEFAULT_PING_MESSAGE.to_string())
}

/// Build the JSON document for `kind`.
pub fn document(kind: FeedKind, now: DateTime<Utc>) -> serde_json::Value {
    let value = match kind {
        FeedKind::Alerts => serde_json::to_value(alerts(now)),
        FeedKind::Quizzes => serde_json::to_value(quizzes()),
        FeedKind::Stats => serde_json::to_value(stats()),
        FeedKind::Sessions => serde_json::to_value(sessions(now)),
        FeedKind::Ping => serde_json::to_value(ping(&ping_message())),
    };
    // These types only hold strings, integers and enums, so serialization
    // cannot fail.
    value.unwrap_or(serde_json::Value::Null)
}
