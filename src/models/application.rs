use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Only pending applications can be moved, and only to a final state.
    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        self == ApplicationStatus::Pending && next != ApplicationStatus::Pending
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    List(Vec<String>),
}

pub type Answers = BTreeMap<String, AnswerValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub answers: Answers,
    pub video_url: Option<String>,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
}

impl ApplicationRecord {
    pub fn text(&self, id: &str) -> Option<&str> {
        match self.answers.get(id) {
            Some(AnswerValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn list(&self, id: &str) -> &[String] {
        match self.answers.get(id) {
            Some(AnswerValue::List(items)) => items.as_slice(),
            _ => &[],
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ApplicationStatus::Pending
    }
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub answers: Answers,
    pub video_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_moves_and_only_forward() {
        use ApplicationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
    }

    #[test]
    fn answers_round_trip_through_json() {
        let mut answers = Answers::new();
        answers.insert("cityState".into(), AnswerValue::Text("Pune".into()));
        answers.insert(
            "subjects".into(),
            AnswerValue::List(vec!["Chess".into(), "Yoga".into()]),
        );
        let json = serde_json::to_value(&answers).unwrap();
        assert_eq!(json["subjects"][1], "Yoga");
        let back: Answers = serde_json::from_value(json).unwrap();
        assert_eq!(back, answers);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Approved".parse::<ApplicationStatus>(), Ok(ApplicationStatus::Approved));
        assert!("archived".parse::<ApplicationStatus>().is_err());
    }
}
