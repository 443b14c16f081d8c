//! Admin dashboard logic: summary counts, status filtering, role gates and
//! the applicant analytics, plus a small controller that drives the review
//! client on behalf of a signed-in admin.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::review::ReviewClient;
use crate::client::session::{AdminSessionStore, Session, SessionStorage};
use crate::client::ClientError;
use crate::form::teacher::{CITY_FIELD, QUALIFICATION_FIELD, SUBJECTS_FIELD};
use crate::models::admin::{AdminIdentity, AdminRole};
use crate::models::application::{ApplicationRecord, ApplicationStatus};

const UNSPECIFIED: &str = "Unspecified";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCounts {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

pub fn summarize<'a, I>(records: I) -> SummaryCounts
where
    I: IntoIterator<Item = &'a ApplicationRecord>,
{
    let mut counts = SummaryCounts::default();
    for record in records {
        counts.total += 1;
        match record.status {
            ApplicationStatus::Pending => counts.pending += 1,
            ApplicationStatus::Approved => counts.approved += 1,
            ApplicationStatus::Rejected => counts.rejected += 1,
        }
    }
    counts
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn matches(self, record: &ApplicationRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => record.status == status,
        }
    }

    pub fn filter<'a>(self, records: &'a [ApplicationRecord]) -> Vec<&'a ApplicationRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// Approve/reject controls are only live for pending applications.
pub fn status_change_disabled(record: &ApplicationRecord) -> bool {
    record.status != ApplicationStatus::Pending
}

pub fn can_create_admin(identity: &AdminIdentity) -> bool {
    identity.role == AdminRole::SuperAdmin
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analytics {
    pub by_city: Vec<Bucket>,
    pub by_qualification: Vec<Bucket>,
    pub by_subject: Vec<Bucket>,
    pub by_status: Vec<Bucket>,
    /// `YYYY-MM`, oldest first.
    pub per_month: Vec<Bucket>,
}

impl Analytics {
    pub fn from_records(records: &[ApplicationRecord]) -> Self {
        let mut city = BTreeMap::new();
        let mut qualification = BTreeMap::new();
        let mut subject = BTreeMap::new();
        let mut status = BTreeMap::new();
        let mut month = BTreeMap::new();

        for record in records {
            *city.entry(label(record.text(CITY_FIELD))).or_insert(0) += 1;
            *qualification
                .entry(label(record.text(QUALIFICATION_FIELD)))
                .or_insert(0) += 1;
            for s in record.list(SUBJECTS_FIELD) {
                *subject.entry(s.clone()).or_insert(0) += 1;
            }
            *status.entry(record.status.as_str().to_string()).or_insert(0) += 1;
            *month
                .entry(record.submitted_at.format("%Y-%m").to_string())
                .or_insert(0) += 1;
        }

        Self {
            by_city: ranked(city),
            by_qualification: ranked(qualification),
            by_subject: ranked(subject),
            by_status: ranked(status),
            per_month: month
                .into_iter()
                .map(|(label, count)| Bucket { label, count })
                .collect(),
        }
    }
}

fn label(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNSPECIFIED.to_string(),
    }
}

/// Largest first; ties by label.
fn ranked(counts: BTreeMap<String, usize>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(label, count)| Bucket { label, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets
}

/// Review screen state for one signed-in admin.
pub struct Dashboard {
    client: ReviewClient,
    session: Session,
    records: Vec<ApplicationRecord>,
    pub filter: StatusFilter,
}

impl Dashboard {
    /// Fails with `NotAuthenticated` when nobody is signed in.
    pub async fn open<S: SessionStorage>(
        client: ReviewClient,
        store: &AdminSessionStore<S>,
    ) -> Result<Self, ClientError> {
        let session = store.require_session()?.clone();
        let mut dashboard = Self {
            client,
            session,
            records: Vec::new(),
            filter: StatusFilter::All,
        };
        dashboard.refresh().await?;
        Ok(dashboard)
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        self.records = self.client.list_applications(&self.session).await?;
        Ok(())
    }

    pub fn identity(&self) -> AdminIdentity {
        self.session.identity()
    }

    pub fn records(&self) -> &[ApplicationRecord] {
        &self.records
    }

    pub fn visible(&self) -> Vec<&ApplicationRecord> {
        self.filter.filter(&self.records)
    }

    pub fn counts(&self) -> SummaryCounts {
        summarize(&self.records)
    }

    pub fn analytics(&self) -> Analytics {
        Analytics::from_records(&self.records)
    }

    pub fn can_create_admin(&self) -> bool {
        can_create_admin(&self.identity())
    }

    pub async fn approve(&mut self, id: Uuid) -> bool {
        self.decide(id, ApplicationStatus::Approved).await
    }

    pub async fn reject(&mut self, id: Uuid) -> bool {
        self.decide(id, ApplicationStatus::Rejected).await
    }

    /// Refreshes the list after a successful change; a failure leaves the
    /// local list untouched.
    async fn decide(&mut self, id: Uuid, status: ApplicationStatus) -> bool {
        if let Some(record) = self.records.iter().find(|r| r.id == id) {
            if status_change_disabled(record) {
                tracing::warn!(%id, status = %record.status, "application already reviewed");
                return false;
            }
        }
        if !self.client.set_status(&self.session, id, status).await {
            return false;
        }
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "failed to reload applications after review");
        }
        true
    }

    pub async fn create_admin(&self, email: &str, password: &str, role: AdminRole) -> bool {
        if !self.can_create_admin() {
            tracing::warn!(email = %self.session.email, "only super admins can add admins");
            return false;
        }
        self.client
            .create_admin(&self.session, email, password, role)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::{AnswerValue, Answers};
    use chrono::{TimeZone, Utc};

    fn record(city: &str, subjects: &[&str], status: ApplicationStatus, month: u32) -> ApplicationRecord {
        let mut answers = Answers::new();
        answers.insert(CITY_FIELD.into(), AnswerValue::Text(city.into()));
        answers.insert(
            SUBJECTS_FIELD.into(),
            AnswerValue::List(subjects.iter().map(|s| s.to_string()).collect()),
        );
        ApplicationRecord {
            id: Uuid::new_v4(),
            full_name: "Applicant".into(),
            email: "a@example.com".into(),
            phone_number: "1".into(),
            answers,
            video_url: None,
            status,
            submitted_at: Utc.with_ymd_and_hms(2026, month, 3, 10, 0, 0).unwrap(),
            reviewed_at: None,
            reviewed_by: None,
        }
    }

    fn sample() -> Vec<ApplicationRecord> {
        use ApplicationStatus::*;
        vec![
            record("Pune, MH", &["Chess", "Yoga"], Pending, 9),
            record("Pune, MH", &["Chess"], Approved, 9),
            record("  ", &["Abacus"], Rejected, 10),
            record("Delhi", &[], Pending, 10),
        ]
    }

    #[test]
    fn counts_partition_the_total() {
        let counts = summarize(&sample());
        assert_eq!(
            counts,
            SummaryCounts {
                total: 4,
                pending: 2,
                approved: 1,
                rejected: 1
            }
        );
        assert_eq!(counts.pending + counts.approved + counts.rejected, counts.total);
    }

    #[test]
    fn filter_parses_and_selects() {
        let records = sample();
        assert_eq!("all".parse::<StatusFilter>().unwrap().filter(&records).len(), 4);
        let pending: StatusFilter = "Pending".parse().unwrap();
        assert_eq!(pending, StatusFilter::Only(ApplicationStatus::Pending));
        assert!(pending.filter(&records).iter().all(|r| r.is_pending()));
        assert!("archived".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn only_pending_records_accept_status_changes() {
        let records = sample();
        assert!(!status_change_disabled(&records[0]));
        assert!(status_change_disabled(&records[1]));
        assert!(status_change_disabled(&records[2]));
    }

    #[test]
    fn only_super_admin_may_create_admins() {
        let admin = AdminIdentity {
            email: "a@b.co".into(),
            role: AdminRole::Admin,
        };
        let super_admin = AdminIdentity {
            email: "s@b.co".into(),
            role: AdminRole::SuperAdmin,
        };
        assert!(!can_create_admin(&admin));
        assert!(can_create_admin(&super_admin));
    }

    #[test]
    fn analytics_group_and_rank() {
        let analytics = Analytics::from_records(&sample());
        assert_eq!(
            analytics.by_city[0],
            Bucket {
                label: "Pune, MH".into(),
                count: 2
            }
        );
        assert!(analytics.by_city.iter().any(|b| b.label == UNSPECIFIED));
        assert_eq!(analytics.by_subject[0].label, "Chess");
        assert_eq!(analytics.by_subject[0].count, 2);
        assert_eq!(
            analytics
                .per_month
                .iter()
                .map(|b| b.label.as_str())
                .collect::<Vec<_>>(),
            vec!["2026-09", "2026-10"]
        );
        let qualification_total: usize = analytics.by_qualification.iter().map(|b| b.count).sum();
        assert_eq!(qualification_total, 4);
    }
}
