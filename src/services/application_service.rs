use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::dashboard::{summarize, Analytics};
use crate::database::ApplicationRepository;
use crate::dto::application_dto::StatsResponse;
use crate::error::{Error, Result};
use crate::form::teacher::{EMAIL_FIELD, FULL_NAME_FIELD, PHONE_FIELD};
use crate::form::{validate_form, FieldValue, FormSchema, FormState};
use crate::models::application::{
    AnswerValue, Answers, ApplicationRecord, ApplicationStatus, NewApplication,
};
use crate::services::video_storage::VideoStore;

#[derive(Clone)]
pub struct ApplicationService {
    repo: Arc<dyn ApplicationRepository>,
    videos: Arc<dyn VideoStore>,
    schema: Arc<FormSchema>,
}

impl ApplicationService {
    pub fn new(
        repo: Arc<dyn ApplicationRepository>,
        videos: Arc<dyn VideoStore>,
        schema: Arc<FormSchema>,
    ) -> Self {
        Self {
            repo,
            videos,
            schema,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Re-validates the form, stores the recording and inserts the record.
    /// The stored video is removed again if the insert fails.
    pub async fn submit(&self, state: FormState) -> Result<ApplicationRecord> {
        let errors = validate_form(&self.schema, &state);
        if !errors.is_empty() {
            tracing::info!(missing = errors.len(), "rejected incomplete application");
            return Err(Error::IncompleteForm(errors));
        }

        let video_url = match self
            .schema
            .media_field()
            .and_then(|field| state.media(&field.id))
        {
            Some(media) => Some(self.videos.put(media).await?),
            None => None,
        };

        let new = to_new_application(&state, video_url.clone());
        match self.repo.insert(new).await {
            Ok(record) => {
                tracing::info!(id = %record.id, email = %record.email, "application submitted");
                Ok(record)
            }
            Err(e) => {
                if let Some(url) = video_url {
                    if let Err(cleanup) = self.videos.delete(&url).await {
                        tracing::warn!(error = %cleanup, %url, "failed to remove orphaned video");
                    }
                }
                Err(e)
            }
        }
    }

    pub async fn list(&self, status: Option<ApplicationStatus>) -> Result<Vec<ApplicationRecord>> {
        self.repo.list(status).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ApplicationRecord> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Application {} not found", id)))
    }

    /// The first reviewer wins: a record that is no longer pending yields
    /// `Conflict` rather than being overwritten.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        reviewer: &str,
    ) -> Result<ApplicationRecord> {
        if status == ApplicationStatus::Pending {
            return Err(Error::BadRequest(
                "Status must be approved or rejected".into(),
            ));
        }

        if let Some(record) = self.repo.review(id, status, reviewer, Utc::now()).await? {
            tracing::info!(%id, %status, %reviewer, "application reviewed");
            return Ok(record);
        }

        let current = self.get(id).await?;
        Err(Error::Conflict(format!(
            "Application {} is already {}",
            id, current.status
        )))
    }

    pub async fn stats(&self) -> Result<StatsResponse> {
        let records = self.repo.list(None).await?;
        Ok(StatsResponse {
            counts: summarize(&records),
            analytics: Analytics::from_records(&records),
        })
    }
}

fn to_new_application(state: &FormState, video_url: Option<String>) -> NewApplication {
    let text = |id: &str| state.text(id).map(str::trim).unwrap_or_default().to_string();

    let mut answers = Answers::new();
    for (id, value) in state.iter() {
        if [FULL_NAME_FIELD, EMAIL_FIELD, PHONE_FIELD].contains(&id) {
            continue;
        }
        match value {
            FieldValue::Text(s) => {
                answers.insert(id.to_string(), AnswerValue::Text(s.trim().to_string()));
            }
            FieldValue::List(items) => {
                answers.insert(id.to_string(), AnswerValue::List(items.clone()));
            }
            FieldValue::Media(_) => {}
        }
    }

    NewApplication {
        full_name: text(FULL_NAME_FIELD),
        email: text(EMAIL_FIELD),
        phone_number: text(PHONE_FIELD),
        answers,
        video_url,
    }
}
