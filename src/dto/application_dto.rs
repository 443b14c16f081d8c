use serde::{Deserialize, Serialize};

use crate::dashboard::{Analytics, SummaryCounts};
use crate::models::application::ApplicationStatus;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitApplicationResponse {
    pub status: String,
    pub id: uuid::Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListApplicationsQuery {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsResponse {
    pub counts: SummaryCounts,
    pub analytics: Analytics,
}
