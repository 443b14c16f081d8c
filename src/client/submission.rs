use std::sync::Arc;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use super::{read_json, ApiClient, ClientError};
use crate::dto::application_dto::SubmitApplicationResponse;
use crate::form::{validate, FieldValue, FormSchema, FormState};

pub const VIDEO_FILENAME: &str = "demo.webm";

/// One multipart part as it goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedPart {
    Text {
        name: String,
        value: String,
    },
    Binary {
        name: String,
        filename: String,
        content_type: String,
        data: Bytes,
    },
}

impl EncodedPart {
    pub fn name(&self) -> &str {
        match self {
            EncodedPart::Text { name, .. } | EncodedPart::Binary { name, .. } => name,
        }
    }
}

/// Scalars become text parts, selections a JSON array string, and the
/// recording a binary part named after its field.
pub fn encode_form(state: &FormState) -> Vec<EncodedPart> {
    state
        .iter()
        .map(|(id, value)| match value {
            FieldValue::Text(text) => EncodedPart::Text {
                name: id.to_string(),
                value: text.clone(),
            },
            FieldValue::List(items) => EncodedPart::Text {
                name: id.to_string(),
                value: serde_json::Value::from(items.clone()).to_string(),
            },
            FieldValue::Media(media) => EncodedPart::Binary {
                name: id.to_string(),
                filename: VIDEO_FILENAME.to_string(),
                content_type: media.content_type().to_string(),
                data: media.bytes().clone(),
            },
        })
        .collect()
}

fn into_multipart(parts: Vec<EncodedPart>) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            EncodedPart::Text { name, value } => form.text(name, value),
            EncodedPart::Binary {
                name,
                filename,
                content_type,
                data,
            } => {
                let part = Part::bytes(data.to_vec())
                    .file_name(filename)
                    .mime_str(&content_type)?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[derive(Clone)]
pub struct SubmissionClient {
    api: ApiClient,
    schema: Arc<FormSchema>,
}

impl SubmissionClient {
    pub fn new(api: ApiClient, schema: Arc<FormSchema>) -> Self {
        Self { api, schema }
    }

    /// Checks required answers locally first; nothing is sent while any are
    /// missing. No retries.
    pub async fn submit(&self, state: &FormState) -> Result<SubmitApplicationResponse, ClientError> {
        let errors = validate(state, self.schema.required_ids());
        if !errors.is_empty() {
            return Err(ClientError::Validation(errors));
        }
        self.send(state).await
    }

    /// Posts the form as-is.
    pub async fn send(&self, state: &FormState) -> Result<SubmitApplicationResponse, ClientError> {
        let form = into_multipart(encode_form(state))?;
        let url = self.api.endpoint("submit_application")?;
        tracing::info!(%url, parts = state.len(), "submitting application");
        let resp = self.api.http().post(url).multipart(form).send().await?;
        read_json(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MediaObject;
    use crate::form::teacher::{teacher_application, SUBJECTS_FIELD, VIDEO_FIELD};

    #[test]
    fn lists_are_json_and_media_is_binary() {
        let mut state = FormState::new();
        state.set_text("fullName", "Priya Sharma");
        state.set_list(SUBJECTS_FIELD, ["Chess", "Vedic Maths"]);
        state.set_media(VIDEO_FIELD, MediaObject::webm(vec![1, 2, 3]));

        let parts = encode_form(&state);
        assert_eq!(parts.len(), 3);

        let subjects = parts.iter().find(|p| p.name() == SUBJECTS_FIELD).unwrap();
        assert_eq!(
            subjects,
            &EncodedPart::Text {
                name: SUBJECTS_FIELD.into(),
                value: r#"["Chess","Vedic Maths"]"#.into(),
            }
        );

        match parts.iter().find(|p| p.name() == VIDEO_FIELD).unwrap() {
            EncodedPart::Binary {
                filename,
                content_type,
                data,
                ..
            } => {
                assert_eq!(filename, VIDEO_FILENAME);
                assert_eq!(content_type, "video/webm");
                assert_eq!(data.as_ref(), &[1, 2, 3]);
            }
            other => panic!("expected binary part, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_answers_block_the_request() {
        // nothing listens here; reaching the network would surface as Network
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let client = SubmissionClient::new(api, Arc::new(teacher_application().unwrap()));

        let mut state = FormState::new();
        state.set_text("fullName", "Priya Sharma");
        match client.submit(&state).await {
            Err(ClientError::Validation(errors)) => {
                assert!(errors.contains_key(VIDEO_FIELD));
                assert!(!errors.contains_key("fullName"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
