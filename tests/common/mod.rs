#![allow(dead_code)]

use std::path::Path;

use teacher_recruitment::capture::MediaObject;
use teacher_recruitment::config::Config;
use teacher_recruitment::form::{FieldKind, FormSchema, FormState};

pub const SUPER_EMAIL: &str = "lead@whaot.example";
pub const SUPER_PASSWORD: &str = "bootstrap-pass";

/// A minimal WebM payload: EBML magic followed by filler.
pub fn webm_bytes() -> Vec<u8> {
    let mut data = vec![0x1A, 0x45, 0xDF, 0xA3];
    data.extend_from_slice(b"demo-frames");
    data
}

pub fn test_config(uploads: &Path, public_rps: u32) -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: None,
        jwt_secret: "test_secret_key".into(),
        token_ttl_minutes: 60,
        public_rps,
        uploads_dir: uploads.to_string_lossy().into_owned(),
        public_base_url: "http://localhost:8080".into(),
        cors_origin: None,
        bootstrap_admin_email: None,
        bootstrap_admin_password: None,
        max_upload_mb: 16,
    }
}

/// Every question answered with its first option or a placeholder.
pub fn complete_form(schema: &FormSchema) -> FormState {
    let mut state = FormState::new();
    for field in schema.fields() {
        match field.kind {
            FieldKind::MultiChoice => state.set_list(&field.id, [field.options[0].clone()]),
            FieldKind::SingleChoice => state.set_text(&field.id, field.options[0].clone()),
            FieldKind::Media => state.set_media(&field.id, MediaObject::webm(webm_bytes())),
            _ => state.set_text(&field.id, "answer"),
        }
    }
    state.set_text("fullName", "Priya Sharma");
    state.set_text("email", "priya@example.com");
    state.set_text("cityState", "Pune, Maharashtra");
    state
}
