pub mod capture;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod database;
pub mod dto;
pub mod error;
pub mod form;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::database::{
    AdminRepository, ApplicationRepository, MemoryAdminRepository, MemoryApplicationRepository,
    PgAdminRepository, PgApplicationRepository,
};
use crate::error::{Error, Result};
use crate::form::teacher::teacher_application;
use crate::services::{
    admin_service::AdminService,
    application_service::ApplicationService,
    video_storage::{LocalVideoStore, VideoStore},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub application_service: ApplicationService,
    pub admin_service: AdminService,
}

impl AppState {
    pub fn new(
        config: Config,
        applications: Arc<dyn ApplicationRepository>,
        admins: Arc<dyn AdminRepository>,
        videos: Arc<dyn VideoStore>,
    ) -> Result<Self> {
        let schema = teacher_application()
            .map_err(|e| Error::Config(format!("Invalid application form: {}", e)))?;

        let application_service = ApplicationService::new(applications, videos, Arc::new(schema));
        let admin_service = AdminService::new(
            admins,
            config.jwt_secret.clone(),
            config.token_ttl_minutes,
        );

        Ok(Self {
            config: Arc::new(config),
            application_service,
            admin_service,
        })
    }

    pub fn postgres(config: Config, pool: PgPool) -> Result<Self> {
        let videos = local_videos(&config);
        Self::new(
            config,
            Arc::new(PgApplicationRepository::new(pool.clone())),
            Arc::new(PgAdminRepository::new(pool)),
            videos,
        )
    }

    /// Nothing survives a restart; for development and tests.
    pub fn in_memory(config: Config) -> Result<Self> {
        let videos = local_videos(&config);
        Self::new(
            config,
            Arc::new(MemoryApplicationRepository::new()),
            Arc::new(MemoryAdminRepository::new()),
            videos,
        )
    }
}

fn local_videos(config: &Config) -> Arc<dyn VideoStore> {
    Arc::new(LocalVideoStore::new(
        &config.uploads_dir,
        &config.public_base_url,
    ))
}
