pub mod admin_service;
pub mod application_service;
pub mod video_storage;
