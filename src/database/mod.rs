pub mod admin_repo;
pub mod application_repo;
pub mod memory;
pub mod pool;

pub use admin_repo::{AdminRepository, PgAdminRepository};
pub use application_repo::{ApplicationRepository, PgApplicationRepository};
pub use memory::{MemoryAdminRepository, MemoryApplicationRepository};
