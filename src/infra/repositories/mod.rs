pub mod sqlite_schedule_repo;
pub mod sqlite_catalog_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_draft_repo;

pub mod postgres_schedule_repo;
pub mod postgres_catalog_repo;
pub mod postgres_booking_repo;
pub mod postgres_draft_repo;
