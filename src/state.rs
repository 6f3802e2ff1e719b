use std::sync::Arc;
use tokio::sync::Mutex;
use crate::domain::ports::{BookingRepository, CatalogRepository, DraftRepository, ScheduleRepository};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub catalog_repo: Arc<dyn CatalogRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub draft_repo: Arc<dyn DraftRepository>,
    /// Held while a time block is validated against the stored ones and written.
    pub time_block_writes: Arc<Mutex<()>>,
}
