use std::collections::BTreeMap;

use crate::domain::models::{
    booking::{BlockBookingCounts, Booking, CapacityLimit},
    catalog::{Catalog, CatalogKind, EventTheme, ExtraService, FoodOption, PackageOption},
    draft::StoredDraft,
    payment::PaymentSettings,
    schedule::{RestDay, RestDayRelease, ScheduleConfiguration, ScheduleSettings, TimeBlock},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn get_settings(&self) -> Result<ScheduleSettings, AppError>;
    async fn save_settings(&self, settings: &ScheduleSettings) -> Result<ScheduleSettings, AppError>;
    async fn get_payment_settings(&self) -> Result<PaymentSettings, AppError>;
    async fn save_payment_settings(&self, settings: &PaymentSettings) -> Result<PaymentSettings, AppError>;

    /// Ordered by start time.
    async fn list_time_blocks(&self) -> Result<Vec<TimeBlock>, AppError>;
    async fn create_time_block(&self, block: &TimeBlock) -> Result<TimeBlock, AppError>;
    async fn update_time_block(&self, block: &TimeBlock) -> Result<TimeBlock, AppError>;
    async fn delete_time_block(&self, id: &str) -> Result<(), AppError>;

    async fn list_rest_days(&self) -> Result<Vec<RestDay>, AppError>;
    async fn upsert_rest_day(&self, rest_day: &RestDay) -> Result<RestDay, AppError>;
    async fn delete_rest_day(&self, day: u8) -> Result<(), AppError>;

    async fn list_releases(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RestDayRelease>, AppError>;
    async fn upsert_release(&self, release: &RestDayRelease) -> Result<RestDayRelease, AppError>;
    async fn delete_release(&self, date: NaiveDate) -> Result<(), AppError>;

    async fn load_configuration(&self) -> Result<ScheduleConfiguration, AppError> {
        Ok(ScheduleConfiguration {
            settings: self.get_settings().await?,
            time_blocks: self.list_time_blocks().await?,
            rest_days: self.list_rest_days().await?,
        })
    }
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_packages(&self) -> Result<Vec<PackageOption>, AppError>;
    async fn save_package(&self, package: &PackageOption) -> Result<PackageOption, AppError>;
    async fn list_food_options(&self) -> Result<Vec<FoodOption>, AppError>;
    async fn save_food_option(&self, food: &FoodOption) -> Result<FoodOption, AppError>;
    async fn list_themes(&self) -> Result<Vec<EventTheme>, AppError>;
    async fn save_theme(&self, theme: &EventTheme) -> Result<EventTheme, AppError>;
    async fn list_extras(&self) -> Result<Vec<ExtraService>, AppError>;
    async fn save_extra(&self, extra: &ExtraService) -> Result<ExtraService, AppError>;
    async fn exists(&self, kind: CatalogKind, id: &str) -> Result<bool, AppError>;
    async fn delete(&self, kind: CatalogKind, id: &str) -> Result<(), AppError>;

    async fn load_catalog(&self) -> Result<Catalog, AppError> {
        Ok(Catalog {
            packages: self.list_packages().await?,
            food_options: self.list_food_options().await?,
            themes: self.list_themes().await?,
            extras: self.list_extras().await?,
        })
    }
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts only if the slot (or the whole date with one event per day) still
    /// has room, counted inside the same transaction.
    async fn create_within_capacity(&self, booking: &Booking, limit: CapacityLimit) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Booking>, AppError>;
    /// Moving a cancelled booking back to an active status rechecks `limit`
    /// inside the same transaction, like the insert.
    async fn update_status(&self, id: &str, status: &str, limit: CapacityLimit) -> Result<Booking, AppError>;
    async fn count_by_date(&self, date: NaiveDate) -> Result<BlockBookingCounts, AppError>;
    async fn count_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<BTreeMap<NaiveDate, BlockBookingCounts>, AppError>;
}

#[async_trait]
pub trait DraftRepository: Send + Sync {
    async fn save(&self, draft: &StoredDraft) -> Result<StoredDraft, AppError>;
    async fn find(&self, key: &str) -> Result<Option<StoredDraft>, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}
