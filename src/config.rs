use std::env;

use chrono_tz::Tz;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Shared secret for the admin panel routes.
    pub admin_api_key: String,
    /// Defines what "today" means for the advance booking window.
    pub venue_timezone: Tz,
    pub draft_ttl_hours: i64,
    pub draft_purge_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            admin_api_key: env::var("ADMIN_API_KEY").expect("ADMIN_API_KEY must be set"),
            venue_timezone: env::var("VENUE_TIMEZONE")
                .unwrap_or_else(|_| "America/Mexico_City".to_string())
                .parse()
                .expect("VENUE_TIMEZONE must be an IANA timezone"),
            draft_ttl_hours: env::var("DRAFT_TTL_HOURS").unwrap_or_else(|_| "24".to_string()).parse().expect("DRAFT_TTL_HOURS must be a number"),
            draft_purge_interval_secs: env::var("DRAFT_PURGE_INTERVAL_SECS").unwrap_or_else(|_| "600".to_string()).parse().expect("DRAFT_PURGE_INTERVAL_SECS must be a number"),
        }
    }

    pub fn draft_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.draft_ttl_hours)
    }

    /// Current calendar date at the venue.
    pub fn venue_today(&self) -> chrono::NaiveDate {
        chrono::Utc::now().with_timezone(&self.venue_timezone).date_naive()
    }
}
