pub mod availability;
pub mod booking;
pub mod catalog;
pub mod draft;
pub mod health;
pub mod pricing;
pub mod schedule;
pub mod settings;
