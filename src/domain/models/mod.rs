pub mod booking;
pub mod catalog;
pub mod draft;
pub mod payment;
pub mod schedule;
