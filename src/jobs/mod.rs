//! Background jobs independent of request handling.

pub mod reminders;
