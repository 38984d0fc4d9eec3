//! Data Transfer Objects for REST request/response serialization.
//!
//! Dates cross the boundary as ISO 8601 (`YYYY-MM-DD`) and slot times as
//! 24-hour `HH:MM` strings, matching the persisted schedule layout.

pub mod admin_dto;
pub mod availability_dto;
pub mod booking_dto;

pub use admin_dto::*;
pub use availability_dto::*;
pub use booking_dto::*;
