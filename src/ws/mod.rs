//! WebSocket layer: the outbound notification feed.
//!
//! The endpoint at `/ws/notifications` is where the external delivery
//! channel attaches. Every notification published by the core (admin
//! cancellations, reminders) is forwarded to all connected feeds as a
//! JSON frame.

pub mod connection;
pub mod handler;
pub mod messages;
