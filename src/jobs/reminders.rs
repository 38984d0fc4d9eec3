//! Periodic reminder sweep.
//!
//! Every interval the job loads bookings whose excursion falls inside
//! the reminder window and publishes a reminder payload for each. The
//! `reminder_sent` flag is flipped only after a successful delivery
//! attempt, so a sweep that runs late or is skipped a cycle retries the
//! same bookings without ever double-notifying.

use chrono::{Duration, Local};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::GatewayConfig;
use crate::domain::{Notification, NotificationBus, NotificationKind};
use crate::error::GatewayError;
use crate::persistence::store::BookingStore;

/// Spawns the reminder sweep loop.
///
/// The returned handle is detached by callers that run until shutdown;
/// the loop itself never exits.
#[must_use]
pub fn spawn(
    store: BookingStore,
    notifications: NotificationBus,
    config: &GatewayConfig,
) -> JoinHandle<()> {
    let interval = std::time::Duration::from_secs(config.reminder_interval_secs.max(1));
    let window_from_hours = config.reminder_window_from_hours;
    let window_to_hours = config.reminder_window_to_hours;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match sweep(&store, &notifications, window_from_hours, window_to_hours).await {
                Ok(sent) if sent > 0 => tracing::info!(sent, "reminder sweep completed"),
                Ok(_) => {}
                Err(err) => tracing::error!(error = %err, "reminder sweep failed"),
            }
        }
    })
}

/// Runs one sweep over the `[now + from_hours, now + to_hours]` window.
///
/// Returns how many reminders were delivered and marked sent. A booking
/// whose payload found no attached delivery channel is left unmarked and
/// retried on a later sweep.
///
/// # Errors
///
/// Returns [`GatewayError::Store`] when loading or marking fails; any
/// reminders already marked in this sweep stay marked.
pub async fn sweep(
    store: &BookingStore,
    notifications: &NotificationBus,
    from_hours: i64,
    to_hours: i64,
) -> Result<usize, GatewayError> {
    let now = Local::now().naive_local();
    let from = now + Duration::hours(from_hours);
    let to = now + Duration::hours(to_hours);

    let pending = store.pending_reminders(from, to).await?;
    let mut sent = 0;
    for reminder in pending {
        let delivered = notifications.publish(Notification {
            user_id: reminder.user_id,
            kind: NotificationKind::Reminder,
            message: format!(
                "Reminder: your excursion is on {} at {}, party of {}. \
                 Please arrive on time.",
                reminder.date,
                reminder.time.format("%H:%M"),
                reminder.persons,
            ),
        });
        if delivered == 0 {
            tracing::warn!(
                user = %reminder.user_id,
                booking = %reminder.booking_id,
                "no delivery channel attached; reminder deferred to next sweep"
            );
            continue;
        }
        // Mark only after the payload reached a delivery channel.
        store.mark_reminder_sent(reminder.booking_id).await?;
        sent += 1;
    }
    Ok(sent)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::testutil::{day_rule, open_store, request, time};

    /// Seeds one booking whose excursion is 24h from now, squarely
    /// inside the default 23h..25h window.
    async fn seed_booking_tomorrow(store: &BookingStore) {
        let tomorrow = Local::now().date_naive() + Duration::days(1);
        let slot_time = time(12, 0);
        let Ok(()) = store
            .replace_schedule(&[day_rule(tomorrow, &[(12, 0, 3)])])
            .await
        else {
            panic!("seeding failed");
        };
        let days = store
            .available_days(1, Local::now().date_naive())
            .await
            .unwrap_or_default();
        let Some(day) = days.first() else {
            panic!("day missing");
        };
        let slots = store
            .available_times(day.day_id, 1, Local::now().naive_local())
            .await
            .unwrap_or_default();
        let Some(slot) = slots.iter().find(|s| s.time == slot_time) else {
            panic!("slot missing");
        };
        let ok = store
            .reserve(&request(8, "Ivan", None, 2, day.day_id, slot.time_slot_id))
            .await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn sweep_delivers_and_marks_once() {
        let (_dir, store) = open_store().await;
        seed_booking_tomorrow(&store).await;
        let bus = NotificationBus::new(16);
        let mut rx = bus.subscribe();

        let Ok(sent) = sweep(&store, &bus, 0, 48).await else {
            panic!("sweep failed");
        };
        assert_eq!(sent, 1);

        let Ok(notice) = rx.try_recv() else {
            panic!("reminder payload missing");
        };
        assert_eq!(notice.user_id, UserId::new(8));
        assert_eq!(notice.kind, NotificationKind::Reminder);
        assert!(notice.message.contains("12:00"));
        assert!(notice.message.contains("party of 2"));

        // Second sweep over the same window: the flag guards repeats.
        let Ok(sent) = sweep(&store, &bus, 0, 48).await else {
            panic!("second sweep failed");
        };
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn sweep_without_delivery_channel_defers() {
        let (_dir, store) = open_store().await;
        seed_booking_tomorrow(&store).await;
        let bus = NotificationBus::new(16);

        let Ok(sent) = sweep(&store, &bus, 0, 48).await else {
            panic!("sweep failed");
        };
        assert_eq!(sent, 0);

        // Once a channel attaches, the deferred reminder goes out.
        let mut rx = bus.subscribe();
        let Ok(sent) = sweep(&store, &bus, 0, 48).await else {
            panic!("second sweep failed");
        };
        assert_eq!(sent, 1);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn sweep_ignores_bookings_outside_window() {
        let (_dir, store) = open_store().await;
        seed_booking_tomorrow(&store).await;
        let bus = NotificationBus::new(16);
        let _rx = bus.subscribe();

        // Window far in the future; tomorrow's booking is not in it.
        let Ok(sent) = sweep(&store, &bus, 100, 120).await else {
            panic!("sweep failed");
        };
        assert_eq!(sent, 0);
    }
}
