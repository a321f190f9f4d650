//! # Local Notifications
//!
//! Fire-and-forget operator alerts: an audible beep plus a colored
//! console line. Notifications require a permission grant at startup;
//! without it every call is a silent no-op, never an error.

pub mod watcher;

pub use watcher::NewSignalWatcher;

use crate::loggers::loggerlocal::LoggerLocal;
use crate::models::CallSide;
use colored::*;
use std::sync::Arc;

/// Permission state for local notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    Granted,
    Denied,
}

/// Requests notification permission at startup.
///
/// Server deployments grant it through configuration; there is no
/// interactive prompt to fall back to.
pub fn request_notification_permission(alerts_enabled: bool) -> NotificationPermission {
    if alerts_enabled {
        NotificationPermission::Granted
    } else {
        NotificationPermission::Denied
    }
}

/// Delivers local notifications, subject to the permission grant.
pub struct SignalNotifier {
    permission: NotificationPermission,
    logger: Arc<LoggerLocal>,
}

impl SignalNotifier {
    pub fn new(permission: NotificationPermission, logger: Arc<LoggerLocal>) -> Self {
        Self { permission, logger }
    }

    /// Shows a local notification with title and body.
    ///
    /// Without permission this is a silent no-op. Audio failures are
    /// swallowed; a missing sound device is not an error.
    pub async fn show(&self, title: &str, body: &str) {
        if self.permission != NotificationPermission::Granted {
            return;
        }

        println!("{} {}", title.bright_white().on_blue(), body.bright_white());
        self.logger
            .info(&format!("{} {}", title, body), None)
            .await;

        tokio::task::spawn_blocking(|| {
            let _ = crate::beep_with_hz_and_millis(659, 300);
        });
    }

    /// The new-signal alert, naming symbol, side and entry price.
    pub async fn notify_new_signal(&self, symbol: &str, side: CallSide, entry: f64) {
        self.show(
            &format!("New Signal: {}", symbol),
            &format!(
                "{} @ \u{20b9}{}. Tap to view research analysis and targets.",
                side, entry
            ),
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loggers::loggerlocal::LoggerLocalOptions;

    #[tokio::test]
    async fn denied_permission_is_a_silent_noop() {
        let logger = Arc::new(LoggerLocal::new(
            "notify_test".to_string(),
            Some(LoggerLocalOptions {
                use_tty: None,
                use_file: None,
                log_dir: None,
            }),
        ));
        let notifier = SignalNotifier::new(NotificationPermission::Denied, logger);
        // Must return without side effects or panics.
        notifier
            .notify_new_signal("RELIANCE", CallSide::Buy, 2950.4)
            .await;
    }

    #[test]
    fn permission_follows_configuration() {
        assert_eq!(
            request_notification_permission(true),
            NotificationPermission::Granted
        );
        assert_eq!(
            request_notification_permission(false),
            NotificationPermission::Denied
        );
    }
}
