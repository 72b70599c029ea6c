//! Expiry notifications.

use crate::config::NotificationConfig;
use anyhow::Result;
use notify_rust::{Notification, Timeout};

/// Something that can tell the user the current phase has run out.
pub trait Notifier: Send {
    fn notify(&self) -> Result<()>;
}

/// Desktop notification through the platform notification service.
pub struct DesktopNotifier {
    config: NotificationConfig,
}

impl DesktopNotifier {
    pub fn new(config: NotificationConfig) -> Self {
        Self { config }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self) -> Result<()> {
        let mut notification = Notification::new();
        notification
            .summary(&self.config.title)
            .body(&self.config.body)
            .appname("gojeh");
        if self.config.persistent {
            notification.timeout(Timeout::Never);
        }
        #[cfg(all(unix, not(target_os = "macos")))]
        notification.urgency(notify_rust::Urgency::Critical);

        notification.show()?;
        Ok(())
    }
}
