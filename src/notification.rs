//! System notifications via freedesktop D-Bus.

use std::collections::HashMap;

use zbus::{Connection, proxy};

/// Low urgency per the freedesktop notification spec; capture results are
/// confirmations, not alerts.
const URGENCY_LOW: u8 = 0;

/// D-Bus interface for freedesktop Notifications.
#[proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    /// Send a notification.
    ///
    /// # Arguments
    /// * `app_name` - Application name
    /// * `replaces_id` - ID of notification to replace (0 for new)
    /// * `app_icon` - Icon name or path
    /// * `summary` - Notification title
    /// * `body` - Notification body text
    /// * `actions` - List of action identifiers and labels
    /// * `hints` - Additional metadata
    /// * `expire_timeout` - Timeout in milliseconds (-1 for default)
    ///
    /// # Returns
    /// Notification ID
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, zbus::zvariant::Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Send a low-urgency notification naming a saved capture.
pub async fn send_notification(summary: &str, body: &str, icon: Option<&str>) -> Result<(), String> {
    let connection = Connection::session()
        .await
        .map_err(|e| format!("Failed to connect to session bus: {}", e))?;

    let proxy = NotificationsProxy::new(&connection)
        .await
        .map_err(|e| format!("Failed to create notifications proxy: {}", e))?;

    let icon = icon.unwrap_or("camera-photo");
    let mut hints = HashMap::new();
    hints.insert("urgency", zbus::zvariant::Value::U8(URGENCY_LOW));

    proxy
        .notify(
            "Capgrab",
            0,
            icon,
            summary,
            body,
            vec![],
            hints,
            3000, // 3 second timeout
        )
        .await
        .map_err(|e| format!("Failed to send notification: {}", e))?;

    Ok(())
}

/// Blocking wrapper for the one-shot CLI: failures are logged, never
/// surfaced, since the notification is a side channel.
pub fn send_notification_blocking(summary: &str, body: &str, icon: Option<&str>) {
    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to build notification runtime: {}", e))
        .and_then(|runtime| runtime.block_on(send_notification(summary, body, icon)));

    if let Err(e) = result {
        log::warn!("Failed to send notification: {}", e);
    }
}
