//! Fire-and-forget notifications to the human player of a world.

use chrono::{DateTime, Utc};
use contrail_types::{
    Notification, NotificationCategory, NotificationId, NotificationPriority, WorldId,
};
use tracing::{debug, warn};

use crate::store::WorldStore;

/// Notification content before it is stamped and stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// What the notification is about.
    pub category: NotificationCategory,
    /// Icon name understood by the presentation layer.
    pub icon: &'static str,
    /// Urgency.
    pub priority: NotificationPriority,
    /// Optional deep link.
    pub link: Option<String>,
}

/// Store a notification. Failures are logged and swallowed.
pub fn notify(
    store: &mut dyn WorldStore,
    world_id: WorldId,
    draft: NotificationDraft,
    created_at: DateTime<Utc>,
) {
    let notification = Notification {
        id: NotificationId::new(),
        world_id,
        title: draft.title,
        message: draft.message,
        category: draft.category,
        icon: draft.icon.to_owned(),
        priority: draft.priority,
        link: draft.link,
        created_at,
    };
    let title = notification.title.clone();
    match store.push_notification(notification) {
        Ok(()) => debug!(world = %world_id, title = %title, "Notification sent"),
        Err(e) => warn!(world = %world_id, error = %e, "Failed to store notification"),
    }
}
