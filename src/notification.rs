//! Warning sink for recoverable parse and export issues.
//!
//! Tolerant loading never aborts on an entity-scoped problem: unknown entity
//! types, malformed records, repaired attribute values and suppressed export
//! attributes are collected as `Notification` items. Every notification is
//! also emitted as a `tracing` event, so callers with a subscriber installed
//! get structured logs without inspecting the collection.

use std::fmt;

use crate::error::DxfError;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// Section the reader skips, e.g. TABLES or OBJECTS
    NotImplemented,
    /// Entity type without schema, or data the target version cannot hold
    NotSupported,
    /// Repaired value, duplicate handle or app data group
    Warning,
    /// Malformed tag or record that was dropped or kept as raw tag
    Error,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImplemented => write!(f, "NotImplemented"),
            Self::NotSupported => write!(f, "NotSupported"),
            Self::Warning => write!(f, "Warning"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// A single notification produced during reading or writing.
#[derive(Debug, Clone)]
pub struct Notification {
    /// The severity / category.
    pub notification_type: NotificationType,
    /// A human-readable description of the issue.
    pub message: String,
}

impl Notification {
    /// Create a new notification.
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Collects notifications during a read/write operation.
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification.
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        let message = message.into();
        match notification_type {
            NotificationType::Error | NotificationType::Warning => {
                tracing::warn!(kind = %notification_type, "{}", message);
            }
            NotificationType::NotImplemented | NotificationType::NotSupported => {
                tracing::debug!(kind = %notification_type, "{}", message);
            }
        }
        self.items.push(Notification::new(notification_type, message));
    }

    /// Record a recovered error.
    pub fn recovered(&mut self, error: &DxfError) {
        let nt = match error {
            DxfError::UnknownEntityType(_) | DxfError::UnsupportedVersion(_) => {
                NotificationType::NotSupported
            }
            DxfError::InvalidAttributeForVersion { .. } => NotificationType::Warning,
            _ => NotificationType::Error,
        };
        self.notify(nt, error.to_string());
    }

    /// Move all notifications of `other` to the end of this collection.
    pub fn append(&mut self, other: NotificationCollection) {
        self.items.extend(other.items);
    }

    /// Check if there are any notifications.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type.
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items.iter().filter(|n| n.notification_type == nt).collect()
    }

    /// Check whether any notification of the given type exists.
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }

    /// Consume the collection into a `Vec`.
    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl IntoIterator for NotificationCollection {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_creation() {
        let n = Notification::new(NotificationType::Warning, "owner handle missing");
        assert_eq!(n.notification_type, NotificationType::Warning);
        assert_eq!(n.message, "owner handle missing");
    }

    #[test]
    fn test_collection_basics() {
        let mut c = NotificationCollection::new();
        assert!(c.is_empty());

        c.notify(NotificationType::Warning, "w1");
        c.notify(NotificationType::Error, "e1");
        c.notify(NotificationType::Warning, "w2");

        assert_eq!(c.len(), 3);
        assert_eq!(c.of_type(NotificationType::Warning).len(), 2);
        assert!(c.has_type(NotificationType::Error));
        assert!(!c.has_type(NotificationType::NotImplemented));
    }

    #[test]
    fn test_display() {
        let n = Notification::new(NotificationType::NotSupported, "ACAD_PROXY_ENTITY");
        assert_eq!(format!("{}", n), "[NotSupported] ACAD_PROXY_ENTITY");
    }

    #[test]
    fn test_recovered_error_mapping() {
        let mut c = NotificationCollection::new();
        c.recovered(&DxfError::UnknownEntityType("HELIX".into()));
        c.recovered(&DxfError::SchemaViolation("second embedded object".into()));
        assert!(c.has_type(NotificationType::NotSupported));
        assert!(c.has_type(NotificationType::Error));

        let mut other = NotificationCollection::new();
        other.notify(NotificationType::Warning, "w");
        c.append(other);
        assert_eq!(c.len(), 3);
    }
}
