/// How prominently a notification is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Default,
    Destructive,
}

/// A transient user-facing message (a toast).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    pub fn validation_failed() -> Self {
        Self::destructive(
            "Validation Error",
            "Please fill in all required fields correctly.",
        )
    }

    pub fn image_required() -> Self {
        Self::destructive("Image Required", "Please upload an image for your review.")
    }
}

/// Notifications waiting to be shown, oldest first.
#[derive(Clone, Debug, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
}

impl NotificationQueue {
    pub fn push(&mut self, n: Notification) {
        match n.severity {
            Severity::Destructive => {
                tracing::warn!(title = %n.title, description = %n.description, "notification")
            }
            Severity::Default => {
                tracing::info!(title = %n.title, description = %n.description, "notification")
            }
        }
        self.items.push(n);
    }

    pub fn pending(&self) -> &[Notification] {
        &self.items
    }

    /// Hand every pending notification to the display surface.
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/notify.rs"]
mod tests;
