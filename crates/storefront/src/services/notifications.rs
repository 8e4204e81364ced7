//! Transient notifications shown as toasts.

/// Messages collected while handling one request.
///
/// The buy handler renders them into the toast fragment; the browser
/// removes each toast after the configured duration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notifications {
    messages: Vec<String>,
}

impl Notifications {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Queue a message. Fire-and-forget.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}
