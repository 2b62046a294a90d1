use std::collections::BTreeMap;

/// Security-relevant occurrence to be written by the `auth` component.
///
/// Built per call and consumed immediately by
/// [`SecurityLogger::log_event`](crate::SecurityLogger::log_event); every
/// identity-bearing field is masked before it reaches a sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityEvent {
    /// Event name, e.g. `login_success`
    pub event: String,
    /// Account identifier; masked on output
    pub user_id: String,
    /// Login name; masked on output
    pub username: String,
    /// Session identifier; masked on output
    pub session_id: String,
    /// Identity provider name
    pub provider: String,
    /// Client address
    pub ip_address: String,
    /// Client user agent; truncated on output
    pub user_agent: String,
    /// Whether the operation succeeded
    pub success: bool,
    /// Failure description; passed through the error sanitizer
    pub error: String,
    /// Extra key/value pairs, each sanitized by key
    pub details: BTreeMap<String, String>,
}

impl SecurityEvent {
    /// Start an event with the given name and outcome.
    pub fn new(event: impl Into<String>, success: bool) -> Self {
        Self {
            event: event.into(),
            success,
            ..Self::default()
        }
    }

    /// Set the account identifier.
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Set the login name.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the session identifier.
    #[must_use]
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    /// Set the identity provider.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Set the client address.
    #[must_use]
    pub fn ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = ip_address.into();
        self
    }

    /// Set the client user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the failure description.
    #[must_use]
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    /// Attach one detail entry.
    #[must_use]
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// `"success"` or `"failed"`.
    pub const fn status(&self) -> &'static str {
        if self.success {
            "success"
        } else {
            "failed"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let event = SecurityEvent::new("logout", true)
            .user_id("user-1")
            .session_id("sess-1")
            .detail("reason", "idle");

        assert_eq!(event.event, "logout");
        assert_eq!(event.user_id, "user-1");
        assert_eq!(event.session_id, "sess-1");
        assert_eq!(event.details.get("reason").map(String::as_str), Some("idle"));
        assert!(event.username.is_empty());
    }

    #[test]
    fn test_status() {
        assert_eq!(SecurityEvent::new("x", true).status(), "success");
        assert_eq!(SecurityEvent::new("x", false).status(), "failed");
    }
}
