//! Security event logging for authentication flows
//!
//! Provides a structured trail for security-relevant operations like:
//! - Logins and logouts
//! - Session creation, revocation and token refresh
//! - CSRF rejections and back-channel logouts
//!
//! Every identifying field goes through the sanitizer before it is written.

use crate::domain::models::security_event::SecurityEvent;

use super::logger::Logger;
use super::registry;
use super::sanitizer::{
    sanitize_error, sanitize_session_id, sanitize_user_id, sanitize_username, sanitize_value,
};

const COMPONENT: &str = "auth";
const MESSAGE: &str = "security event";
const USER_AGENT_MAX_CHARS: usize = 100;

/// Keys owned by the event itself; details using them are dropped.
const EVENT_FIELDS: [&str; 10] = [
    "component",
    "event",
    "status",
    "user_id",
    "username",
    "session_id",
    "provider",
    "ip_address",
    "user_agent",
    "error",
];

/// Logger for authentication and session events
#[derive(Debug, Clone)]
pub struct SecurityLogger {
    logger: Logger,
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl SecurityLogger {
    /// Security logger on top of the process-wide logger
    pub fn new() -> Self {
        Self::with_logger(registry::logger())
    }

    /// Security logger on top of `logger`
    pub fn with_logger(logger: Logger) -> Self {
        Self {
            logger: logger.with_component(COMPONENT),
        }
    }

    /// Write one security event
    ///
    /// Fields are written in a fixed order: `event`, `status`, the
    /// identifying fields that are set, `error`, then every detail sorted by
    /// key. Details named like one of the event's own fields are skipped.
    pub fn log_event(&self, event: &SecurityEvent) {
        let mut entry = self
            .logger
            .info()
            .str("event", event.event.as_str())
            .str("status", event.status());
        if !entry.enabled() {
            return;
        }

        let optional = [
            ("user_id", sanitize_user_id(&event.user_id)),
            ("username", sanitize_username(&event.username)),
            ("session_id", sanitize_session_id(&event.session_id)),
            ("provider", event.provider.clone()),
            ("ip_address", event.ip_address.clone()),
            (
                "user_agent",
                event.user_agent.chars().take(USER_AGENT_MAX_CHARS).collect(),
            ),
            ("error", sanitize_error(&event.error)),
        ];
        for (key, value) in optional {
            if !value.is_empty() {
                entry = entry.str(key, value);
            }
        }

        for (key, value) in &event.details {
            if EVENT_FIELDS.contains(&key.as_str()) {
                continue;
            }
            entry = entry.str(key.as_str(), sanitize_value(key, value));
        }

        entry.msg(MESSAGE);
    }

    /// Successful login
    pub fn log_login_success(
        &self,
        user_id: &str,
        username: &str,
        provider: &str,
        ip_address: &str,
        user_agent: &str,
    ) {
        self.log_event(
            &SecurityEvent::new("login_success", true)
                .user_id(user_id)
                .username(username)
                .provider(provider)
                .ip_address(ip_address)
                .user_agent(user_agent),
        );
    }

    /// Rejected login
    pub fn log_login_failure(&self, username: &str, provider: &str, ip_address: &str, reason: &str) {
        self.log_event(
            &SecurityEvent::new("login_failure", false)
                .username(username)
                .provider(provider)
                .ip_address(ip_address)
                .error(reason),
        );
    }

    /// Logout of one session
    pub fn log_logout(&self, user_id: &str, session_id: &str, ip_address: &str) {
        self.log_event(
            &SecurityEvent::new("logout", true)
                .user_id(user_id)
                .session_id(session_id)
                .ip_address(ip_address),
        );
    }

    /// Logout of every session of a user
    pub fn log_logout_all(&self, user_id: &str, sessions_revoked: usize) {
        self.log_event(
            &SecurityEvent::new("logout_all", true)
                .user_id(user_id)
                .detail("sessions_revoked", sessions_revoked.to_string()),
        );
    }

    /// Access-token refresh attempt
    pub fn log_token_refresh(&self, user_id: &str, session_id: &str, success: bool) {
        self.log_event(
            &SecurityEvent::new("token_refresh", success)
                .user_id(user_id)
                .session_id(session_id),
        );
    }

    /// New session
    pub fn log_session_created(&self, user_id: &str, session_id: &str, provider: &str) {
        self.log_event(
            &SecurityEvent::new("session_created", true)
                .user_id(user_id)
                .session_id(session_id)
                .provider(provider),
        );
    }

    /// Session revoked by an administrator or policy
    pub fn log_session_revoked(&self, user_id: &str, session_id: &str, reason: &str) {
        self.log_event(
            &SecurityEvent::new("session_revoked", true)
                .user_id(user_id)
                .session_id(session_id)
                .detail("reason", reason),
        );
    }

    /// Request rejected by CSRF validation
    pub fn log_csrf_failure(&self, ip_address: &str, user_agent: &str, path: &str) {
        self.log_event(
            &SecurityEvent::new("csrf_failure", false)
                .ip_address(ip_address)
                .user_agent(user_agent)
                .detail("path", path),
        );
    }

    /// Identity-provider initiated logout
    pub fn log_back_channel_logout(
        &self,
        subject: &str,
        session_id: &str,
        sessions_terminated: usize,
        success: bool,
    ) {
        self.log_event(
            &SecurityEvent::new("back_channel_logout", success)
                .user_id(subject)
                .session_id(session_id)
                .detail("sessions_terminated", sessions_terminated.to_string()),
        );
    }
}

/// Security logger on top of the process-wide logger.
pub fn security_logger() -> SecurityLogger {
    SecurityLogger::new()
}
