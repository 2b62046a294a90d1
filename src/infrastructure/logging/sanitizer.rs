//! Masking of sensitive values before they reach a log sink.
//!
//! All functions are total and count characters, not bytes, so multibyte
//! input is never split inside a code point.

const MASK: &str = "***";
const ERROR_MAX_CHARS: usize = 200;

/// Error messages mentioning any of these are replaced wholesale.
const SENSITIVE_ERROR_KEYWORDS: [&str; 7] = [
    "password",
    "secret",
    "token",
    "key",
    "bearer",
    "authorization",
    "cookie",
];

/// Keys whose values are masked like tokens.
const SENSITIVE_KEYS: [&str; 14] = [
    "access_token",
    "refresh_token",
    "id_token",
    "token",
    "password",
    "secret",
    "api_key",
    "apikey",
    "authorization",
    "bearer",
    "cookie",
    "session",
    "session_id",
    "sessionid",
];

fn head(value: &str, n: usize) -> String {
    value.chars().take(n).collect()
}

fn tail(value: &str, n: usize) -> String {
    let len = value.chars().count();
    value.chars().skip(len.saturating_sub(n)).collect()
}

/// `abcd...wxyz` for values longer than `threshold` characters, `***` otherwise.
fn mask_middle(value: &str, threshold: usize) -> String {
    if value.is_empty() {
        return String::new();
    }
    if value.chars().count() <= threshold {
        return MASK.to_string();
    }
    format!("{}...{}", head(value, 4), tail(value, 4))
}

/// Mask a bearer/access/refresh token.
pub fn sanitize_token(token: &str) -> String {
    mask_middle(token, 12)
}

/// Mask a session identifier.
pub fn sanitize_session_id(session_id: &str) -> String {
    mask_middle(session_id, 12)
}

/// Mask a user identifier.
pub fn sanitize_user_id(user_id: &str) -> String {
    mask_middle(user_id, 8)
}

/// Keep the first two characters of a username.
pub fn sanitize_username(username: &str) -> String {
    if username.is_empty() {
        return String::new();
    }
    if username.chars().count() <= 2 {
        return MASK.to_string();
    }
    format!("{}{MASK}", head(username, 2))
}

/// Keep the domain and the first two characters of the local part.
///
/// The address is split at its last `@`.
pub fn sanitize_email(email: &str) -> String {
    if email.is_empty() {
        return String::new();
    }
    let Some((local, domain)) = email.rsplit_once('@') else {
        return MASK.to_string();
    };
    if local.chars().count() <= 2 {
        return format!("{MASK}@{domain}");
    }
    format!("{}{MASK}@{domain}", head(local, 2))
}

/// Replace credential-bearing error messages and truncate long ones.
pub fn sanitize_error(message: &str) -> String {
    if message.is_empty() {
        return String::new();
    }

    let lower = message.to_lowercase();
    if SENSITIVE_ERROR_KEYWORDS
        .iter()
        .any(|keyword| lower.contains(keyword))
    {
        return "authentication error".to_string();
    }

    if message.chars().count() > ERROR_MAX_CHARS {
        return format!("{}...", head(message, ERROR_MAX_CHARS));
    }
    message.to_string()
}

/// Mask `value` according to what `key` suggests it holds.
///
/// Credential-like keys are masked as tokens, email-looking values as
/// emails, and everything else passes through.
pub fn sanitize_value(key: &str, value: &str) -> String {
    let key = key.to_lowercase();
    if SENSITIVE_KEYS.contains(&key.as_str()) {
        return sanitize_token(value);
    }
    if value.contains('@') && value.contains('.') {
        return sanitize_email(value);
    }
    value.to_string()
}
