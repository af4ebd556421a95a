use regex::Regex;
use std::sync::LazyLock;

use super::ApiError;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap_or_else(|e| panic!("username regex: {e}"))
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap_or_else(|e| panic!("email regex: {e}"))
});

/// Usernames are 3-50 characters of `[a-zA-Z0-9_-]` and may not contain
/// "admin" in any casing; the reserved word is blocked as a substring, so
/// "administrator" and "my_admin" both fail.
pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    if username.len() < 3 || username.len() > 50 {
        return Err(ApiError::validation(
            "Username must be between 3 and 50 characters",
        ));
    }

    if !USERNAME_RE.is_match(username) {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, hyphens, and underscores",
        ));
    }

    if username.to_lowercase().contains("admin") {
        return Err(ApiError::validation("Username cannot contain 'admin'"));
    }

    Ok(username)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    if email.is_empty() || email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err(ApiError::validation("Invalid email address"));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(password)
}

pub fn validate_full_name(full_name: &str) -> Result<&str, ApiError> {
    if full_name.len() > 100 {
        return Err(ApiError::validation(
            "Full name must be 100 characters or less",
        ));
    }
    Ok(full_name)
}

pub fn validate_task_title(title: &str) -> Result<&str, ApiError> {
    if title.is_empty() || title.len() > 200 {
        return Err(ApiError::validation(
            "Task title must be between 1 and 200 characters",
        ));
    }
    Ok(title)
}

pub fn validate_category_name(name: &str) -> Result<&str, ApiError> {
    if name.is_empty() || name.len() > 100 {
        return Err(ApiError::validation(
            "Category name must be between 1 and 100 characters",
        ));
    }
    Ok(name)
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MAX_LIMIT: u64 = 1000;

    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("bob-2024").is_ok());
        assert!(validate_username("under_score").is_ok());

        // Too short / too long
        assert!(validate_username("ab").is_err());
        assert!(validate_username("a".repeat(51).as_str()).is_err());

        // Bad characters
        assert!(validate_username("has space").is_err());
        assert!(validate_username("dot.name").is_err());

        // Reserved word, any casing, anywhere in the name
        assert!(validate_username("admin").is_err());
        assert!(validate_username("administrator").is_err());
        assert!(validate_username("my_Admin").is_err());
        assert!(validate_username("ADMIN2").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+c@sub.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
        assert!(validate_email("two@@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter22").is_ok());
        assert!(validate_password("hunter2").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Alice Example").is_ok());
        assert!(validate_full_name("").is_ok());
        assert!(validate_full_name("x".repeat(101).as_str()).is_err());
    }

    #[test]
    fn test_validate_task_title() {
        assert!(validate_task_title("Buy milk").is_ok());
        assert!(validate_task_title("").is_err());
        assert!(validate_task_title("x".repeat(201).as_str()).is_err());
        assert!(validate_task_title("x".repeat(200).as_str()).is_ok());
    }

    #[test]
    fn test_validate_category_name() {
        assert!(validate_category_name("Work").is_ok());
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name("x".repeat(101).as_str()).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(1000).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(1001).is_err());
    }
}
