//! Login form helpers shared by shells.
//!
//! Input is validated before any request so empty submissions never reach
//! the backend; the submit trigger should stay disabled while
//! `AuthGateway::is_login_pending` is true.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

pub const MISSING_USERNAME: &str = "Enter a username.";
pub const MISSING_PASSWORD: &str = "Enter a password.";

/// Validated credentials ready for `AuthGateway::login`.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Trim the username and require both fields. The password is kept verbatim.
pub fn validate_login_input(username: &str, password: &str) -> Result<LoginInput, &'static str> {
    let username = username.trim();
    if username.is_empty() {
        return Err(MISSING_USERNAME);
    }
    if password.is_empty() {
        return Err(MISSING_PASSWORD);
    }
    Ok(LoginInput { username: username.to_owned(), password: password.to_owned() })
}
