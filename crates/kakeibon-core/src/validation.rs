//! # Validation Module
//!
//! Form validation rules shared by the management screens.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form submit handler                                          │
//! │  ├── THIS MODULE: username / password / entity-name rules              │
//! │  └── Message shown inline, save aborted                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Native backend command                                       │
//! │  ├── Duplicate checks (AlreadyExists)                                  │
//! │  └── Database constraints                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Password Rule Priority
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. empty (after trimming) → "Password cannot be empty!"
//! 2. shorter than 16 UTF-16 code units (untrimmed) → "Password must be at least 16 characters long!"
//! 3. confirmation differs → "Passwords do not match!"
//!
//! A short *and* mismatched password therefore reports the length error.
//!
//! ## Usage
//! ```rust
//! use kakeibon_core::validation::{validate_password, validate_user_edit};
//!
//! let result = validate_password("short", "different");
//! assert!(!result.valid);
//! assert_eq!(result.message, "Password must be at least 16 characters long!");
//!
//! // Edit mode: empty password fields mean "keep the current password"
//! assert!(validate_user_edit("bob", "", "", true).valid);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::backend::{Backend, BackendError, BackendErrorKind};
use crate::error::{CredentialError, ValidationError};
use crate::types::{EntityKind, UserRole};
use crate::MIN_PASSWORD_LENGTH;

// =============================================================================
// Validation Result
// =============================================================================

/// Outcome of a form rule, in the shape the forms consume.
///
/// `message` is empty iff `valid` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
}

impl ValidationResult {
    /// A passing result.
    pub fn ok() -> Self {
        ValidationResult {
            valid: true,
            message: String::new(),
        }
    }

    /// A failing result carrying the message to display.
    pub fn invalid(message: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            message: message.into(),
        }
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for ValidationResult {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => ValidationResult::ok(),
            Err(err) => ValidationResult::invalid(err.to_string()),
        }
    }
}

// =============================================================================
// Password Policy
// =============================================================================

/// Credential rules with a configurable minimum password length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum length in UTF-16 code units.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        PasswordPolicy {
            min_length: MIN_PASSWORD_LENGTH,
        }
    }
}

impl PasswordPolicy {
    pub const fn new(min_length: usize) -> Self {
        PasswordPolicy { min_length }
    }

    /// Checks a password and its confirmation.
    ///
    /// Emptiness is judged on the trimmed value; length and equality use the
    /// raw value, so surrounding whitespace is never stripped from a real
    /// password.
    pub fn check_password(
        &self,
        password: Option<&str>,
        password_confirm: Option<&str>,
    ) -> Result<(), CredentialError> {
        let password = match password {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Err(CredentialError::PasswordEmpty),
        };

        // Length as the form input counts it: UTF-16 code units
        if password.encode_utf16().count() < self.min_length {
            return Err(CredentialError::PasswordTooShort {
                min: self.min_length,
            });
        }

        if password_confirm != Some(password) {
            return Err(CredentialError::PasswordMismatch);
        }

        Ok(())
    }

    /// Checks a new user's credentials: username first, then password.
    pub fn check_user_addition(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        password_confirm: Option<&str>,
    ) -> Result<(), CredentialError> {
        check_username(username)?;
        self.check_password(password, password_confirm)
    }

    /// Checks an add-or-edit user form.
    ///
    /// ## Mode Semantics
    /// ```text
    /// ┌──────────────┬──────────────────────────┬──────────────────────────┐
    /// │              │ both password fields     │ any password field       │
    /// │              │ empty / whitespace       │ filled                   │
    /// ├──────────────┼──────────────────────────┼──────────────────────────┤
    /// │ edit mode    │ valid (keep password)    │ full password rules      │
    /// │ add mode     │ "Password cannot be      │ full password rules      │
    /// │              │  empty!"                 │                          │
    /// └──────────────┴──────────────────────────┴──────────────────────────┘
    /// ```
    /// The username rule applies in both modes.
    pub fn check_user_edit(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        password_confirm: Option<&str>,
        is_edit_mode: bool,
    ) -> Result<(), CredentialError> {
        check_username(username)?;

        if is_edit_mode && is_blank(password) && is_blank(password_confirm) {
            return Ok(());
        }

        self.check_password(password, password_confirm)
    }
}

/// Checks that a username is present and not just whitespace.
///
/// Any other content is accepted: unicode, symbols, e-mail addresses.
pub fn check_username(username: Option<&str>) -> Result<(), CredentialError> {
    if is_blank(username) {
        return Err(CredentialError::UsernameEmpty);
    }
    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

// =============================================================================
// Form-Facing Validators
// =============================================================================

/// Validates a password and its confirmation with the default policy.
pub fn validate_password(password: &str, password_confirm: &str) -> ValidationResult {
    PasswordPolicy::default()
        .check_password(Some(password), Some(password_confirm))
        .into()
}

/// Validates the add-user form with the default policy.
///
/// ```rust
/// use kakeibon_core::validation::validate_user_addition;
///
/// let result = validate_user_addition("   ", "1234567890123456", "1234567890123456");
/// assert_eq!(result.message, "Username cannot be empty!");
/// ```
pub fn validate_user_addition(username: &str, password: &str, password_confirm: &str) -> ValidationResult {
    PasswordPolicy::default()
        .check_user_addition(Some(username), Some(password), Some(password_confirm))
        .into()
}

/// Validates the add-or-edit user form with the default policy.
pub fn validate_user_edit(
    username: &str,
    password: &str,
    password_confirm: &str,
    is_edit_mode: bool,
) -> ValidationResult {
    PasswordPolicy::default()
        .check_user_edit(
            Some(username),
            Some(password),
            Some(password_confirm),
            is_edit_mode,
        )
        .into()
}

// =============================================================================
// User Edit Input
// =============================================================================

/// Raw user form values as the screen sends them.
///
/// Absent fields (`null` from the frontend) are `None` and are treated as
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserEditInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
    #[serde(default)]
    pub is_edit_mode: bool,
}

impl UserEditInput {
    /// Validates the form values under `policy`.
    pub fn validate(&self, policy: &PasswordPolicy) -> ValidationResult {
        policy
            .check_user_edit(
                self.username.as_deref(),
                self.password.as_deref(),
                self.password_confirm.as_deref(),
                self.is_edit_mode,
            )
            .into()
    }
}

// =============================================================================
// User Update
// =============================================================================

/// Arguments of `update_admin_user_info` / `update_general_user_info`.
///
/// A `None` field means "leave unchanged".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub user_id: i64,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UserUpdate {
    /// Builds the update for an edited user from the form values.
    ///
    /// The username is sent only when it differs from `current_name`, and
    /// the password only when one was typed.
    ///
    /// ```rust
    /// use kakeibon_core::validation::UserUpdate;
    ///
    /// let update = UserUpdate::new(7, "alice", " alice ", "");
    /// assert_eq!(update.username, None);
    /// assert_eq!(update.password, None);
    /// ```
    pub fn new(user_id: i64, current_name: &str, username: &str, password: &str) -> Self {
        let username = username.trim();
        UserUpdate {
            user_id,
            username: (username != current_name).then(|| username.to_string()),
            password: (!password.trim().is_empty()).then(|| password.to_string()),
        }
    }

    /// Sends the update with the command for the user's role.
    pub fn send<B: Backend + ?Sized>(&self, backend: &B, role: UserRole) -> Result<(), BackendError> {
        let args = serde_json::to_value(self).map_err(|err| {
            BackendError::new(BackendErrorKind::Internal, err.to_string())
        })?;
        backend.invoke(role.update_command(), args)?;
        Ok(())
    }
}

// =============================================================================
// Entity Names
// =============================================================================

/// Validates the identifying field of a master-data entity.
///
/// ## Rules
/// - Must not be empty after trimming
///
/// ## Returns
/// The trimmed value, ready to send to the backend.
///
/// ## Example
/// ```rust
/// use kakeibon_core::validation::validate_entity_name;
/// use kakeibon_core::EntityKind;
///
/// assert_eq!(validate_entity_name(EntityKind::Shop, "  Corner Mart ").unwrap(), "Corner Mart");
/// assert_eq!(
///     validate_entity_name(EntityKind::Account, " ").unwrap_err().to_string(),
///     "Account code cannot be empty"
/// );
/// ```
pub fn validate_entity_name(kind: EntityKind, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: kind.field_label().to_string(),
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::FakeBackend;
    use serde_json::json;

    const VALID: &str = "1234567890123456";

    #[test]
    fn test_password_empty() {
        for password in ["", "   ", "\t\t", "\n"] {
            let result = validate_password(password, password);
            assert!(!result.valid);
            assert_eq!(result.message, "Password cannot be empty!");
        }
    }

    #[test]
    fn test_password_length_boundary() {
        assert_eq!(validate_password(VALID, VALID), ValidationResult::ok());

        let fifteen = "123456789012345";
        let result = validate_password(fifteen, fifteen);
        assert!(!result.valid);
        assert_eq!(result.message, "Password must be at least 16 characters long!");
    }

    #[test]
    fn test_password_length_precedes_mismatch() {
        let result = validate_password("short", "different");
        assert_eq!(result.message, "Password must be at least 16 characters long!");
    }

    #[test]
    fn test_password_mismatch() {
        let result = validate_password(VALID, "6543210987654321");
        assert_eq!(result.message, "Passwords do not match!");

        // Exact comparison: case and whitespace matter
        let upper = "ABCDEFGHIJKLMNOP";
        assert!(!validate_password(upper, &upper.to_lowercase()).valid);
        assert!(!validate_password(VALID, &format!("{VALID} ")).valid);
    }

    #[test]
    fn test_password_is_not_trimmed_for_length() {
        // 14 visible characters plus a space on each side = 16 code units
        let padded = " 12345678901234 ";
        assert!(validate_password(padded, padded).valid);
        assert!(!validate_password(padded, padded.trim()).valid);
    }

    #[test]
    fn test_password_length_counts_utf16_units() {
        // Each emoji is two UTF-16 code units
        let emoji = "😀😀😀😀😀😀😀😀";
        assert_eq!(emoji.chars().count(), 8);
        assert!(validate_password(emoji, emoji).valid);

        let japanese = "パスワードパスワードパスワード"; // 15 code units
        assert!(!validate_password(japanese, japanese).valid);
    }

    #[test]
    fn test_user_addition_username_rules() {
        for username in ["", "   "] {
            let result = validate_user_addition(username, VALID, VALID);
            assert_eq!(
                result,
                ValidationResult::invalid("Username cannot be empty!")
            );
        }

        for username in ["bob", "ユーザー名", "user@#$%", "bob@example.com"] {
            assert!(validate_user_addition(username, VALID, VALID).valid, "{username}");
        }
    }

    #[test]
    fn test_user_addition_absent_username() {
        let err = PasswordPolicy::default()
            .check_user_addition(None, Some(VALID), Some(VALID))
            .unwrap_err();
        assert_eq!(err, CredentialError::UsernameEmpty);
    }

    #[test]
    fn test_user_addition_delegates_to_password() {
        let result = validate_user_addition("bob", "short", "short");
        assert_eq!(result.message, "Password must be at least 16 characters long!");
    }

    #[test]
    fn test_user_edit_empty_password_means_unchanged() {
        assert!(validate_user_edit("bob", "", "", true).valid);
        assert!(validate_user_edit("bob", "  ", " ", true).valid);
    }

    #[test]
    fn test_user_edit_add_mode_requires_password() {
        let result = validate_user_edit("bob", "", "", false);
        assert!(!result.valid);
        assert_eq!(result.message, "Password cannot be empty!");
    }

    #[test]
    fn test_user_edit_partial_password_is_checked() {
        assert_eq!(
            validate_user_edit("bob", VALID, "", true).message,
            "Passwords do not match!"
        );
        assert_eq!(
            validate_user_edit("bob", "", VALID, true).message,
            "Password cannot be empty!"
        );
        assert_eq!(
            validate_user_edit("bob", "short", "short", true).message,
            "Password must be at least 16 characters long!"
        );
        assert!(validate_user_edit("bob", VALID, VALID, true).valid);
    }

    #[test]
    fn test_user_edit_username_checked_in_both_modes() {
        for is_edit_mode in [true, false] {
            let result = validate_user_edit("", VALID, VALID, is_edit_mode);
            assert_eq!(result.message, "Username cannot be empty!");
        }
    }

    #[test]
    fn test_user_edit_input_from_frontend_json() {
        let input: UserEditInput = serde_json::from_value(serde_json::json!({
            "username": null,
            "password": "",
            "passwordConfirm": "",
            "isEditMode": true
        }))
        .unwrap();
        let result = input.validate(&PasswordPolicy::default());
        assert_eq!(result.message, "Username cannot be empty!");

        let input = UserEditInput {
            username: Some("bob".to_string()),
            is_edit_mode: true,
            ..Default::default()
        };
        assert!(input.validate(&PasswordPolicy::default()).valid);
    }

    #[test]
    fn test_custom_policy_length() {
        let policy = PasswordPolicy::new(8);
        assert!(policy.check_password(Some("12345678"), Some("12345678")).is_ok());
        assert_eq!(
            policy.check_password(Some("1234567"), Some("1234567")),
            Err(CredentialError::PasswordTooShort { min: 8 })
        );
    }

    #[test]
    fn test_validation_result_invariant() {
        let ok: ValidationResult = Ok::<(), CredentialError>(()).into();
        assert!(ok.valid && ok.message.is_empty());

        let err: ValidationResult = Err::<(), _>(CredentialError::PasswordMismatch).into();
        assert!(!err.valid && !err.message.is_empty());
    }

    #[test]
    fn test_entity_names() {
        let cases = [
            (EntityKind::Account, "Account code cannot be empty"),
            (EntityKind::Category, "Category name cannot be empty"),
            (EntityKind::Shop, "Shop name cannot be empty"),
            (EntityKind::Manufacturer, "Manufacturer name cannot be empty"),
            (EntityKind::Product, "Product name cannot be empty"),
        ];
        for (kind, message) in cases {
            assert_eq!(validate_entity_name(kind, "  ").unwrap_err().to_string(), message);
        }

        assert_eq!(
            validate_entity_name(EntityKind::Product, " 牛乳 ").unwrap(),
            "牛乳"
        );
    }

    #[test]
    fn test_user_update_sends_only_changes() {
        let unchanged = UserUpdate::new(3, "bob", "bob", "");
        assert_eq!(unchanged.username, None);
        assert_eq!(unchanged.password, None);

        let renamed = UserUpdate::new(3, "bob", "  robert ", "1234567890123456");
        assert_eq!(renamed.username.as_deref(), Some("robert"));
        assert_eq!(renamed.password.as_deref(), Some("1234567890123456"));
    }

    #[test]
    fn test_user_update_blank_password_is_kept() {
        let update = UserUpdate::new(3, "bob", "bob", "   ");
        assert_eq!(update.password, None);
    }

    #[test]
    fn test_user_update_routes_by_role() {
        let backend = FakeBackend::default()
            .respond("update_admin_user_info", Ok(json!(null)))
            .respond("update_general_user_info", Ok(json!(null)));

        UserUpdate::new(1, "admin", "root", "").send(&backend, UserRole::Admin).unwrap();
        UserUpdate::new(2, "bob", "bob", VALID).send(&backend, UserRole::User).unwrap();

        assert_eq!(
            backend.calls_to("update_admin_user_info"),
            vec![json!({ "userId": 1, "username": "root", "password": null })]
        );
        assert_eq!(
            backend.calls_to("update_general_user_info"),
            vec![json!({ "userId": 2, "username": null, "password": VALID })]
        );
    }
}
