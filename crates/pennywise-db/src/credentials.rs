//! Input rules and hashing shared by every store implementation.
//!
//! bcrypt is deliberately slow, so hashing and verification run on Tokio's
//! blocking pool instead of the request-serving threads.

use pennywise_core::serde::normalize_email;
use pennywise_core::{CredentialHasher, FieldError};
use pennywise_models::{Account, MIN_PASSWORD_LENGTH, NewAccount, ProfileUpdate};
use tokio::task::spawn_blocking;
use validator::ValidateEmail;

use crate::error::StoreError;

/// Verified against when the email is unknown, so both failure paths cost one bcrypt run.
const DUMMY_PASSWORD: &str = "pennywise-dummy-password";

pub async fn hash_password(hasher: CredentialHasher, password: &str) -> Result<String, StoreError> {
    let password = password.to_owned();
    Ok(spawn_blocking(move || hasher.hash(&password)).await??)
}

pub async fn verify_password(
    hasher: CredentialHasher,
    password: &str,
    hash: &str,
) -> Result<bool, StoreError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    Ok(spawn_blocking(move || hasher.verify(&password, &hash)).await??)
}

/// Hash used to equalise timing for unknown emails. `None` if hashing failed.
pub fn dummy_hash(hasher: &CredentialHasher) -> Option<String> {
    hasher.hash(DUMMY_PASSWORD).ok()
}

/// Resolves a login attempt against the looked-up account, if any.
///
/// Unknown email and wrong password both end in [`StoreError::InvalidCredentials`].
pub async fn check_credentials(
    hasher: CredentialHasher,
    dummy_hash: Option<&str>,
    found: Option<Account>,
    password: &str,
) -> Result<Account, StoreError> {
    let Some(account) = found else {
        if let Some(hash) = dummy_hash {
            let _ = verify_password(hasher, password, hash).await;
        }
        return Err(StoreError::InvalidCredentials);
    };

    if verify_password(hasher, password, &account.password_hash).await? {
        Ok(account)
    } else {
        Err(StoreError::InvalidCredentials)
    }
}

fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !email.validate_email() {
        errors.push(FieldError::new("email", "Invalid email"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), StoreError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation(errors))
    }
}

/// Normalises and validates a new account before anything is hashed or stored.
pub fn prepare_new_account(mut new: NewAccount) -> Result<NewAccount, StoreError> {
    new.name = new.name.trim().to_string();
    new.email = normalize_email(&new.email);

    let mut errors = Vec::new();
    check_name(&new.name, &mut errors);
    check_email(&new.email, &mut errors);
    check_password(&new.password, &mut errors);
    finish(errors)?;

    Ok(new)
}

pub fn prepare_profile_update(mut update: ProfileUpdate) -> Result<ProfileUpdate, StoreError> {
    update.name = update.name.map(|name| name.trim().to_string());
    update.email = update.email.map(|email| normalize_email(&email));

    let mut errors = Vec::new();
    if let Some(name) = &update.name {
        check_name(name, &mut errors);
    }
    if let Some(email) = &update.email {
        check_email(email, &mut errors);
    }
    finish(errors)?;

    Ok(update)
}

pub fn validate_password(password: &str) -> Result<(), StoreError> {
    let mut errors = Vec::new();
    check_password(password, &mut errors);
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: StoreError) -> Vec<String> {
        match err {
            StoreError::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_prepare_new_account_normalizes() {
        let new = prepare_new_account(NewAccount::registration(" Ana ", " Ana@X.com ", "secret1"))
            .unwrap();
        assert_eq!(new.name, "Ana");
        assert_eq!(new.email, "ana@x.com");
    }

    #[test]
    fn test_prepare_new_account_collects_all_errors() {
        let err = prepare_new_account(NewAccount::registration("  ", "nope", "12345")).unwrap_err();
        assert_eq!(fields(err), vec!["name", "email", "password"]);
    }

    #[test]
    fn test_password_minimum_is_in_characters() {
        assert!(validate_password("ñññññ").is_err());
        assert!(validate_password("ññññññ").is_ok());
    }

    #[test]
    fn test_profile_update_only_checks_present_fields() {
        let update = prepare_profile_update(ProfileUpdate {
            name: None,
            email: Some(" New@Mail.com".to_string()),
        })
        .unwrap();
        assert_eq!(update.email.as_deref(), Some("new@mail.com"));

        let err = prepare_profile_update(ProfileUpdate {
            name: Some("   ".to_string()),
            email: None,
        })
        .unwrap_err();
        assert_eq!(fields(err), vec!["name"]);
    }

    #[test]
    fn test_email_rule_matches_request_validation() {
        let rejected = [
            "root@.",
            "root@x..com",
            "ro\"ot@-x-",
            "root@x.com.",
            "a b@c.com",
            "a@b@c",
        ];
        for email in rejected {
            let err = prepare_new_account(NewAccount::registration("Root", email, "secret1"))
                .unwrap_err();
            assert_eq!(fields(err), vec!["email"], "{email}");
        }
        assert!(
            prepare_new_account(NewAccount::registration("Root", "root@x.com", "secret1")).is_ok()
        );
    }
}
