use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};
use pennywise_core::{Role, permissions};
use pennywise_db::AccountStore;
use pennywise_models::{Account, NewAccount};

/// Creates a privileged account holding every known permission.
pub async fn create_admin(
    store: &dyn AccountStore,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Account> {
    if role < Role::Admin {
        bail!("create-admin only creates admin or super_admin accounts, got {role}");
    }

    let mut new = NewAccount::registration(name, email, password).with_role(role);
    new.permissions = permissions::ALL.iter().map(|p| p.to_string()).collect();

    store
        .create(new)
        .await
        .context("Failed to create admin account")
}

/// Sets the role and replaces the permission set of the account owning `email`.
pub async fn grant(
    store: &dyn AccountStore,
    email: &str,
    role: Role,
    granted: &[String],
) -> Result<Account> {
    if let Some(unknown) = granted.iter().find(|p| !permissions::is_known(p)) {
        bail!(
            "Unknown permission '{unknown}', expected one of: {}",
            permissions::ALL.join(", ")
        );
    }

    let account = store
        .find_by_email(email)
        .await
        .context("Failed to look up account")?
        .with_context(|| format!("No account with email {email}"))?;

    let granted: BTreeSet<String> = granted.iter().cloned().collect();
    store
        .set_access(account.id, role, granted)
        .await
        .context("Failed to update account access")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pennywise_core::CredentialHasher;
    use pennywise_db::InMemoryAccountStore;

    fn store() -> InMemoryAccountStore {
        InMemoryAccountStore::new(CredentialHasher::with_cost(4))
    }

    #[tokio::test]
    async fn test_create_admin() {
        let store = store();
        let admin = create_admin(&store, "Root", "Root@X.com", "secret1", Role::SuperAdmin)
            .await
            .unwrap();

        assert_eq!(admin.email, "root@x.com");
        assert_eq!(admin.role, Role::SuperAdmin);
        assert!(admin.permissions.contains(permissions::ACCOUNTS_MANAGE));
        assert!(store.find_by_credentials("root@x.com", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_create_admin_rejects_user_role() {
        let err = create_admin(&store(), "Root", "root@x.com", "secret1", Role::User)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("admin or super_admin"));
    }

    #[tokio::test]
    async fn test_grant() {
        let store = store();
        store
            .create(NewAccount::registration("Ana", "ana@x.com", "secret1"))
            .await
            .unwrap();

        let updated = grant(
            &store,
            " ANA@x.com",
            Role::Admin,
            &[permissions::ACCOUNTS_READ.to_string()],
        )
        .await
        .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.permissions.len(), 1);
    }

    #[tokio::test]
    async fn test_grant_unknown_email_or_permission() {
        let store = store();
        assert!(grant(&store, "ghost@x.com", Role::Admin, &[]).await.is_err());

        store
            .create(NewAccount::registration("Ana", "ana@x.com", "secret1"))
            .await
            .unwrap();
        let err = grant(&store, "ana@x.com", Role::User, &["root:all".to_string()])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unknown permission"));
    }
}
