use pennywise_core::{AppError, FieldError, permissions};
use pennywise_db::AccountStore;
use pennywise_models::{Account, AccountPublicView, UpdateAccessRequest};
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct AdminService;

impl AdminService {
    pub async fn get_account(
        accounts: &dyn AccountStore,
        id: Uuid,
    ) -> Result<AccountPublicView, AppError> {
        Ok(Self::find_account(accounts, id).await?.public_view())
    }

    async fn find_account(accounts: &dyn AccountStore, id: Uuid) -> Result<Account, AppError> {
        accounts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Account with id {id} not found")))
    }

    /// Sets another account's role and permissions.
    ///
    /// A caller cannot touch an account that outranks them, grant a role
    /// above their own, or grant a permission the API does not know.
    #[instrument(skip_all, fields(caller = %caller.id, target = %id, role = %dto.role))]
    pub async fn update_access(
        accounts: &dyn AccountStore,
        caller: &Account,
        id: Uuid,
        dto: UpdateAccessRequest,
    ) -> Result<AccountPublicView, AppError> {
        let target = Self::find_account(accounts, id).await?;

        if target.role > caller.role {
            warn!(target_role = %target.role, "Caller is outranked by the target account");
            return Err(AppError::forbidden(
                "Access denied. Cannot change an account above your own role",
            ));
        }

        if dto.role > caller.role {
            return Err(AppError::forbidden(
                "Access denied. Cannot grant a role above your own",
            ));
        }

        let unknown: Vec<FieldError> = dto
            .permissions
            .iter()
            .filter(|p| !permissions::is_known(p))
            .map(|p| FieldError::new("permissions", format!("Unknown permission: {p}")))
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::validation(unknown));
        }

        let account = accounts.set_access(id, dto.role, dto.permissions).await?;
        info!("Account access updated");
        Ok(account.public_view())
    }
}
