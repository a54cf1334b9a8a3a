use pennywise_auth::TokenService;
use pennywise_core::{AppError, FieldError};
use pennywise_db::{AccountStore, StoreError};
use pennywise_models::{
    Account, AccountPublicView, AuthResponse, ChangePasswordRequest, LoginRequest, NewAccount,
    ProfileUpdate, RegisterRequest, UpdateProfileRequest,
};
use tracing::{info, instrument};
use uuid::Uuid;

pub struct AuthService;

impl AuthService {
    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn register(
        accounts: &dyn AccountStore,
        tokens: &TokenService,
        dto: RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        let account = accounts
            .create(NewAccount::registration(dto.name, dto.email, dto.password))
            .await?;
        let token = tokens.issue(account.id)?;

        info!(account_id = %account.id, "Account registered");
        Ok(AuthResponse::new(account.public_view(), token))
    }

    #[instrument(skip_all, fields(email = %dto.email))]
    pub async fn login(
        accounts: &dyn AccountStore,
        tokens: &TokenService,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let account = accounts
            .find_by_credentials(&dto.email, &dto.password)
            .await?;
        let token = tokens.issue(account.id)?;

        info!(account_id = %account.id, "Login succeeded");
        Ok(AuthResponse::new(account.public_view(), token))
    }

    #[instrument(skip_all, fields(account_id = %account_id))]
    pub async fn update_profile(
        accounts: &dyn AccountStore,
        account_id: Uuid,
        dto: UpdateProfileRequest,
    ) -> Result<AccountPublicView, AppError> {
        let update = ProfileUpdate {
            name: dto.name,
            email: dto.email,
        };
        let account = accounts.update_profile(account_id, update).await?;
        Ok(account.public_view())
    }

    /// Re-hashes the credential after checking the current password.
    #[instrument(skip_all, fields(account_id = %account.id))]
    pub async fn change_password(
        accounts: &dyn AccountStore,
        account: &Account,
        dto: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        match accounts
            .find_by_credentials(&account.email, &dto.current_password)
            .await
        {
            Ok(_) => {}
            Err(StoreError::InvalidCredentials) => {
                return Err(AppError::validation(vec![FieldError::new(
                    "current_password",
                    "Current password is incorrect",
                )]));
            }
            Err(err) => return Err(err.into()),
        }

        accounts
            .change_password(account.id, &dto.new_password)
            .await?;

        info!("Password changed");
        Ok(())
    }
}
