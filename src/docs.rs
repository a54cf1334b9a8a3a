use pennywise_core::{ErrorResponse, FieldError, Role};
use pennywise_models::{
    AccountPublicView, AccountResponse, AuthResponse, ChangePasswordRequest, LoginRequest,
    MessageResponse, RegisterRequest, UpdateAccessRequest, UpdateProfileRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::update_profile,
        crate::modules::auth::controller::change_password,
        crate::modules::admin::controller::get_account,
        crate::modules::admin::controller::update_access,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            UpdateProfileRequest,
            ChangePasswordRequest,
            UpdateAccessRequest,
            AuthResponse,
            AccountResponse,
            AccountPublicView,
            MessageResponse,
            ErrorResponse,
            FieldError,
            Role,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and profile endpoints"),
        (name = "Admin", description = "Account administration endpoints"),
    ),
    info(
        title = "Pennywise API",
        version = "0.1.0",
        description = "Account authentication and session tokens for Pennywise",
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
