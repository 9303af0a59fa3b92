use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, models::Role};

/// Verified identity attached to the request. The role in here comes from the
/// signed token, never from anything the client can edit.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Admin-side actions. Route guards check one of these instead of matching on
/// role names, so the role/permission mapping lives in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ViewAllMerchants,
    ManageMerchants,
    ViewUsers,
    ManageUsers,
}

pub fn capabilities(role: Role) -> &'static [Capability] {
    use Capability::*;
    match role {
        Role::MainAdmin => &[ViewAllMerchants, ManageMerchants, ViewUsers, ManageUsers],
        Role::GeneralAdmin => &[ViewAllMerchants, ViewUsers],
        Role::Admin => &[ViewAllMerchants, ManageMerchants],
        Role::Owner => &[ViewAllMerchants],
        Role::User | Role::Merchant => &[],
    }
}

pub fn ensure_capability(user: &AuthUser, capability: Capability) -> Result<(), AppError> {
    if capabilities(user.role).contains(&capability) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to perform this action".into(),
        ))
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthorized("Invalid Authorization scheme".into()));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

        Ok(AuthUser {
            user_id,
            email: decoded.claims.email,
            role: decoded.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            role,
        }
    }

    #[test]
    fn merchants_have_no_admin_capabilities() {
        let user = user_with(Role::Merchant);
        assert!(ensure_capability(&user, Capability::ViewAllMerchants).is_err());
        assert!(ensure_capability(&user, Capability::ManageUsers).is_err());
    }

    #[test]
    fn owner_can_view_but_not_manage_merchants() {
        let user = user_with(Role::Owner);
        assert!(ensure_capability(&user, Capability::ViewAllMerchants).is_ok());
        assert!(ensure_capability(&user, Capability::ManageMerchants).is_err());
    }

    #[test]
    fn general_admin_views_users_but_cannot_manage_them() {
        let user = user_with(Role::GeneralAdmin);
        assert!(ensure_capability(&user, Capability::ViewUsers).is_ok());
        assert!(ensure_capability(&user, Capability::ManageUsers).is_err());
    }

    #[test]
    fn main_admin_has_every_capability() {
        let user = user_with(Role::MainAdmin);
        for cap in [
            Capability::ViewAllMerchants,
            Capability::ManageMerchants,
            Capability::ViewUsers,
            Capability::ManageUsers,
        ] {
            assert!(ensure_capability(&user, cap).is_ok());
        }
    }
}
