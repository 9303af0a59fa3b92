use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Merchant, Role, User};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchantProfileRequest {
    #[validate(length(min = 2, message = "Business name must be at least 2 characters"))]
    pub business_name: String,
    #[validate(length(min = 2, message = "Business type is required"))]
    pub business_type: String,
    #[validate(length(min = 10, message = "Address must be at least 10 characters"))]
    pub address: String,
    #[validate(length(min = 2, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 2, message = "Province is required"))]
    pub province: String,
    #[validate(length(min = 5, message = "Postal code must be at least 5 characters"))]
    pub postal_code: String,
    #[validate(length(min = 10, message = "Phone number must be at least 10 characters"))]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// JWT payload. `sub` is the user id; the role here is the only authority
/// source for authorization decisions.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserWithMerchant {
    #[serde(flatten)]
    pub user: User,
    pub merchant: Option<Merchant>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserWithMerchant,
    pub token: String,
}
