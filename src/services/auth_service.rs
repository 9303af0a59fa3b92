use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::auth::{
        AuthResponse, Claims, LoginRequest, MerchantProfileRequest, RegisterRequest,
        UserWithMerchant,
    },
    entity::{Merchants, Users, merchants, users},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Merchant, Role},
    response::ApiResponse,
    services::now,
    state::AppState,
};

const TOKEN_TTL_HOURS: i64 = 24;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub fn issue_token(user: &users::Model) -> AppResult<String> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))
}

pub async fn register(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    payload.validate()?;

    let existing = Users::find()
        .filter(users::Column::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "User with this email already exists".into(),
        ));
    }

    let ts = now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(payload.email),
        password_hash: Set(hash_password(&payload.password)?),
        role: Set(Role::Merchant),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(&state.orm)
    .await?;

    let token = issue_token(&user)?;
    Ok(ApiResponse::with_message(
        AuthResponse {
            user: UserWithMerchant {
                user: user.into(),
                merchant: None,
            },
            token,
        },
        "Registration successful",
    ))
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<AuthResponse>> {
    payload.validate()?;

    let user = Users::find()
        .filter(users::Column::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".into()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let merchant = user.find_related(Merchants).one(&state.orm).await?;
    let token = issue_token(&user)?;
    Ok(ApiResponse::with_message(
        AuthResponse {
            user: UserWithMerchant {
                user: user.into(),
                merchant: merchant.map(Merchant::from),
            },
            token,
        },
        "Login successful",
    ))
}

pub async fn me(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<UserWithMerchant>> {
    let user = Users::find_by_id(auth.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let merchant = user.find_related(Merchants).one(&state.orm).await?;
    Ok(ApiResponse::success(UserWithMerchant {
        user: user.into(),
        merchant: merchant.map(Merchant::from),
    }))
}

/// First-time merchant profile setup for a freshly registered account.
pub async fn complete_profile(
    state: &AppState,
    auth: &AuthUser,
    payload: MerchantProfileRequest,
) -> AppResult<ApiResponse<Merchant>> {
    payload.validate()?;

    let existing = Merchants::find()
        .filter(merchants::Column::UserId.eq(auth.user_id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Merchant profile already exists".into()));
    }

    let ts = now();
    let merchant = merchants::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(auth.user_id),
        business_name: Set(payload.business_name),
        business_type: Set(payload.business_type),
        address: Set(payload.address),
        city: Set(payload.city),
        province: Set(payload.province),
        postal_code: Set(payload.postal_code),
        phone: Set(payload.phone),
        email: Set(payload.email),
        is_active: Set(true),
        created_at: Set(ts),
        updated_at: Set(ts),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::with_message(
        merchant.into(),
        "Merchant profile created successfully",
    ))
}

pub async fn update_profile(
    state: &AppState,
    auth: &AuthUser,
    payload: MerchantProfileRequest,
) -> AppResult<ApiResponse<Merchant>> {
    payload.validate()?;

    let merchant = Merchants::find()
        .filter(merchants::Column::UserId.eq(auth.user_id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant profile not found".into()))?;

    let mut active: merchants::ActiveModel = merchant.into();
    active.business_name = Set(payload.business_name);
    active.business_type = Set(payload.business_type);
    active.address = Set(payload.address);
    active.city = Set(payload.city);
    active.province = Set(payload.province);
    active.postal_code = Set(payload.postal_code);
    active.phone = Set(payload.phone);
    active.email = Set(payload.email);
    active.updated_at = Set(now());
    let merchant = active.update(&state.orm).await?;

    Ok(ApiResponse::with_message(
        merchant.into(),
        "Profile updated successfully",
    ))
}
