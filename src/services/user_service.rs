use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::users::{
        MerchantSummary, UpdateRoleRequest, UpdateUserStatusRequest, UserListQuery, UserStats,
        UserWithMerchantSummary,
    },
    entity::{Merchants, Users, merchants, users},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, Capability, ensure_capability},
    models::{Role, User},
    response::{ApiResponse, Pagination},
    routes::params::normalize,
    services::now,
    state::AppState,
};

pub async fn list(
    state: &AppState,
    auth: &AuthUser,
    query: UserListQuery,
) -> AppResult<ApiResponse<Vec<UserWithMerchantSummary>>> {
    ensure_capability(auth, Capability::ViewUsers)?;
    let (page, limit, offset) = normalize(query.page, query.limit);

    let mut finder = Users::find();
    if let Some(role) = query.role {
        finder = finder.filter(users::Column::Role.eq(role));
    }
    finder = finder.order_by_desc(users::Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let rows = finder
        .find_also_related(Merchants)
        .limit(limit as u64)
        .offset(offset)
        .all(&state.orm)
        .await?;

    let items = rows
        .into_iter()
        .map(|(user, merchant)| UserWithMerchantSummary {
            user: user.into(),
            merchant: merchant.map(merchant_summary),
        })
        .collect();

    Ok(ApiResponse::paginated(
        items,
        Pagination::new(page, limit, total),
    ))
}

pub async fn get(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<UserWithMerchantSummary>> {
    ensure_capability(auth, Capability::ViewUsers)?;

    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let merchant = user.find_related(Merchants).one(&state.orm).await?;

    Ok(ApiResponse::success(UserWithMerchantSummary {
        user: user.into(),
        merchant: merchant.map(merchant_summary),
    }))
}

pub async fn stats(state: &AppState, auth: &AuthUser) -> AppResult<ApiResponse<UserStats>> {
    ensure_capability(auth, Capability::ViewUsers)?;

    let total_users = Users::find().count(&state.orm).await? as i64;
    let total_merchants = Users::find()
        .filter(users::Column::Role.eq(Role::Merchant))
        .count(&state.orm)
        .await? as i64;
    let total_admins = Users::find()
        .filter(users::Column::Role.is_in([Role::MainAdmin, Role::GeneralAdmin, Role::Admin]))
        .count(&state.orm)
        .await? as i64;
    let total_regular_users = Users::find()
        .filter(users::Column::Role.eq(Role::User))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::success(UserStats {
        total_users,
        total_merchants,
        total_admins,
        total_regular_users,
    }))
}

pub async fn update_role(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: UpdateRoleRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_capability(auth, Capability::ManageUsers)?;
    if id == auth.user_id {
        return Err(AppError::Forbidden("Cannot change your own role".into()));
    }

    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let mut active: users::ActiveModel = user.into();
    active.role = Set(payload.role);
    active.updated_at = Set(now());
    let user = active.update(&state.orm).await?;

    Ok(ApiResponse::with_message(
        user.into(),
        "User role updated successfully",
    ))
}

/// Enables or disables the user's merchant profile. Users without a profile
/// have nothing to toggle.
pub async fn update_status(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    payload: UpdateUserStatusRequest,
) -> AppResult<ApiResponse<UserWithMerchantSummary>> {
    ensure_capability(auth, Capability::ManageUsers)?;
    if id == auth.user_id {
        return Err(AppError::Forbidden("Cannot change your own status".into()));
    }

    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let merchant = user
        .find_related(Merchants)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("Merchant profile not found".into()))?;

    let mut active: merchants::ActiveModel = merchant.into();
    active.is_active = Set(payload.is_active);
    active.updated_at = Set(now());
    let merchant = active.update(&state.orm).await?;

    Ok(ApiResponse::with_message(
        UserWithMerchantSummary {
            user: user.into(),
            merchant: Some(merchant_summary(merchant)),
        },
        "User status updated successfully",
    ))
}

/// Hard delete; merchant profile, orders, and dependents go with it via
/// cascading foreign keys.
pub async fn delete(state: &AppState, auth: &AuthUser, id: Uuid) -> AppResult<ApiResponse<()>> {
    ensure_capability(auth, Capability::ManageUsers)?;
    if id == auth.user_id {
        return Err(AppError::Forbidden("Cannot delete your own account".into()));
    }

    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    user.delete(&state.orm).await?;

    Ok(ApiResponse::message("User deleted successfully"))
}

fn merchant_summary(merchant: merchants::Model) -> MerchantSummary {
    MerchantSummary {
        id: merchant.id,
        business_name: merchant.business_name,
        business_type: merchant.business_type,
        is_active: merchant.is_active,
        created_at: merchant.created_at.to_utc(),
    }
}
