use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, MerchantProfileRequest, RegisterRequest, UserWithMerchant},
        cod::{
            BulkSettleRequest, BulkSettleResult, CodDetail, CodSummary, CodWithOrder,
            UpdateCodStatusRequest,
        },
        merchants::{MerchantDashboard, MerchantListItem},
        orders::{
            BulkImportReport, CreateOrderRequest, OrderDetail, OrderListItem, OrderWithCod,
            UpdateOrderStatusRequest,
        },
        owner::{MerchantDetail, MerchantOverview, OwnerDashboard},
        reports::{CodReport, ReturnsReport, SalesReport, ShippingReport},
        returns::{CreateReturnRequest, ReturnStats, ReturnWithOrder, UpdateReturnStatusRequest},
        shipping::{RateQuote, RatesRequest, TrackingResponse, WebhookStatusRequest},
        users::{UpdateRoleRequest, UpdateUserStatusRequest, UserStats, UserWithMerchantSummary},
    },
    models::{CodRecord, Merchant, Order, ReturnRequest, ShippingRate, TrackingEvent, User},
    response::{ApiResponse, Pagination},
    routes::{auth, cod, health, merchants, orders, owner, reports, returns, shipping, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
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

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        auth::complete_profile,
        auth::update_profile,
        merchants::list,
        merchants::profile,
        merchants::dashboard_stats,
        orders::list,
        orders::create,
        orders::detail,
        orders::update_status,
        orders::delete,
        orders::label,
        orders::import_template,
        orders::bulk_import,
        cod::list,
        cod::summary,
        cod::detail,
        cod::update_status,
        cod::bulk_settle,
        returns::create,
        returns::list,
        returns::stats,
        returns::detail,
        returns::update_status,
        returns::delete,
        shipping::rates,
        shipping::track,
        shipping::track_by_order,
        shipping::public_track,
        shipping::webhook_update_status,
        reports::sales,
        reports::cod,
        reports::shipping,
        reports::returns,
        reports::export_sales,
        reports::export_cod,
        owner::list_merchants,
        owner::merchant_detail,
        owner::dashboard,
        owner::toggle_status,
        users::list,
        users::stats,
        users::detail,
        users::update_role,
        users::update_status,
        users::delete
    ),
    components(
        schemas(
            User,
            Merchant,
            Order,
            CodRecord,
            TrackingEvent,
            ReturnRequest,
            ShippingRate,
            RegisterRequest,
            LoginRequest,
            MerchantProfileRequest,
            AuthResponse,
            UserWithMerchant,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            OrderListItem,
            OrderDetail,
            OrderWithCod,
            BulkImportReport,
            CodWithOrder,
            CodDetail,
            CodSummary,
            UpdateCodStatusRequest,
            BulkSettleRequest,
            BulkSettleResult,
            CreateReturnRequest,
            UpdateReturnStatusRequest,
            ReturnWithOrder,
            ReturnStats,
            RatesRequest,
            RateQuote,
            TrackingResponse,
            WebhookStatusRequest,
            SalesReport,
            CodReport,
            ShippingReport,
            ReturnsReport,
            MerchantListItem,
            MerchantDashboard,
            MerchantOverview,
            MerchantDetail,
            OwnerDashboard,
            UserWithMerchantSummary,
            UserStats,
            UpdateRoleRequest,
            UpdateUserStatusRequest,
            Pagination,
            ApiResponse<AuthResponse>,
            ApiResponse<OrderDetail>,
            ApiResponse<CodSummary>,
            ApiResponse<SalesReport>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication and merchant profile"),
        (name = "Merchants", description = "Merchant profile and dashboard"),
        (name = "Orders", description = "Shipping order endpoints"),
        (name = "COD", description = "Cash-on-delivery settlement endpoints"),
        (name = "Returns", description = "Return request endpoints"),
        (name = "Shipping", description = "Rates, tracking and courier webhook"),
        (name = "Reports", description = "Reporting and CSV export"),
        (name = "Owner", description = "Cross-tenant owner endpoints"),
        (name = "Users", description = "User administration endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
