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
        admin::{UpdateOrderStatusRequest, UserList},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, AdjustQuantityRequest, CartDto, CartLine},
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        dashboard::{
            AdminDashboard, MovementTotals, RoleCount, StatusCount, SupplierDashboard,
            TopProduct, TypeCount, VendorDashboard,
        },
        favorites::{AddFavoriteRequest, FavoriteMaterialList},
        invitations::{AcceptInvitationRequest, CreateInvitationRequest, InvitationList},
        items::{
            CompositionEntry, CompositionLine, CompositionList, CreateMaterialRequest,
            CreateProductRequest, ItemList, ItemWithTags, SetCompositionRequest,
            SetItemTagsRequest, UpdateItemRequest,
        },
        orders::{OrderList, OrderWithItems},
        payments::{PayOrderResponse, WebhookRequest},
        stock::{CreateMovementRequest, MovementCreated, MovementList},
        tags::{CreateTagRequest, TagList, UpdateTagRequest},
    },
    models::{
        Category, Invitation, Item, MaterialFavorite, Order, OrderItem, Payment, StockMovement,
        Tag, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, auth, cart, categories, dashboard, favorites, health, invitations, items,
        materials, orders, params, payments, products, tags,
    },
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
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        products::get_composition,
        products::set_composition,
        materials::list_materials,
        materials::get_material,
        materials::create_material,
        materials::update_material,
        materials::delete_material,
        materials::create_movement,
        materials::list_movements,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        tags::list_tags,
        tags::create_tag,
        tags::update_tag,
        tags::delete_tag,
        items::set_item_tags,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        cart::get_cart,
        cart::add_to_cart,
        cart::adjust_quantity,
        cart::remove_line,
        orders::checkout,
        orders::list_orders,
        orders::get_order,
        payments::pay_order,
        payments::webhook,
        invitations::create_invitation,
        invitations::list_invitations,
        invitations::accept_invitation,
        admin::list_users,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::list_low_stock,
        dashboard::admin_dashboard,
        dashboard::vendor_dashboard,
        dashboard::supplier_dashboard
    ),
    components(
        schemas(
            User,
            Item,
            Category,
            Tag,
            Order,
            OrderItem,
            StockMovement,
            MaterialFavorite,
            Invitation,
            Payment,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateProductRequest,
            CreateMaterialRequest,
            UpdateItemRequest,
            ItemList,
            ItemWithTags,
            SetItemTagsRequest,
            CompositionEntry,
            SetCompositionRequest,
            CompositionLine,
            CompositionList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CreateTagRequest,
            UpdateTagRequest,
            TagList,
            AddToCartRequest,
            AdjustQuantityRequest,
            CartLine,
            CartDto,
            OrderList,
            OrderWithItems,
            PayOrderResponse,
            WebhookRequest,
            CreateMovementRequest,
            MovementCreated,
            MovementList,
            AddFavoriteRequest,
            FavoriteMaterialList,
            CreateInvitationRequest,
            AcceptInvitationRequest,
            InvitationList,
            UpdateOrderStatusRequest,
            UserList,
            RoleCount,
            StatusCount,
            TypeCount,
            TopProduct,
            MovementTotals,
            AdminDashboard,
            VendorDashboard,
            SupplierDashboard,
            params::Pagination,
            params::ItemQuery,
            params::OrderListQuery,
            params::LowStockQuery,
            params::UserListQuery,
            Meta,
            ApiResponse<Item>,
            ApiResponse<ItemList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<CartDto>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Vendor product catalog"),
        (name = "Materials", description = "Supplier material catalog"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Tags", description = "Tag endpoints"),
        (name = "Favorites", description = "Vendor material bookmarks"),
        (name = "Cart", description = "Draft-order cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Payments", description = "Hosted checkout correlation"),
        (name = "Stock", description = "Material stock ledger"),
        (name = "Invitations", description = "Email-token registration"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Dashboards", description = "Role dashboards"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
