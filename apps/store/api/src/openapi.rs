use utoipa::OpenApi;

/// Merged OpenAPI documentation for the storefront API
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = "E-commerce API exposing products and orders with filtering, search, ordering, pagination and role-based permissions"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/auth", api = domain_users::auth_handlers::ApiDoc),
        (path = "/users", api = domain_users::handlers::ApiDoc),
        (path = "/products", api = domain_products::handlers::ApiDoc),
        (path = "/orders", api = domain_orders::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;
