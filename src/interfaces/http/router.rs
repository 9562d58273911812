//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AllocationService, CustomerService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, customers, facilities, health, reservations};

/// Security scheme modifier for OpenAPI
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
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_current_customer,
        auth::handlers::update_profile,
        auth::handlers::change_password,
        // Facilities
        facilities::handlers::list_facilities,
        facilities::handlers::get_facility,
        facilities::handlers::create_facility,
        facilities::handlers::update_facility,
        facilities::handlers::delete_facility,
        facilities::handlers::list_spots,
        // Reservations
        reservations::handlers::reserve,
        reservations::handlers::release,
        reservations::handlers::list_reservations,
        reservations::handlers::list_my_reservations,
        // Customers
        customers::handlers::list_customers,
        customers::handlers::delete_customer,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            // Auth
            auth::dto::RegisterRequest,
            auth::dto::LoginRequest,
            auth::dto::LoginResponse,
            auth::dto::CustomerInfo,
            auth::dto::UpdateProfileRequest,
            auth::dto::ChangePasswordRequest,
            // Facilities
            facilities::dto::FacilityResponse,
            facilities::dto::FacilitySummaryResponse,
            facilities::dto::SpotResponse,
            facilities::dto::ActiveReservationInfo,
            facilities::dto::CreateFacilityRequest,
            facilities::dto::UpdateFacilityRequest,
            // Reservations
            reservations::dto::ReserveRequest,
            reservations::dto::ReleaseRequest,
            reservations::dto::ReservationResponse,
            // Customers
            customers::dto::CustomerResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Registration, login (JWT), profile and password self-service"),
        (name = "Facilities", description = "Parking facility management and availability browsing"),
        (name = "Reservations", description = "Spot reservation and release with time-based billing"),
        (name = "Customers", description = "Customer account administration"),
    ),
    info(
        title = "ParkHub API",
        version = "0.1.0",
        description = "REST API for parking-lot spot reservations and billing"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    allocation: Arc<AllocationService>,
    customer_service: Arc<CustomerService>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
) -> Router {
    let middleware_state = AuthState {
        jwt_config: jwt_config.clone(),
    };

    let auth_state = auth::handlers::AuthHandlerState {
        customers: Arc::clone(&customer_service),
        jwt_config,
    };

    let facilities_state = facilities::handlers::FacilitiesHandlerState {
        allocation: Arc::clone(&allocation),
    };

    let reservations_state = reservations::handlers::ReservationsHandlerState {
        allocation: Arc::clone(&allocation),
    };

    let customers_state = customers::handlers::CustomersHandlerState {
        customers: customer_service,
    };

    let health_state = health::handlers::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::handlers::register))
        .route("/login", post(auth::handlers::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::handlers::get_current_customer))
        .route("/profile", put(auth::handlers::update_profile))
        .route("/change-password", post(auth::handlers::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // Facility routes (public browse)
    let facility_routes = Router::new()
        .route("/", get(facilities::handlers::list_facilities))
        .route("/{id}", get(facilities::handlers::get_facility))
        .with_state(facilities_state.clone());

    // Facility routes (protected; handlers enforce the admin role)
    let facility_admin_routes = Router::new()
        .route("/", post(facilities::handlers::create_facility))
        .route(
            "/{id}",
            put(facilities::handlers::update_facility)
                .delete(facilities::handlers::delete_facility),
        )
        .route("/{id}/spots", get(facilities::handlers::list_spots))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(facilities_state);

    // Reservation routes (protected)
    let reservation_routes = Router::new()
        .route(
            "/",
            post(reservations::handlers::reserve).get(reservations::handlers::list_reservations),
        )
        .route("/mine", get(reservations::handlers::list_my_reservations))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(reservations_state.clone());

    // Spot release (protected)
    let spot_routes = Router::new()
        .route("/{spot_id}/release", post(reservations::handlers::release))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(reservations_state);

    // Customer administration routes (protected)
    let customer_routes = Router::new()
        .route("/", get(customers::handlers::list_customers))
        .route("/{id}", delete(customers::handlers::delete_customer))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(customers_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::handlers::health_check))
        .with_state(health_state)
        // Auth
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        // Facilities
        .nest("/api/v1/facilities", facility_routes)
        .nest("/api/v1/facilities", facility_admin_routes)
        // Reservations
        .nest("/api/v1/reservations", reservation_routes)
        // Spots
        .nest("/api/v1/spots", spot_routes)
        // Customers
        .nest("/api/v1/customers", customer_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
