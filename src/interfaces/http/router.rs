//! Router with Swagger UI

use std::sync::Arc;

use axum::{extract::FromRef, middleware, routing::get, routing::post, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::dto::{
    AccessoryDto, CarDto, DraftDto, InsuranceOptionDto, LocationDto, PriceQuoteDto, UserDto,
};
use super::modules::{auth, booking, health, metrics, reservations};
use super::session::{CookieSettings, SessionState};
use crate::application::{AuthService, BookingService, ReservationService};
use crate::domain::{RepositoryProvider, SessionStore};
use crate::infrastructure::SeaOrmRepositoryProvider;

/// State shared by every route. Handlers extract the slice they need
/// through `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub booking: Arc<BookingService>,
    pub reservations: Arc<ReservationService>,
    pub sessions: SessionState,
    pub health: health::HealthState,
}

impl AppState {
    /// Wire the services over a SeaORM connection.
    pub fn new(
        db: DatabaseConnection,
        store: Arc<dyn SessionStore>,
        cookie: CookieSettings,
        bcrypt_cost: u32,
    ) -> Self {
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

        Self {
            auth: Arc::new(AuthService::new(repos.clone(), bcrypt_cost)),
            booking: Arc::new(BookingService::new(repos.clone())),
            reservations: Arc::new(ReservationService::new(repos)),
            sessions: SessionState { store, cookie },
            health: health::HealthState::new(db),
        }
    }
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<AppState> for SessionState {
    fn from_ref(s: &AppState) -> Self {
        s.sessions.clone()
    }
}

impl FromRef<AppState> for auth::AuthState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthState {
            service: Arc::clone(&s.auth),
        }
    }
}

impl FromRef<AppState> for booking::BookingState {
    fn from_ref(s: &AppState) -> Self {
        booking::BookingState {
            service: Arc::clone(&s.booking),
        }
    }
}

impl FromRef<AppState> for reservations::ReservationsState {
    fn from_ref(s: &AppState) -> Self {
        reservations::ReservationsState {
            service: Arc::clone(&s.reservations),
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        s.health.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::index,
        auth::login_page,
        auth::login,
        auth::signup_page,
        auth::signup,
        auth::logout,
        // Booking wizard
        booking::locations_page,
        booking::select_location,
        booking::cars_page,
        booking::select_car,
        booking::insurance_page,
        booking::select_insurance,
        booking::accessories_page,
        booking::select_accessories,
        booking::payment_page,
        booking::confirm_payment,
        // Reservations
        reservations::list_reservations,
        reservations::edit_reservation,
        reservations::update_reservation,
        reservations::delete_reservation,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            LocationDto,
            CarDto,
            InsuranceOptionDto,
            AccessoryDto,
            DraftDto,
            PriceQuoteDto,
            UserDto,
            // Auth
            auth::LoginForm,
            auth::SignupForm,
            auth::AuthPage,
            // Booking
            booking::LocationForm,
            booking::CarForm,
            booking::InsuranceForm,
            booking::AccessoriesForm,
            booking::LocationsPage,
            booking::CarsPage,
            booking::InsurancePage,
            booking::AccessoriesPage,
            booking::PaymentPage,
            // Reservations
            reservations::ReservationDto,
            reservations::ReservationListItem,
            reservations::ReservationsPage,
            reservations::EditReservationPage,
            reservations::UpdateReservationForm,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Signup, login and logout with a session cookie"),
        (name = "Booking", description = "Five-step booking wizard: location, car, insurance, accessories, payment"),
        (name = "Reservations", description = "The logged-in user's confirmed reservations"),
    ),
    info(
        title = "Car Rental Booking API",
        version = "1.0.0",
        description = "Page view models of the car rental booking site",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the application router.
///
/// `/metrics` is only mounted when a Prometheus recorder is installed.
pub fn create_router(state: AppState, prometheus: Option<PrometheusHandle>) -> Router {
    let auth_routes = Router::new()
        .route("/", get(auth::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", get(auth::logout));

    let booking_routes = Router::new()
        .route(
            "/locations",
            get(booking::locations_page).post(booking::select_location),
        )
        .route("/cars", get(booking::cars_page).post(booking::select_car))
        .route(
            "/insurance",
            get(booking::insurance_page).post(booking::select_insurance),
        )
        .route(
            "/accessories",
            get(booking::accessories_page).post(booking::select_accessories),
        )
        .route(
            "/payment",
            get(booking::payment_page).post(booking::confirm_payment),
        );

    let reservation_routes = Router::new()
        .route("/reservations", get(reservations::list_reservations))
        .route(
            "/reservations/{id}/edit",
            get(reservations::edit_reservation),
        )
        .route(
            "/reservations/{id}/update",
            post(reservations::update_reservation),
        )
        .route(
            "/reservations/{id}/delete",
            post(reservations::delete_reservation),
        );

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .merge(auth_routes)
        .merge(booking_routes)
        .merge(reservation_routes)
        .with_state(state);

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
