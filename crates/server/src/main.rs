// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use lendit_api::{
    AccountResponse, ApiError, AuthenticationService, BookOfferRequest, ChatMessageResponse,
    DeleteRatingResponse, HandleRequestRequest, IntervalResponse, ListRequestsResponse,
    LoginRequest, LoginResponse, OfferInput, OfferResponse, RateRequest, RatingResponse,
    RegisterAccountRequest, RequestResponse, SetBlockedDatesRequest, SweepTimeoutsResponse,
    account_to_response,
};
use lendit_persistence::Persistence;

use live::{LiveEvent, LiveEventBroadcaster};
use session::SessionUser;

/// Lendit Server - HTTP server for the Lendit rental marketplace
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Hours an open request may wait before the timeout sweep closes it
    #[arg(long, default_value_t = 72)]
    request_timeout_hours: i64,
}

/// Application state shared across handlers.
///
/// The persistence layer is wrapped in a Mutex; write flows hold the lock
/// for their whole read-decide-write sequence, which serializes the
/// availability check-then-act per offer.
#[derive(Clone)]
pub struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Broadcaster for informational live events.
    broadcaster: Arc<LiveEventBroadcaster>,
    /// Timeout sweep threshold in hours.
    request_timeout_hours: i64,
}

impl axum::extract::FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        state.broadcaster.clone()
    }
}

/// Query parameters for listing offers.
#[derive(Debug, Deserialize)]
struct ListOffersQuery {
    /// Restrict to a category.
    category_id: Option<i64>,
    /// Restrict to a lessor's offers.
    lessor_id: Option<i64>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Extracts the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, HttpError> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: String::from("Missing or malformed Authorization header"),
        })
}

// ============================================================================
// Account handlers
// ============================================================================

/// Handler for POST `/accounts` endpoint.
async fn handle_register_account(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterAccountRequest>,
) -> Result<Json<AccountResponse>, HttpError> {
    info!(email = %req.email, "Handling register_account request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AccountResponse = lendit_api::register_account(&mut persistence, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/accounts/{account_id}` endpoint.
async fn handle_get_account(
    AxumState(app_state): AxumState<AppState>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: AccountResponse = lendit_api::get_account(&mut persistence, account_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/login` endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let (session_token, _, account) =
        AuthenticationService::login(&mut persistence, &req.email, &req.password)
            .map_err(ApiError::from)?;
    drop(persistence);

    Ok(Json(LoginResponse {
        session_token,
        account: account_to_response(&account),
    }))
}

/// Handler for POST `/logout` endpoint.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let token: &str = bearer_token(&headers)?;

    let mut persistence = app_state.persistence.lock().await;
    AuthenticationService::logout(&mut persistence, token).map_err(ApiError::from)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/whoami` endpoint.
async fn handle_whoami(
    SessionUser(_, account): SessionUser,
) -> Result<Json<AccountResponse>, HttpError> {
    Ok(Json(account_to_response(&account)))
}

// ============================================================================
// Offer handlers
// ============================================================================

/// Handler for POST `/offers` endpoint.
async fn handle_create_offer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Json(req): Json<OfferInput>,
) -> Result<Json<OfferResponse>, HttpError> {
    info!(lessor_id = user.account_id, title = %req.title, "Handling create_offer request");

    let mut persistence = app_state.persistence.lock().await;
    let response: OfferResponse = lendit_api::create_offer(&mut persistence, &user, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/offers` endpoint.
async fn handle_list_offers(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListOffersQuery>,
) -> Result<Json<Vec<OfferResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<OfferResponse> =
        lendit_api::list_offers(&mut persistence, query.category_id, query.lessor_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/offers/{offer_id}` endpoint.
async fn handle_get_offer(
    AxumState(app_state): AxumState<AppState>,
    Path(offer_id): Path<i64>,
) -> Result<Json<OfferResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: OfferResponse = lendit_api::get_offer(&mut persistence, offer_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/offers/{offer_id}` endpoint.
async fn handle_update_offer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(offer_id): Path<i64>,
    Json(req): Json<OfferInput>,
) -> Result<Json<OfferResponse>, HttpError> {
    info!(offer_id, "Handling update_offer request");

    let mut persistence = app_state.persistence.lock().await;
    let response: OfferResponse =
        lendit_api::update_offer(&mut persistence, &user, offer_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/offers/{offer_id}` endpoint.
async fn handle_delete_offer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(offer_id): Path<i64>,
) -> Result<StatusCode, HttpError> {
    info!(offer_id, "Handling delete_offer request");

    let mut persistence = app_state.persistence.lock().await;
    lendit_api::delete_offer(&mut persistence, &user, offer_id)?;
    drop(persistence);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for PUT `/offers/{offer_id}/blocked_dates` endpoint.
async fn handle_set_blocked_dates(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(offer_id): Path<i64>,
    Json(req): Json<SetBlockedDatesRequest>,
) -> Result<Json<Vec<IntervalResponse>>, HttpError> {
    info!(offer_id, "Handling set_blocked_dates request");

    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<IntervalResponse> =
        lendit_api::set_blocked_dates(&mut persistence, &user, offer_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/offers/{offer_id}/blocked_dates` endpoint.
async fn handle_list_blocked_dates(
    AxumState(app_state): AxumState<AppState>,
    Path(offer_id): Path<i64>,
) -> Result<Json<Vec<IntervalResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<IntervalResponse> =
        lendit_api::list_blocked_dates(&mut persistence, offer_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Booking handlers
// ============================================================================

/// Handler for POST `/offers/{offer_id}/bookings` endpoint.
///
/// The persistence lock is held for the whole overlap-check-then-insert
/// sequence.
async fn handle_book_offer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(offer_id): Path<i64>,
    Json(req): Json<BookOfferRequest>,
) -> Result<Json<RequestResponse>, HttpError> {
    info!(
        offer_id,
        lessee_id = user.account_id,
        "Handling book_offer request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RequestResponse =
        lendit_api::book_offer(&mut persistence, &user, offer_id, req)?;
    drop(persistence);

    app_state.broadcaster.broadcast(&LiveEvent::RequestCreated {
        request_id: response.request_id,
        offer_id,
    });

    Ok(Json(response))
}

/// Handler for POST `/requests/{request_id}/handle` endpoint.
async fn handle_handle_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(request_id): Path<i64>,
    Json(req): Json<HandleRequestRequest>,
) -> Result<Json<RequestResponse>, HttpError> {
    info!(
        request_id,
        desired_status = req.status,
        "Handling handle_request request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RequestResponse =
        lendit_api::handle_request(&mut persistence, &user, request_id, req)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::RequestStatusChanged {
            request_id,
            status: response.status,
        });

    Ok(Json(response))
}

/// Handler for GET `/requests/{request_id}` endpoint.
async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(request_id): Path<i64>,
) -> Result<Json<RequestResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RequestResponse =
        lendit_api::get_request(&mut persistence, &user, request_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/requests` endpoint.
async fn handle_list_requests(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
) -> Result<Json<ListRequestsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListRequestsResponse = lendit_api::list_requests(&mut persistence, &user)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/requests/{request_id}/messages` endpoint.
async fn handle_list_request_messages(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(request_id): Path<i64>,
) -> Result<Json<Vec<ChatMessageResponse>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: Vec<ChatMessageResponse> =
        lendit_api::list_request_messages(&mut persistence, &user, request_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/requests/sweep_timeouts` endpoint.
///
/// Invoked by the external periodic job; carries no human actor.
async fn handle_sweep_timeouts(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<SweepTimeoutsResponse>, HttpError> {
    info!("Handling sweep_timeouts request");

    let mut persistence = app_state.persistence.lock().await;
    let response: SweepTimeoutsResponse =
        lendit_api::sweep_request_timeouts(&mut persistence, app_state.request_timeout_hours)?;
    drop(persistence);

    for request_id in &response.timed_out_request_ids {
        app_state
            .broadcaster
            .broadcast(&LiveEvent::RequestStatusChanged {
                request_id: *request_id,
                status: lendit_domain::RequestStatus::TimedOut.code(),
            });
    }

    Ok(Json(response))
}

// ============================================================================
// Rating handlers
// ============================================================================

/// Handler for POST `/offers/{offer_id}/ratings` endpoint.
async fn handle_rate_offer(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(offer_id): Path<i64>,
    Json(req): Json<RateRequest>,
) -> Result<Json<RatingResponse>, HttpError> {
    info!(offer_id, "Handling rate_offer request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RatingResponse = lendit_api::rate_offer(&mut persistence, &user, offer_id, req)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::OfferRated { offer_id });

    Ok(Json(response))
}

/// Handler for PUT `/offers/{offer_id}/ratings` endpoint.
async fn handle_update_offer_rating(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(offer_id): Path<i64>,
    Json(req): Json<RateRequest>,
) -> Result<Json<RatingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RatingResponse =
        lendit_api::update_offer_rating(&mut persistence, &user, offer_id, req)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::OfferRated { offer_id });

    Ok(Json(response))
}

/// Handler for DELETE `/offers/{offer_id}/ratings` endpoint.
async fn handle_delete_offer_rating(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(offer_id): Path<i64>,
) -> Result<Json<DeleteRatingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteRatingResponse =
        lendit_api::delete_offer_rating(&mut persistence, &user, offer_id)?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&LiveEvent::OfferRated { offer_id });

    Ok(Json(response))
}

/// Handler for POST `/accounts/{account_id}/ratings` endpoint.
async fn handle_rate_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(account_id): Path<i64>,
    Json(req): Json<RateRequest>,
) -> Result<Json<RatingResponse>, HttpError> {
    info!(account_id, "Handling rate_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RatingResponse =
        lendit_api::rate_user(&mut persistence, &user, account_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/accounts/{account_id}/ratings` endpoint.
async fn handle_update_user_rating(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(account_id): Path<i64>,
    Json(req): Json<RateRequest>,
) -> Result<Json<RatingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: RatingResponse =
        lendit_api::update_user_rating(&mut persistence, &user, account_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/accounts/{account_id}/ratings` endpoint.
async fn handle_delete_user_rating(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(user, _): SessionUser,
    Path(account_id): Path<i64>,
) -> Result<Json<DeleteRatingResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteRatingResponse =
        lendit_api::delete_user_rating(&mut persistence, &user, account_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/accounts", post(handle_register_account))
        .route("/accounts/{account_id}", get(handle_get_account))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/whoami", get(handle_whoami))
        .route("/offers", post(handle_create_offer))
        .route("/offers", get(handle_list_offers))
        .route("/offers/{offer_id}", get(handle_get_offer))
        .route("/offers/{offer_id}", put(handle_update_offer))
        .route("/offers/{offer_id}", delete(handle_delete_offer))
        .route(
            "/offers/{offer_id}/blocked_dates",
            put(handle_set_blocked_dates),
        )
        .route(
            "/offers/{offer_id}/blocked_dates",
            get(handle_list_blocked_dates),
        )
        .route("/offers/{offer_id}/bookings", post(handle_book_offer))
        .route("/offers/{offer_id}/ratings", post(handle_rate_offer))
        .route("/offers/{offer_id}/ratings", put(handle_update_offer_rating))
        .route(
            "/offers/{offer_id}/ratings",
            delete(handle_delete_offer_rating),
        )
        .route("/accounts/{account_id}/ratings", post(handle_rate_user))
        .route(
            "/accounts/{account_id}/ratings",
            put(handle_update_user_rating),
        )
        .route(
            "/accounts/{account_id}/ratings",
            delete(handle_delete_user_rating),
        )
        .route("/requests", get(handle_list_requests))
        .route("/requests/{request_id}", get(handle_get_request))
        .route("/requests/{request_id}/handle", post(handle_handle_request))
        .route(
            "/requests/{request_id}/messages",
            get(handle_list_request_messages),
        )
        .route("/requests/sweep_timeouts", post(handle_sweep_timeouts))
        .route("/live", get(live::live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Lendit Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        broadcaster: Arc::new(LiveEventBroadcaster::new()),
        request_timeout_hours: args.request_timeout_hours,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            broadcaster: Arc::new(LiveEventBroadcaster::new()),
            request_timeout_hours: 72,
        }
    }

    async fn send_json(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (HttpStatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status: HttpStatusCode = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    /// Registers an account and logs in; returns (session token, account id).
    async fn register_and_login(app: &Router, email: &str, name: &str) -> (String, i64) {
        let (status, _) = send_json(
            app,
            "POST",
            "/accounts",
            None,
            Some(json!({
                "email": email,
                "display_name": name,
                "password": "Dr1ll-B0rrower!",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let (status, body) = send_json(
            app,
            "POST",
            "/login",
            None,
            Some(json!({
                "email": email,
                "password": "Dr1ll-B0rrower!",
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);

        let token: String = body["session_token"].as_str().unwrap().to_string();
        let account_id: i64 = body["account"]["account_id"].as_i64().unwrap();
        (token, account_id)
    }

    async fn create_offer(app: &Router, token: &str) -> i64 {
        let (status, body) = send_json(
            app,
            "POST",
            "/offers",
            Some(token),
            Some(json!({
                "title": "Cordless drill",
                "description": "18V drill with two batteries",
                "price": 7.5,
                "category_id": 3,
                "pictures": ["drill.jpg"],
            })),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        body["offer_id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_register_login_whoami() {
        let app: Router = build_router(create_test_app_state());

        let (token, account_id) = register_and_login(&app, "user@example.com", "Test User").await;

        let (status, body) = send_json(&app, "GET", "/whoami", Some(&token), None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(body["account_id"].as_i64().unwrap(), account_id);
        assert_eq!(body["email"].as_str().unwrap(), "user@example.com");
    }

    #[tokio::test]
    async fn test_unauthenticated_booking_is_rejected() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/offers/1/bookings")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({"from_date": "2030-06-01", "to_date": "2030-06-05"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_booking_lifecycle_over_http() {
        let app: Router = build_router(create_test_app_state());

        let (lessor_token, _) = register_and_login(&app, "lessor@example.com", "Lena").await;
        let (lessee_token, _) = register_and_login(&app, "lessee@example.com", "Theo").await;
        let offer_id = create_offer(&app, &lessor_token).await;

        // Lessee books June 1-5.
        let (status, booked) = send_json(
            &app,
            "POST",
            &format!("/offers/{offer_id}/bookings"),
            Some(&lessee_token),
            Some(json!({"from_date": "2030-06-01", "to_date": "2030-06-05"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(booked["status"].as_i64().unwrap(), 1);
        assert!(booked["qr_code"].is_null());
        let request_id = booked["request_id"].as_i64().unwrap();

        // Lessor accepts; the transition response never carries the code.
        let (status, accepted) = send_json(
            &app,
            "POST",
            &format!("/requests/{request_id}/handle"),
            Some(&lessor_token),
            Some(json!({"status": 2})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(accepted["status"].as_i64().unwrap(), 2);
        assert!(accepted["qr_code"].is_null());

        // Calendar now blocks the booked range.
        let (status, intervals) = send_json(
            &app,
            "GET",
            &format!("/offers/{offer_id}/blocked_dates"),
            None,
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(intervals.as_array().unwrap().len(), 1);

        // A second overlapping booking by a third user conflicts.
        let (third_token, _) = register_and_login(&app, "third@example.com", "Uma").await;
        let (status, _) = send_json(
            &app,
            "POST",
            &format!("/offers/{offer_id}/bookings"),
            Some(&third_token),
            Some(json!({"from_date": "2030-06-03", "to_date": "2030-06-04"})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);

        // The lessee reads the hand-off code; the lessor's read is redacted.
        let (status, lessee_view) = send_json(
            &app,
            "GET",
            &format!("/requests/{request_id}"),
            Some(&lessee_token),
            None,
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        let pickup_code = lessee_view["qr_code"].as_str().unwrap().to_string();

        let (_, lessor_view) = send_json(
            &app,
            "GET",
            &format!("/requests/{request_id}"),
            Some(&lessor_token),
            None,
        )
        .await;
        assert!(lessor_view["qr_code"].is_null());

        // Lessor hands the item over against the code.
        let (status, lent) = send_json(
            &app,
            "POST",
            &format!("/requests/{request_id}/handle"),
            Some(&lessor_token),
            Some(json!({"status": 4, "qr_code": pickup_code})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(lent["status"].as_i64().unwrap(), 4);
    }

    #[tokio::test]
    async fn test_wrong_actor_transition_is_conflict_over_http() {
        let app: Router = build_router(create_test_app_state());

        let (lessor_token, _) = register_and_login(&app, "lessor@example.com", "Lena").await;
        let (lessee_token, _) = register_and_login(&app, "lessee@example.com", "Theo").await;
        let offer_id = create_offer(&app, &lessor_token).await;

        let (_, booked) = send_json(
            &app,
            "POST",
            &format!("/offers/{offer_id}/bookings"),
            Some(&lessee_token),
            Some(json!({"from_date": "2030-06-01", "to_date": "2030-06-05"})),
        )
        .await;
        let request_id = booked["request_id"].as_i64().unwrap();

        // The lessee may not accept their own request.
        let (status, _) = send_json(
            &app,
            "POST",
            &format!("/requests/{request_id}/handle"),
            Some(&lessee_token),
            Some(json!({"status": 2})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_out_of_bounds_rating_is_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let (lessor_token, _) = register_and_login(&app, "lessor@example.com", "Lena").await;
        let (lessee_token, _) = register_and_login(&app, "lessee@example.com", "Theo").await;
        let offer_id = create_offer(&app, &lessor_token).await;

        send_json(
            &app,
            "POST",
            &format!("/offers/{offer_id}/bookings"),
            Some(&lessee_token),
            Some(json!({"from_date": "2030-06-01", "to_date": "2030-06-05"})),
        )
        .await;

        // 0 is outside (0, 5]: the minimum is excluded.
        let (status, _) = send_json(
            &app,
            "POST",
            &format!("/offers/{offer_id}/ratings"),
            Some(&lessee_token),
            Some(json!({"rating": 0})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_rating_without_request_is_forbidden_over_http() {
        let app: Router = build_router(create_test_app_state());

        let (lessor_token, _) = register_and_login(&app, "lessor@example.com", "Lena").await;
        let (lessee_token, _) = register_and_login(&app, "lessee@example.com", "Theo").await;
        let offer_id = create_offer(&app, &lessor_token).await;

        let (status, _) = send_json(
            &app,
            "POST",
            &format!("/offers/{offer_id}/ratings"),
            Some(&lessee_token),
            Some(json!({"rating": 4})),
        )
        .await;
        assert_eq!(status, HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_sweep_endpoint_times_out_stale_requests() {
        let mut app_state = create_test_app_state();
        app_state.request_timeout_hours = 0;
        let app: Router = build_router(app_state);

        let (lessor_token, _) = register_and_login(&app, "lessor@example.com", "Lena").await;
        let (lessee_token, _) = register_and_login(&app, "lessee@example.com", "Theo").await;
        let offer_id = create_offer(&app, &lessor_token).await;

        let (_, booked) = send_json(
            &app,
            "POST",
            &format!("/offers/{offer_id}/bookings"),
            Some(&lessee_token),
            Some(json!({"from_date": "2030-06-01", "to_date": "2030-06-05"})),
        )
        .await;
        let request_id = booked["request_id"].as_i64().unwrap();

        let (status, swept) = send_json(&app, "POST", "/requests/sweep_timeouts", None, None).await;
        assert_eq!(status, HttpStatusCode::OK);
        assert_eq!(
            swept["timed_out_request_ids"].as_array().unwrap(),
            &vec![json!(request_id)]
        );
    }
}
