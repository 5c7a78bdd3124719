//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::controller::{MapPage, MapQuery, SearchForm, load_map_view};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/places/search", get(search_places))
        .route("/search", get(submit_search))
        .route("/map", get(map_page))
        .route("/api/route", get(route_api))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint, with the directory's load status.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        directory: state.directory.status().await,
    })
}

fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// Search page.
async fn index_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let status = state.directory.status().await;
    let notice = match status.last_error {
        Some(_) if status.places == 0 => {
            Some("The list of places is unavailable right now. Please try again later.".into())
        }
        _ => None,
    };
    render(&IndexTemplate::blank(notice))
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Autocomplete: places whose name contains `q`.
async fn search_places(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<PlaceSearchRequest>,
) -> Result<Response, AppError> {
    let mut places = state.directory.search(&req.q).await;
    if let Some(limit) = req.limit {
        places.truncate(limit);
    }

    if accepts_html(&headers) {
        let field = match req.field.as_deref() {
            Some("to") => "to",
            _ => "from",
        };
        let template = SuggestionsTemplate {
            field: field.to_string(),
            places,
        };
        Ok(render(&template)?.into_response())
    } else {
        Ok(Json(PlaceSearchResponse { places }).into_response())
    }
}

/// Search form submit: on to the map, or back with a message.
async fn submit_search(
    State(state): State<AppState>,
    Query(req): Query<SearchSubmitRequest>,
) -> Result<Response, AppError> {
    let index = state.directory.index().await;
    let form = SearchForm::filled(&req.from, &req.to);

    match form.submit(&index) {
        Ok(nav) => Ok(Redirect::to(&nav.url).into_response()),
        Err(e) => {
            let html = render(&IndexTemplate::rejected(&form, &e))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
    }
}

/// Map view.
async fn map_page(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Html<String>, AppError> {
    let index = state.directory.index().await;
    let page = load_map_view(&query, &index, state.routes.as_ref(), (*state.map).clone()).await;

    match page {
        MapPage::Ready(ready) => {
            let template = MapTemplate::new(&ready).map_err(|e| AppError::Internal {
                message: format!("Scene serialization error: {}", e),
            })?;
            render(&template)
        }
        MapPage::Error { message } => render(&ErrorTemplate {
            title: "No route".to_string(),
            message,
        }),
    }
}

/// The map view pipeline as JSON.
async fn route_api(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Json<RouteApiResponse>, AppError> {
    let index = state.directory.index().await;
    let page = load_map_view(&query, &index, state.routes.as_ref(), (*state.map).clone()).await;

    match page {
        MapPage::Ready(ready) => Ok(Json(RouteApiResponse::from_ready(*ready))),
        MapPage::Error { message } => Err(AppError::Unprocessable { message }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Unprocessable { message: String },
    Internal { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
