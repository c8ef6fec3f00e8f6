use crate::error::AppError;
use crate::models::{ShortenForm, UrlRecord};
use crate::services::allocator::{allocate, is_valid_short_id};
use crate::services::normalize::normalize_url;
use askama::Template;
use axum::extract::{Form, Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::types::HomeQuery;
use super::AppState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    title: &'static str,
    base_url: String,
    urls: Vec<UrlRecord>,
    success: Option<String>,
    short_id: Option<String>,
    original_url: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    title: String,
    message: String,
    back_url: &'static str,
}

/// Error rendered as a themed HTML page, for the non-API routes.
///
/// Internal detail never reaches the page; database and template failures
/// are logged and collapse into a generic server error.
pub struct PageError {
    status: StatusCode,
    title: String,
    message: String,
}

impl PageError {
    pub fn not_found(message: &str) -> Self {
        PageError {
            status: StatusCode::NOT_FOUND,
            title: "URL Not Found".to_string(),
            message: message.to_string(),
        }
    }

    pub fn bad_request(title: &str, message: &str) -> Self {
        PageError {
            status: StatusCode::BAD_REQUEST,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    pub fn internal() -> Self {
        PageError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            title: "Server Error".to_string(),
            message: "Something went wrong on our end. Please try again later.".to_string(),
        }
    }
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => PageError::not_found(
                "The shortened URL you're looking for doesn't exist or has been deactivated.",
            ),
            AppError::InvalidUrl(message) => PageError::bad_request("Invalid URL", &message),
            other => {
                tracing::error!("Page request failed: {}", other);
                PageError::internal()
            }
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let template = ErrorTemplate {
            title: self.title,
            message: self.message,
            back_url: "/",
        };

        match template.render() {
            Ok(body) => (self.status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
            }
        }
    }
}

/// Build a literal 302 Found redirect
fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = StatusCode::FOUND.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        Err(e) => {
            tracing::error!("Invalid redirect location {:?}: {}", location, e);
            PageError::internal().into_response()
        }
    }
}

/// GET / - home page with the shorten form, recent URLs, and the
/// last-action banner carried in the query string
pub async fn home(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> Result<Html<String>, PageError> {
    let urls = state.repository.list_active(state.recent_limit, 0).await?;

    // Resolve banner details for the id we just redirected with. Lookup is
    // unfiltered: a freshly deactivated record still renders its banner.
    let details = match query.short_id.as_deref() {
        Some(short_id) => state.repository.find_by_short_id(short_id).await?,
        None => None,
    };

    let template = IndexTemplate {
        title: "Home",
        base_url: state.base_url.clone(),
        urls,
        success: query.success,
        short_id: details.as_ref().map(|record| record.short_id.clone()),
        original_url: details.map(|record| record.original_url),
    };

    Ok(Html(template.render().map_err(AppError::from)?))
}

/// POST /shorten - create or reuse a short URL, then bounce back to the
/// home page with the outcome in the query string
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ShortenForm>,
) -> Result<Response, PageError> {
    form.validate()
        .map_err(|_| PageError::bad_request("Error", "Please provide a URL to shorten"))?;

    let normalized = normalize_url(&form.original_url)?;

    let allocation = allocate(
        &state.repository,
        &normalized,
        state.short_id_length,
        state.short_id_max_attempts,
    )
    .await?;

    let outcome = if allocation.created {
        "created"
    } else {
        "existing"
    };

    info!(
        short_id = %allocation.record.short_id,
        url = %normalized,
        outcome,
        "Shorten request handled"
    );

    Ok(found(&format!(
        "/?success={}&shortId={}",
        outcome, allocation.record.short_id
    )))
}

/// GET /{shortId} - redirect to the original URL and count the click
pub async fn redirect(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
) -> Result<Response, PageError> {
    if !is_valid_short_id(&short_id) {
        return Err(PageError::not_found(
            "The page you're looking for doesn't exist.",
        ));
    }

    let record = state
        .repository
        .find_active_by_short_id(&short_id)
        .await?
        .ok_or_else(|| {
            warn!(short_id = %short_id, "Short URL not found");
            PageError::not_found(
                "The shortened URL you're looking for doesn't exist or has been deactivated.",
            )
        })?;

    state.repository.increment_clicks(&short_id).await?;

    info!(short_id = %short_id, target = %record.original_url, "Redirecting");

    Ok(found(&record.original_url))
}

/// Fallback for paths no route matched
pub async fn not_found() -> PageError {
    PageError::not_found("The page you're looking for doesn't exist.")
}
