//! Jurisdiction HTTP handlers.
//!
//! Endpoints:
//! - GET /api/v1/states                          - Enabled guides
//! - GET /api/v1/states/{code}/search?q=&k=      - Similarity search
//! - GET /api/v1/states/{code}/similar?license_type=&k=
//! - GET /api/v1/states/{code}/steps
//! - GET /api/v1/states/{code}/categories
//! - GET /api/v1/states/{code}/resources?category=

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use licnav_core::jurisdiction::box_guide::BoxLicenseGuide;
use licnav_types::jurisdiction::{BusinessStep, GuideInfo, ResourceLink};
use licnav_types::license::{SearchHit, SearchMethod};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Upper bound on `k` so one request cannot ask for the whole index.
const MAX_K: usize = 50;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarQuery {
    pub license_type: String,
    pub k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ResourcesQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub jurisdiction: String,
    pub method: SearchMethod,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct Steps {
    pub jurisdiction: String,
    pub steps: Vec<BusinessStep>,
    pub total_cost: Option<String>,
    pub total_timeline: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Categories {
    pub jurisdiction: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct Resources {
    pub jurisdiction: String,
    pub resources: Vec<ResourceLink>,
}

fn guide<'a>(state: &'a AppState, code: &str) -> Result<&'a BoxLicenseGuide, AppError> {
    state
        .registry()
        .get(code)
        .ok_or_else(|| AppError::NotFound(format!("Jurisdiction '{code}' is not enabled")))
}

fn clamp_k(k: Option<usize>, default: usize) -> Result<usize, AppError> {
    match k {
        Some(0) => Err(AppError::Validation("k must be at least 1".to_string())),
        Some(k) => Ok(k.min(MAX_K)),
        None => Ok(default),
    }
}

/// GET /api/v1/states
pub async fn list_states(State(state): State<AppState>) -> Json<ApiResponse<Vec<GuideInfo>>> {
    let timer = RequestTimer::start();
    timer.respond(state.registry().infos())
}

/// Feed a search outcome into the service metrics.
fn record_search(state: &AppState, timer: &RequestTimer, result: &Result<SearchResults, AppError>) {
    state.metrics.record_request(timer.elapsed(), result.is_ok());
    if let Ok(results) = result {
        state.metrics.record_usage(&results.jurisdiction, None);
    }
}

/// GET /api/v1/states/{code}/search
pub async fn search(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResults>>, AppError> {
    let timer = RequestTimer::start();
    let result = run_search(&state, &code, &query).await;
    record_search(&state, &timer, &result);
    Ok(timer.respond(result?))
}

async fn run_search(state: &AppState, code: &str, query: &SearchQuery) -> Result<SearchResults, AppError> {
    if query.q.trim().is_empty() {
        return Err(AppError::Validation("q must not be empty".to_string()));
    }
    let k = clamp_k(query.k, state.config.retrieval.top_k)?;
    let guide = guide(state, code)?;

    let result = guide.lookup(&query.q, k).await;
    Ok(SearchResults {
        jurisdiction: guide.code().to_string(),
        method: result.method,
        hits: result.hits,
    })
}

/// GET /api/v1/states/{code}/similar
pub async fn similar(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<SimilarQuery>,
) -> Result<Json<ApiResponse<SearchResults>>, AppError> {
    let timer = RequestTimer::start();
    let result = run_similar(&state, &code, &query).await;
    record_search(&state, &timer, &result);
    Ok(timer.respond(result?))
}

async fn run_similar(state: &AppState, code: &str, query: &SimilarQuery) -> Result<SearchResults, AppError> {
    if query.license_type.trim().is_empty() {
        return Err(AppError::Validation("license_type must not be empty".to_string()));
    }
    let k = clamp_k(query.k, state.config.retrieval.similar_top_k)?;
    let guide = guide(state, code)?;

    let result = guide.find_similar(&query.license_type, k).await;
    Ok(SearchResults {
        jurisdiction: guide.code().to_string(),
        method: result.method,
        hits: result.hits,
    })
}

/// GET /api/v1/states/{code}/steps
pub async fn steps(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Steps>>, AppError> {
    let timer = RequestTimer::start();
    let profile = guide(&state, &code)?.profile();
    Ok(timer.respond(Steps {
        jurisdiction: profile.code.clone(),
        steps: profile.steps.clone(),
        total_cost: profile.steps_total_cost.clone(),
        total_timeline: profile.steps_total_timeline.clone(),
    }))
}

/// GET /api/v1/states/{code}/categories
pub async fn categories(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<Categories>>, AppError> {
    let timer = RequestTimer::start();
    let guide = guide(&state, &code)?;
    Ok(timer.respond(Categories {
        jurisdiction: guide.code().to_string(),
        categories: guide.license_categories(),
    }))
}

/// GET /api/v1/states/{code}/resources
pub async fn resources(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<ResourcesQuery>,
) -> Result<Json<ApiResponse<Resources>>, AppError> {
    let timer = RequestTimer::start();
    let profile = guide(&state, &code)?.profile();
    let resources = profile
        .resources
        .iter()
        .filter(|r| {
            query
                .category
                .as_deref()
                .is_none_or(|c| r.category.eq_ignore_ascii_case(c))
        })
        .cloned()
        .collect();
    Ok(timer.respond(Resources {
        jurisdiction: profile.code.clone(),
        resources,
    }))
}
