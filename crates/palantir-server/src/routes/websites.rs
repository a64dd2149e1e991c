use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use palantir_duckdb::website::{CreateWebsiteParams, UpdateWebsiteParams};

use crate::{error::AppError, state::AppState};

const MAX_FIELD_LEN: usize = 255;

#[derive(Debug, Deserialize)]
pub struct CreateWebsiteRequest {
    pub name: String,
    pub domain: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateWebsiteRequest {
    pub name: Option<String>,
    pub domain: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListWebsitesQuery {
    pub limit: Option<i64>,
    pub cursor: Option<String>,
}

fn validate_field(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {MAX_FIELD_LEN} characters"
        )));
    }
    Ok(())
}

/// `POST /api/websites`: Create a new website.
#[tracing::instrument(skip(state))]
pub async fn create_website(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateWebsiteRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_field("name", &req.name)?;
    validate_field("domain", &req.domain)?;

    let website = state
        .db
        .create_website(CreateWebsiteParams {
            name: req.name,
            domain: req.domain,
        })
        .await
        .map_err(AppError::Internal)?;

    tracing::info!(website_id = %website.id, "Website created");

    Ok((StatusCode::CREATED, Json(json!({ "data": website }))))
}

/// `GET /api/websites`: List websites with cursor pagination.
pub async fn list_websites(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListWebsitesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let cursor = query.cursor.as_deref();

    let (websites, total, has_more) = state
        .db
        .list_websites(limit, cursor)
        .await
        .map_err(AppError::Internal)?;

    let next_cursor = if has_more {
        websites.last().map(|w| w.id.clone())
    } else {
        None
    };

    Ok(Json(json!({
        "data": websites,
        "pagination": {
            "total": total,
            "limit": limit,
            "cursor": next_cursor,
            "has_more": has_more,
        }
    })))
}

/// `GET /api/websites/{id}`
pub async fn get_website(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let website = state
        .db
        .get_website(&website_id)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Website not found".to_string()))?;

    Ok(Json(json!({ "data": website })))
}

/// `PUT /api/websites/{id}`: Update a website's name and/or domain.
pub async fn update_website(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
    Json(req): Json<UpdateWebsiteRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(ref name) = req.name {
        validate_field("name", name)?;
    }
    if let Some(ref domain) = req.domain {
        validate_field("domain", domain)?;
    }

    let result = state
        .db
        .update_website(
            &website_id,
            UpdateWebsiteParams {
                name: req.name,
                domain: req.domain,
            },
        )
        .await
        .map_err(AppError::Internal)?;

    match result {
        Some(website) => Ok(Json(json!({ "data": website }))),
        None => Err(AppError::NotFound("Website not found".to_string())),
    }
}

/// `DELETE /api/websites/{id}`: Delete a website and all of its analytics data.
pub async fn delete_website(
    State(state): State<Arc<AppState>>,
    Path(website_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .db
        .delete_website(&website_id)
        .await
        .map_err(AppError::Internal)?;

    if !deleted {
        return Err(AppError::NotFound("Website not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
