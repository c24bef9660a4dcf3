//! Library routes for the signed-in user.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::app::{current_identity, json_error, Services};
use crate::backend::BackendError;
use crate::routing::{ChainError, RequestContext};

#[derive(Debug, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub file_name: String,
}

pub async fn list(services: Services, ctx: RequestContext) -> Result<Response, ChainError> {
    let user = current_identity(&ctx)?;
    let books = services.library.books_for(user.user_id).await?;
    Ok(Json(books).into_response())
}

/// Add a book owned by the signed-in user.
pub async fn add(services: Services, mut ctx: RequestContext) -> Result<Response, ChainError> {
    let user = current_identity(&ctx)?;
    let book = match ctx.json::<NewBook>(services.max_body_bytes).await? {
        Ok(book) => book,
        Err(e) => return Ok(json_error(StatusCode::BAD_REQUEST, e)),
    };
    if book.title.trim().is_empty() || book.file_name.trim().is_empty() {
        return Ok(json_error(
            StatusCode::BAD_REQUEST,
            BackendError::InvalidInput("title and file_name are required".to_string()),
        ));
    }

    let book = services
        .library
        .add_book(user.user_id, book.title.trim(), book.file_name.trim())
        .await?;
    tracing::info!(user = %user.username, book = book.id, "Book added");
    Ok((StatusCode::CREATED, Json(book)).into_response())
}
