use crate::models::{ImageFilter, ImagesResponse};
use crate::startup::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

/// `GET /api/images?class=<code>`
///
/// A query string that does not decode (a repeated `class`, for instance)
/// is treated as no filter at all.
#[tracing::instrument(skip(state, query))]
pub async fn list_images(
    State(state): State<AppState>,
    query: Result<Query<ImageFilter>, QueryRejection>,
) -> Json<ImagesResponse> {
    let filter = match query {
        Ok(Query(filter)) => filter,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Ignoring undecodable image query");
            ImageFilter::default()
        }
    };

    let images = state
        .store
        .query(&filter, state.config.limits.images_query_limit)
        .await;

    tracing::debug!(class = ?filter.class, returned = images.len(), "Listed image records");

    Json(ImagesResponse {
        success: true,
        images,
    })
}
