//! Post endpoints.

use actix_web::{HttpResponse, web};
use quill_core::domain::SortDirection;
use quill_shared::dto::PostRequest;
use quill_shared::{ApiResponse, Validate};
use serde::Deserialize;

use super::PageParams;
use crate::middleware::error::AppResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    keyword: String,
}

fn newest_first(params: web::Query<PageParams>) -> AppResult<quill_core::domain::PageRequest> {
    params.into_inner().into_request("createdAt", SortDirection::Desc)
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/page
pub async fn page(
    state: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let request = newest_first(params)?;
    let page = state.posts.list_posts_page(&request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let post = state.posts.get_post(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /api/posts/user/{user_id}
pub async fn by_user(
    state: web::Data<AppState>,
    user_id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_posts_by_user(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/user/{user_id}/page
pub async fn by_user_page(
    state: web::Data<AppState>,
    user_id: web::Path<i64>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let request = newest_first(params)?;
    let page = state
        .posts
        .list_posts_by_user_page(user_id.into_inner(), &request)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/posts/search?keyword=
pub async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let posts = state.posts.search_posts(&params.keyword).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/search/page?keyword=
pub async fn search_page(
    state: web::Data<AppState>,
    search: web::Query<SearchParams>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let request = newest_first(params)?;
    let page = state.posts.search_posts_page(&search.keyword, &request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate_for_create()?;

    let post = state.posts.create_post(req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(post, "Post created successfully")))
}

/// PUT /api/posts/{id}
///
/// `userId` in the body is ignored; a post never changes owner.
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let post = state.posts.update_post(id.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(post, "Post updated successfully")))
}

/// DELETE /api/posts/{id}
pub async fn delete(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    state.posts.delete_post(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("Post deleted successfully")))
}
