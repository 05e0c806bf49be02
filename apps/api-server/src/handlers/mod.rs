//! HTTP handlers and route configuration.

mod health;
mod posts;
mod users;

use actix_web::{HttpRequest, error, web};
use quill_core::domain::{PageRequest, SortDirection};
use quill_shared::ValidationErrors;
use serde::Deserialize;

use crate::middleware::error::{AppError, AppResult};

/// Configure all application routes.
///
/// Literal segments (`/page`, `/search`) are registered before `/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject_input))
        .app_data(web::QueryConfig::default().error_handler(reject_input))
        .app_data(web::PathConfig::default().error_handler(reject_input))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/users")
                        .route("", web::get().to(users::list))
                        .route("", web::post().to(users::create))
                        .route("/page", web::get().to(users::page))
                        .route("/{id}", web::get().to(users::get))
                        .route("/{id}", web::put().to(users::update))
                        .route("/{id}", web::delete().to(users::delete)),
                )
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(posts::list))
                        .route("", web::post().to(posts::create))
                        .route("/page", web::get().to(posts::page))
                        .route("/search", web::get().to(posts::search))
                        .route("/search/page", web::get().to(posts::search_page))
                        .route("/user/{user_id}", web::get().to(posts::by_user))
                        .route("/user/{user_id}/page", web::get().to(posts::by_user_page))
                        .route("/{id}", web::get().to(posts::get))
                        .route("/{id}", web::put().to(posts::update))
                        .route("/{id}", web::delete().to(posts::delete)),
                ),
        );
}

/// Malformed bodies, query strings and path ids become enveloped 400s.
fn reject_input<E: std::fmt::Display>(err: E, _req: &HttpRequest) -> error::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// `?page=&size=&sortBy=&sortDir=` on every paginated read.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    page: Option<u64>,
    size: Option<u64>,
    sort_by: Option<String>,
    sort_dir: Option<String>,
}

impl PageParams {
    /// Fill in the endpoint's defaults. A page size below one is rejected.
    fn into_request(self, default_sort: &str, default_dir: SortDirection) -> AppResult<PageRequest> {
        let size = self.size.unwrap_or(10);
        if size < 1 {
            let mut errors = ValidationErrors::new();
            errors.add("size", "size must be at least 1");
            return Err(errors.into());
        }

        let direction = self
            .sort_dir
            .as_deref()
            .map_or(default_dir, SortDirection::parse);

        Ok(PageRequest::new(
            self.page.unwrap_or(0),
            size,
            self.sort_by.unwrap_or_else(|| default_sort.to_string()),
            direction,
        ))
    }
}

/// Parse a JSON response body in handler tests.
#[cfg(test)]
pub(crate) async fn read_json<B: actix_web::body::MessageBody>(
    resp: actix_web::dev::ServiceResponse<B>,
) -> serde_json::Value {
    actix_web::test::read_body_json(resp).await
}
