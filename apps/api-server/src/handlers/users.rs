//! User endpoints.

use actix_web::{HttpResponse, web};
use quill_core::domain::SortDirection;
use quill_shared::dto::UserRequest;
use quill_shared::{ApiResponse, Validate};

use super::PageParams;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let users = state.users.list_users().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(users)))
}

/// GET /api/users/page
pub async fn page(
    state: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> AppResult<HttpResponse> {
    let request = params.into_inner().into_request("id", SortDirection::Asc)?;
    let page = state.users.list_users_page(&request).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/users/{id}
pub async fn get(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    let user = state.users.get_user(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

/// POST /api/users
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<UserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let user = state.users.create_user(req).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(user, "User created successfully")))
}

/// PUT /api/users/{id}
pub async fn update(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    body: web::Json<UserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let user = state.users.update_user(id.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(user, "User updated successfully")))
}

/// DELETE /api/users/{id}
pub async fn delete(state: web::Data<AppState>, id: web::Path<i64>) -> AppResult<HttpResponse> {
    state.users.delete_user(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message("User deleted successfully")))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::json;

    use crate::handlers::{configure_routes, read_json};
    use crate::state::AppState;

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(AppState::in_memory()))
                    .configure(configure_routes),
            )
            .await
        };
    }

    fn ada() -> serde_json::Value {
        json!({ "email": "ada@example.com", "name": "Ada", "surname": "Lovelace" })
    }

    #[actix_web::test]
    async fn create_returns_201_with_message() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(ada())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = read_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["email"], "ada@example.com");
        assert!(body["data"]["createdAt"].is_string());
    }

    #[actix_web::test]
    async fn invalid_body_reports_fields() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "email": "nope", "name": "A", "surname": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["data"]["email"].is_string());
        assert!(body["data"]["name"].is_string());
        assert!(body["data"]["surname"].is_string());
    }

    #[actix_web::test]
    async fn duplicate_email_is_400() {
        let app = app!();
        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::post()
                .uri("/api/users")
                .set_json(ada())
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), expected);
        }
    }

    #[actix_web::test]
    async fn missing_user_is_404() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/users/42").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = read_json(resp).await;
        assert_eq!(body["message"], "User not found with id 42");
    }

    #[actix_web::test]
    async fn non_numeric_id_is_400() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/users/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn update_then_delete() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(ada())
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::put()
            .uri("/api/users/1")
            .set_json(json!({ "email": "ada@example.com", "name": "Augusta", "surname": "King" }))
            .to_request();
        let body = read_json(test::call_service(&app, req).await).await;
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["data"]["name"], "Augusta");

        let req = test::TestRequest::delete().uri("/api/users/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["message"], "User deleted successfully");
        assert!(body.get("data").is_none());

        let req = test::TestRequest::delete().uri("/api/users/1").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[actix_web::test]
    async fn page_uses_defaults_and_rejects_bad_input() {
        let app = app!();
        let req = test::TestRequest::get().uri("/api/users/page").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = read_json(resp).await;
        assert_eq!(body["data"]["page"], 0);
        assert_eq!(body["data"]["size"], 10);
        assert_eq!(body["data"]["totalElements"], 0);
        assert_eq!(body["data"]["totalPages"], 0);

        for uri in [
            "/api/users/page?size=0",
            "/api/users/page?page=-1",
            "/api/users/page?sortBy=password",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            assert_eq!(
                test::call_service(&app, req).await.status(),
                StatusCode::BAD_REQUEST,
                "{uri}"
            );
        }
    }
}
