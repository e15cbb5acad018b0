//! Authentication handlers.

use actix_web::{HttpResponse, web};

use agora_core::services::SignupInput;
use agora_shared::dto::{
    LoginRequest, LoginResponse, SignupRequest, SignupResponse, StatusResponse,
    UpdateStatusRequest,
};

use crate::middleware::{AppResult, Identity};
use crate::state::AppState;

/// PUT /auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .auth
        .signup(SignupInput {
            email: req.email,
            name: req.name,
            password: req.password,
        })
        .await?;

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User created!".to_string(),
        user_id: user.id.to_string(),
    }))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let outcome = state.auth.login(&body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: outcome.token,
        user_id: outcome.user_id.to_string(),
        expires_in: outcome.expires_in,
    }))
}

/// GET /auth/status - Protected route
pub async fn get_status(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let status = state.auth.status(identity.user_id).await?;

    Ok(HttpResponse::Ok().json(StatusResponse {
        message: "Success".to_string(),
        status,
    }))
}

/// PATCH /auth/status - Protected route
pub async fn update_status(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateStatusRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .auth
        .update_status(identity.user_id, &body.status)
        .await?;

    Ok(HttpResponse::Ok().json(StatusResponse {
        message: "Status updated.".to_string(),
        status: user.status,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::header, test};
    use serde_json::json;

    use agora_core::domain::DEFAULT_STATUS;
    use agora_core::ports::TokenService;

    use crate::handlers::test_support::{TestContext, test_app};

    #[actix_web::test]
    async fn test_signup_then_login() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::put()
            .uri("/auth/signup")
            .set_json(json!({"email": "a@x.com", "name": "Alice", "password": "secret1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let created: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(created["message"], "User created!");

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({"email": "a@x.com", "password": "secret1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["userId"], created["userId"]);
        assert_eq!(body["expiresIn"], 3600);
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[actix_web::test]
    async fn test_signup_duplicate_and_invalid() {
        let ctx = TestContext::new();
        ctx.user("a@x.com", "Alice").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::put()
            .uri("/auth/signup")
            .set_json(json!({"email": "A@X.COM", "name": "Alice", "password": "secret1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);

        let req = test::TestRequest::put()
            .uri("/auth/signup")
            .set_json(json!({"email": "bad", "name": "", "password": "123"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    }

    #[actix_web::test]
    async fn test_login_failures_share_one_response() {
        let ctx = TestContext::new();
        ctx.user("a@x.com", "Alice").await;
        let app = test_app!(ctx);

        let mut bodies = Vec::new();
        for (email, password) in [("a@x.com", "wrong-pass"), ("nobody@x.com", "secret1")] {
            let req = test::TestRequest::post()
                .uri("/auth/login")
                .set_json(json!({"email": email, "password": password}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 401);
            bodies.push(test::read_body(resp).await);
        }

        assert_eq!(bodies[0], bodies[1]);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/auth/login")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["statusCode"], 400);
    }

    #[actix_web::test]
    async fn test_status_requires_token_and_updates() {
        let ctx = TestContext::new();
        let (bearer, _) = ctx.user("a@x.com", "Alice").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::get().uri("/auth/status").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 401);

        let req = test::TestRequest::get()
            .uri("/auth/status")
            .insert_header((header::AUTHORIZATION, bearer.clone()))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], DEFAULT_STATUS);

        let req = test::TestRequest::patch()
            .uri("/auth/status")
            .insert_header((header::AUTHORIZATION, bearer.clone()))
            .set_json(json!({"status": "Shipping code"}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "Shipping code");

        let req = test::TestRequest::patch()
            .uri("/auth/status")
            .insert_header((header::AUTHORIZATION, bearer))
            .set_json(json!({"status": "   "}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 422);
    }

    #[actix_web::test]
    async fn test_status_for_token_of_unknown_user_is_forbidden() {
        let ctx = TestContext::new();
        let token = ctx
            .state
            .tokens
            .generate_token(uuid::Uuid::new_v4(), "ghost@x.com")
            .unwrap();
        let app = test_app!(ctx);

        let req = test::TestRequest::get()
            .uri("/auth/status")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();

        assert_eq!(test::call_service(&app, req).await.status(), 403);
    }
}
