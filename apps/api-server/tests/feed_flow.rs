//! End-to-end feed scenario over the public REST surface.

use std::sync::Arc;

use actix_web::{App, http::header, test, web};
use serde_json::{Value, json};

use agora_core::domain::FeedEvent;
use agora_infra::{BroadcastNotifier, JwtConfig};
use api_server::handlers::{configure_extractors, configure_routes};
use api_server::middleware::AuthMiddleware;
use api_server::AppState;

const BOUNDARY: &str = "feed-flow-boundary";

fn multipart(title: &str, content: &str, file_name: &str) -> Vec<u8> {
    let mut body = String::new();
    for (name, value) in [("title", title), ("content", content)] {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\nnot-really-a-png\r\n--{BOUNDARY}--\r\n"
    ));
    body.into_bytes()
}

#[actix_web::test]
async fn signup_login_post_list_delete() {
    let dir = tempfile::tempdir().unwrap();
    let notifier = Arc::new(BroadcastNotifier::default());
    let mut events = notifier.subscribe();
    let state = AppState::in_memory(
        dir.path(),
        JwtConfig {
            secret: "feed-flow-secret".to_string(),
            ..JwtConfig::default()
        },
        notifier.clone(),
        2,
    );

    let upload_dir = dir.path().to_path_buf();
    let app = test::init_service(
        App::new()
            .wrap(AuthMiddleware::new(state.tokens.clone()))
            .app_data(web::Data::new(state.clone()))
            .configure(configure_extractors)
            .configure(|cfg| configure_routes(cfg, &upload_dir)),
    )
    .await;

    // Sign up and log in.
    let req = test::TestRequest::put()
        .uri("/auth/signup")
        .set_json(json!({"email": "a@x.com", "name": "Alice", "password": "secret1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let signup: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "a@x.com", "password": "secret1"}))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(login["userId"], signup["userId"]);
    let bearer = format!("Bearer {}", login["token"].as_str().unwrap());

    // Create a post with an image.
    let req = test::TestRequest::post()
        .uri("/feed/post")
        .insert_header((header::AUTHORIZATION, bearer.clone()))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart("Hello World", "First post!", "hello.png"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let created: Value = test::read_body_json(resp).await;
    let post_id = created["post"]["id"].as_str().unwrap().to_string();

    // It heads the first page.
    let req = test::TestRequest::get().uri("/feed/posts?page=1").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["posts"][0]["id"], post_id.as_str());
    assert_eq!(page["posts"][0]["title"], "Hello World");

    // Delete it; it is gone along with its image.
    let req = test::TestRequest::delete()
        .uri(&format!("/feed/post/{post_id}"))
        .insert_header((header::AUTHORIZATION, bearer))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/feed/post/{post_id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

    // Realtime clients saw both mutations, in order.
    assert!(matches!(events.try_recv().unwrap(), FeedEvent::Create { .. }));
    match events.try_recv().unwrap() {
        FeedEvent::Delete { post_id: deleted } => assert_eq!(deleted.to_string(), post_id),
        other => panic!("unexpected event: {other:?}"),
    }
}
