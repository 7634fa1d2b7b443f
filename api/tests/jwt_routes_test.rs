//! Integration tests for the JWT routes

mod common;

use actix_web::{http::header, http::StatusCode, test, web, App, HttpResponse};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use sk_api::create_app;
use sk_api::dto::TokenResponse;
use sk_api::middleware::auth::{AuthenticatedToken, JwtAuth};
use sk_core::domain::entities::TokenDetails;

#[actix_web::test]
async fn test_create_token_returns_json_by_default() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::post()
        .uri("/jwt/create_token")
        .set_json(json!({"sub": "alice", "kid": "0", "favourite": 7}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: TokenResponse = test::read_body_json(resp).await;
    assert_eq!(body.token.split('.').count(), 3);
    assert_eq!(body.header.kid, "0");
    assert_eq!(body.claims.sub, "alice");
    assert_eq!(body.claims.favourite, 7);
    let iat = body.claims.iat.unwrap();
    assert_eq!(body.claims.exp.unwrap() - iat, 300.0);
    assert!((Utc::now().timestamp() as f64 - iat).abs() <= 5.0);
}

#[actix_web::test]
async fn test_create_token_as_application_jwt() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::post()
        .uri("/jwt/create_token")
        .insert_header((header::ACCEPT, "application/jwt"))
        .set_json(json!({"sub": "bob", "kid": "1", "favourite": 3}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/jwt"
    );

    let body = test::read_body(resp).await;
    let compact = std::str::from_utf8(&body).unwrap();
    assert_eq!(compact.split('.').count(), 3);

    let verified = common::token_service()
        .verify::<TokenDetails>(&format!("Bearer {}", compact))
        .unwrap();
    assert_eq!(verified.header().kid, "1");
}

#[actix_web::test]
async fn test_create_token_rejects_unknown_kid() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::post()
        .uri("/jwt/create_token")
        .set_json(json!({"sub": "alice", "kid": "7", "favourite": 7}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "unknown_key_id");
}

#[actix_web::test]
async fn test_create_token_validates_body() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::post()
        .uri("/jwt/create_token")
        .set_json(json!({"sub": "", "kid": "0", "favourite": 7}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}

#[actix_web::test]
async fn test_create_token_malformed_json_uses_error_body() {
    let app = test::init_service(create_app(common::state())).await;

    for body in [r#"{"sub": "alice", "kid": "0""#, r#"{"sub": "alice"}"#] {
        let req = test::TestRequest::post()
            .uri("/jwt/create_token")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation_error");
        assert!(body["timestamp"].is_string());
    }
}

#[actix_web::test]
async fn test_protected_echoes_valid_token() {
    let app = test::init_service(create_app(common::state())).await;
    let token = common::token_service()
        .issue(&TokenDetails::new("alice", "0", 7))
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/jwt/protected")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: TokenResponse = test::read_body_json(resp).await;
    assert_eq!(body.token, token.as_str());
    assert_eq!(&body.claims, token.claims());
}

#[actix_web::test]
async fn test_protected_rejects_bad_credentials() {
    let app = test::init_service(create_app(common::state())).await;
    let token = common::token_service()
        .issue(&TokenDetails::new("alice", "1", 7))
        .unwrap();
    let mut tampered = token.as_str().to_string();
    tampered.push_str("AA");

    let cases = vec![
        None,
        Some(format!("Basic {}", token)),
        Some(format!("Bearer  {}", token)),
        Some(token.as_str().to_string()),
        Some("Bearer not-a-token".to_string()),
        Some(format!("Bearer {}", tampered)),
    ];

    for authorization in cases {
        let mut req = test::TestRequest::get().uri("/jwt/protected");
        if let Some(value) = &authorization {
            req = req.insert_header((header::AUTHORIZATION, value.as_str()));
        }
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(
            resp.status(),
            StatusCode::UNAUTHORIZED,
            "authorization {:?}",
            authorization
        );
    }
}

#[actix_web::test]
async fn test_protected_rejects_expired_token_as_bad_request() {
    let app = test::init_service(create_app(common::state())).await;
    let expired = common::token_service()
        .issue_at(
            &TokenDetails::new("alice", "0", 7),
            Utc::now() - Duration::seconds(301),
        )
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/jwt/protected")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", expired)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "token_expired");
}

#[actix_web::test]
async fn test_refresh_with_raw_body() {
    let app = test::init_service(create_app(common::state())).await;
    let service = common::token_service();
    let original = service
        .issue_at(
            &TokenDetails::new("alice", "1", 7),
            Utc::now() - Duration::seconds(120),
        )
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/refreshJWT")
        .insert_header((header::CONTENT_TYPE, "application/jwt"))
        .insert_header((header::ACCEPT, "application/jwt"))
        .set_payload(original.to_string())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = test::read_body(resp).await;
    let refreshed = service
        .verify::<TokenDetails>(&format!("Bearer {}", std::str::from_utf8(&body).unwrap()))
        .unwrap();
    assert_eq!(refreshed.header().kid, "1");
    assert_eq!(refreshed.claims().sub, "alice");
    assert_eq!(refreshed.claims().favourite, 7);
    assert!(refreshed.claims().iat.unwrap() > original.claims().iat.unwrap());
}

#[actix_web::test]
async fn test_refresh_with_json_body() {
    let app = test::init_service(create_app(common::state())).await;
    let original = common::token_service()
        .issue(&TokenDetails::new("carol", "0", 1))
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/refreshJWT")
        .set_json(json!({"token": original.as_str()}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: TokenResponse = test::read_body_json(resp).await;
    assert_eq!(body.claims.sub, "carol");
    assert_eq!(body.header.kid, "0");
}

#[actix_web::test]
async fn test_refresh_rejects_expired_and_invalid_tokens() {
    let app = test::init_service(create_app(common::state())).await;
    let expired = common::token_service()
        .issue_at(
            &TokenDetails::new("alice", "0", 7),
            Utc::now() - Duration::seconds(600),
        )
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/refreshJWT")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload(expired.to_string())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/refreshJWT")
        .insert_header((header::CONTENT_TYPE, "text/plain"))
        .set_payload("garbage")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_jwt_routes_absent_without_keys() {
    let app = test::init_service(create_app(common::state_without_keys())).await;

    let req = test::TestRequest::post()
        .uri("/jwt/create_token")
        .set_json(json!({"sub": "alice", "kid": "0", "favourite": 7}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The rest of the server keeps working
    let req = test::TestRequest::get().uri("/database").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_guard_without_token_service_is_internal_error() {
    async fn handler(token: AuthenticatedToken<TokenDetails>) -> HttpResponse {
        HttpResponse::Ok().body(token.0.claims().sub.clone())
    }

    let app = test::init_service(
        App::new().service(
            web::resource("/guarded")
                .wrap(JwtAuth::<TokenDetails>::new())
                .route(web::get().to(handler)),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/guarded")
        .insert_header((header::AUTHORIZATION, "Bearer a.b.c"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[actix_web::test]
async fn test_extractor_without_guard_is_unauthorized() {
    async fn handler(token: AuthenticatedToken<TokenDetails>) -> HttpResponse {
        HttpResponse::Ok().body(token.0.claims().sub.clone())
    }

    let app = test::init_service(App::new().route("/open", web::get().to(handler))).await;

    let req = test::TestRequest::get().uri("/open").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
