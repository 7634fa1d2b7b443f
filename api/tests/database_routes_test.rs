//! Integration tests for the grade routes, health check and fallback

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};

use sk_api::create_app;
use sk_core::domain::entities::Grade;

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_unknown_path_is_json_not_found() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::get().uri("/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

#[actix_web::test]
async fn test_grade_lifecycle() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::get().uri("/database").to_request();
    let grades: Vec<Grade> = test::call_and_read_body_json(&app, req).await;
    assert!(grades.is_empty());

    for (course, grade) in [("Maths", 80), ("English", 65), ("Maths", 92)] {
        let req = test::TestRequest::post()
            .uri("/database")
            .set_json(json!({"course": course, "grade": grade}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let saved: Grade = test::read_body_json(resp).await;
        assert_eq!(saved, Grade::new(course, grade));
    }

    let req = test::TestRequest::get().uri("/database").to_request();
    let grades: Vec<Grade> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(grades.len(), 3);
    assert_eq!(grades[0], Grade::new("Maths", 80));

    let req = test::TestRequest::get()
        .uri("/database?course=Maths")
        .to_request();
    let grades: Vec<Grade> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(grades, vec![Grade::new("Maths", 80), Grade::new("Maths", 92)]);

    let req = test::TestRequest::delete().uri("/database").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/database").to_request();
    let grades: Vec<Grade> = test::call_and_read_body_json(&app, req).await;
    assert!(grades.is_empty());
}

#[actix_web::test]
async fn test_delete_one_is_accepted_without_effect() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::post()
        .uri("/database")
        .set_json(json!({"course": "Art", "grade": 70}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete().uri("/database/0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/database").to_request();
    let grades: Vec<Grade> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(grades.len(), 1);
}

#[actix_web::test]
async fn test_malformed_grade_is_rejected() {
    let app = test::init_service(create_app(common::state())).await;

    let req = test::TestRequest::post()
        .uri("/database")
        .set_json(json!({"course": "Art", "grade": "A+"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "validation_error");
}
