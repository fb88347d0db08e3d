//! Build endpoint integration tests

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::json;

use scaffoldweb_generator::mock::MockMeshGenerator;
use scaffoldweb_generator::GeneratorRegistry;

use crate::common::{error_code, output_id, TestApp};

#[tokio::test]
async fn test_build_returns_annotated_components() {
    let app = TestApp::spawn().await.unwrap();

    let (status, body) = app
        .get_json("/generator?meshtype=heart_ventricles_1")
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);

    let components = body.as_array().unwrap();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0]["Type"], "Surfaces");
    assert_eq!(components[1]["Type"], "Lines");

    // Follow-up URLs carry consecutive ids in component order.
    let first = output_id(components[0]["URL"].as_str().unwrap());
    let second = output_id(components[1]["URL"].as_str().unwrap());
    assert_eq!(second, first + 1);
}

#[tokio::test]
async fn test_annotated_urls_resolve_to_payloads() {
    let app = TestApp::spawn().await.unwrap();

    let (_, body) = app
        .get_json("/generator?meshtype=sphere_shell_1")
        .await
        .unwrap();
    let components = body.as_array().unwrap();

    let surface_url = components[0]["URL"].as_str().unwrap();
    let (status, surface) = app.get_json(surface_url).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(surface["vertices"].as_array().is_some());
    assert!(surface["faces"].as_array().is_some());

    let lines_url = components[1]["URL"].as_str().unwrap();
    let (status, lines) = app.get_json(lines_url).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(lines["polylines"].as_array().is_some());
}

#[tokio::test]
async fn test_request_options_override_defaults() {
    let app = TestApp::spawn().await.unwrap();

    let response = app
        .get_with_query(
            "/generator",
            &[
                ("meshtype", "sphere_shell_1"),
                ("Number of elements up", "4"),
                ("Number of elements around", "6"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();

    let surface_url = body[0]["URL"].as_str().unwrap();
    let (_, surface) = app.get_json(surface_url).await.unwrap();
    // 5 vertex rows of 6 vertices each
    assert_eq!(surface["vertices"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn test_unknown_meshtype_is_client_error_and_records_nothing() {
    let app = TestApp::spawn().await.unwrap();

    let (status, body) = app.get_json("/generator?meshtype=Heart99").await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "UNKNOWN_MESH_TYPE");

    let (_, jobs) = app.get_json("/jobs").await.unwrap();
    assert!(jobs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_meshtype_is_client_error() {
    let app = TestApp::spawn().await.unwrap();

    let (status, body) = app.get_json("/generator").await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_option_is_client_error() {
    let app = TestApp::spawn().await.unwrap();

    let response = app
        .get_with_query(
            "/generator",
            &[("meshtype", "sphere_shell_1"), ("Wall girth", "3")],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_option_type_mismatch_is_client_error() {
    let app = TestApp::spawn().await.unwrap();

    let response = app
        .get_with_query(
            "/generator",
            &[
                ("meshtype", "sphere_shell_1"),
                ("Number of elements up", "many"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
}

#[test_log::test(tokio::test)]
async fn test_three_blob_build_end_to_end() {
    // Scripted generator: primary with two logical components plus two
    // payload blobs. On a fresh store the resources get ids 1, 2, 3.
    let mut registry = GeneratorRegistry::new();
    registry.register(
        "Heart1",
        Arc::new(MockMeshGenerator::new(vec![
            serde_json::to_vec(&json!([{}, {}])).unwrap(),
            serde_json::to_vec(&json!({"part": "left"})).unwrap(),
            serde_json::to_vec(&json!({"part": "right"})).unwrap(),
        ])),
    );
    let app = TestApp::spawn_with_registry(registry).await.unwrap();

    let (status, body) = app.get_json("/generator?meshtype=Heart1").await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"URL": "/output/2"}, {"URL": "/output/3"}]));

    let (status, third) = app.get_json("/output/3").await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(third, json!({"part": "right"}));
}

#[tokio::test]
async fn test_component_count_mismatch_is_server_error() {
    // Primary references three components but only one payload follows.
    let mut registry = GeneratorRegistry::new();
    registry.register(
        "broken",
        Arc::new(MockMeshGenerator::new(vec![
            serde_json::to_vec(&json!([{}, {}, {}])).unwrap(),
            serde_json::to_vec(&json!({})).unwrap(),
        ])),
    );
    let app = TestApp::spawn_with_registry(registry).await.unwrap();

    let (status, body) = app.get_json("/generator?meshtype=broken").await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error_code(&body), "ANNOTATION_ERROR");
}

#[tokio::test]
async fn test_generator_failure_is_server_error_and_records_nothing() {
    let mut registry = GeneratorRegistry::new();
    registry.register("flaky", Arc::new(MockMeshGenerator::failing()));
    let app = TestApp::spawn_with_registry(registry).await.unwrap();

    let (status, _) = app.get_json("/generator?meshtype=flaky").await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    // Generation failed before the store was touched.
    let (_, jobs) = app.get_json("/jobs").await.unwrap();
    assert!(jobs.as_array().unwrap().is_empty());
}
