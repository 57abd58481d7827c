//! End-to-end coverage of the create-post action: service semantics and the
//! admin HTTP surface, driven against in-memory repository fakes.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use time::macros::datetime;
use tower::ServiceExt;

use redazione::application::admin::posts::CreatePostCommand;
use redazione::application::meta::{self, MetaFields};
use redazione::domain::types::{PublicationStatus, SettingValue, modules};
use redazione::infra::http::build_admin_router;
use redazione::infra::images::ImagePayload;

use common::{TINY_PNG, admin_state, post_harness};

fn command(status: PublicationStatus) -> CreatePostCommand {
    CreatePostCommand {
        title: "Hello World".to_string(),
        introduction: "<p>intro</p>".to_string(),
        text: "<p>body</p>".to_string(),
        category_id: 3,
        user_id: 7,
        language: "en".parse().expect("language"),
        hidden: false,
        allow_comments: true,
        publish_on: datetime!(2026-08-07 10:00 UTC),
        status,
        tags: vec!["rust".to_string(), "backend".to_string()],
        meta: meta::prepare(MetaFields::default(), "Hello World").expect("meta"),
        image: None,
    }
}

fn png_payload() -> ImagePayload {
    ImagePayload {
        extension: "png".to_string(),
        data: Bytes::from_static(TINY_PNG),
    }
}

#[tokio::test]
async fn active_posts_are_persisted_tagged_and_indexed() {
    let harness = post_harness();

    let post = harness
        .service
        .create_post(command(PublicationStatus::Active))
        .await
        .expect("create");

    assert_eq!(post.item_id, 1);
    assert_eq!(post.revision_id, 1);
    assert_eq!(post.status, PublicationStatus::Active);
    assert_eq!(post.num_comments, 0);

    let revisions = harness.content.revisions().await;
    assert_eq!(revisions.len(), 1);
    assert_eq!(revisions[0].meta_id, 1);
    assert_eq!(revisions[0].created_on, revisions[0].edited_on);

    let tags = harness.tags.saved().await;
    assert_eq!(
        tags,
        vec![(
            1,
            vec!["rust".to_string(), "backend".to_string()],
            modules::BLOG.to_string()
        )]
    );

    let entries = harness.search.entries().await;
    assert_eq!(entries.len(), 1);
    let (module, item_id, fields) = &entries[0];
    assert_eq!(module, modules::BLOG);
    assert_eq!(*item_id, 1);
    assert!(fields.iter().any(|(name, value)| name == "title" && value == "Hello World"));
    assert!(fields.iter().any(|(name, _)| name == "text"));
}

#[tokio::test]
async fn item_ids_continue_from_the_existing_maximum() {
    let harness = post_harness();
    harness.content.seed_max_item_id(41).await;

    let post = harness
        .service
        .create_post(command(PublicationStatus::Active))
        .await
        .expect("create");

    assert_eq!(post.item_id, 42);
}

#[tokio::test]
async fn drafts_are_never_indexed() {
    let harness = post_harness();

    let post = harness
        .service
        .create_post(command(PublicationStatus::Draft))
        .await
        .expect("create");

    assert_eq!(post.status, PublicationStatus::Draft);
    assert!(harness.search.entries().await.is_empty());
    // Tags are saved for drafts as well.
    assert_eq!(harness.tags.saved().await.len(), 1);
}

#[tokio::test]
async fn editor_html_is_sanitized_before_storage() {
    let harness = post_harness();

    let mut submission = command(PublicationStatus::Active);
    submission.text = "<p>body</p><script>alert(1)</script>".to_string();

    harness.service.create_post(submission).await.expect("create");

    let revisions = harness.content.revisions().await;
    assert!(revisions[0].text.contains("<p>body</p>"));
    assert!(!revisions[0].text.contains("script"));
}

#[tokio::test]
async fn an_uploaded_image_patches_the_inserted_revision() {
    let harness = post_harness();

    let mut submission = command(PublicationStatus::Active);
    submission.image = Some(png_payload());

    let post = harness.service.create_post(submission).await.expect("create");

    // Filename is deterministic: meta slug, language, revision id, extension.
    assert_eq!(post.image.as_deref(), Some("hello-world-en-1.png"));

    let revisions = harness.content.revisions().await;
    assert_eq!(revisions.len(), 1, "patching must not create a new revision");
    assert_eq!(revisions[0].image.as_deref(), Some("hello-world-en-1.png"));

    let source = harness.images_root.join("source/hello-world-en-1.png");
    assert!(source.exists());

    let calls = harness.thumbnailer.calls().await;
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.ends_with("128x128/hello-world-en-1.png"));
}

#[tokio::test]
async fn disabling_the_image_form_skips_all_filesystem_work() {
    let harness = post_harness();
    harness
        .settings
        .seed(modules::BLOG, "show_image_form", SettingValue::Bool(false))
        .await;

    let mut submission = command(PublicationStatus::Active);
    submission.image = Some(png_payload());

    let post = harness.service.create_post(submission).await.expect("create");

    assert_eq!(post.image, None);
    assert!(!harness.images_root.exists());
    assert!(harness.thumbnailer.calls().await.is_empty());
}

#[tokio::test]
async fn image_folders_are_prepared_even_without_an_upload() {
    let harness = post_harness();

    harness
        .service
        .create_post(command(PublicationStatus::Active))
        .await
        .expect("create");

    assert!(harness.images_root.join("source").is_dir());
    assert!(harness.images_root.join("128x128").is_dir());
}

fn valid_submission() -> Value {
    json!({
        "title": "Hello World",
        "introduction": "<p>intro</p>",
        "text": "<p>body</p>",
        "hidden": "published",
        "allow_comments": true,
        "category_id": "3",
        "tags": "rust, backend",
        "publish_on_date": "2026-08-07",
        "publish_on_time": "10:30",
    })
}

fn post_request(payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/blog/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-backend-user", "7")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn creating_an_active_post_redirects_to_the_listing() {
    let harness = post_harness();
    let app = build_admin_router(admin_state(&harness));

    let response = app.oneshot(post_request(&valid_submission())).await.expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().expect("location");
    assert!(location.starts_with("/blog/posts?"));
    assert!(location.contains("report=added"));
    assert!(location.contains("highlight=row-1"));
}

#[tokio::test]
async fn saving_a_draft_redirects_to_the_edit_view() {
    let harness = post_harness();
    let app = build_admin_router(admin_state(&harness));

    let mut payload = valid_submission();
    payload["status"] = json!("draft");

    let response = app.oneshot(post_request(&payload)).await.expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().expect("location");
    assert!(location.starts_with("/blog/posts/1/edit?"));
    assert!(location.contains("report=saved-as-draft"));
    assert!(location.contains("draft=1"));
    assert!(location.contains("highlight=row-1"));
}

#[tokio::test]
async fn an_unknown_status_is_coerced_to_active() {
    let harness = post_harness();
    let app = build_admin_router(admin_state(&harness));

    let mut payload = valid_submission();
    payload["status"] = json!("published");

    let response = app.oneshot(post_request(&payload)).await.expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().expect("location");
    assert!(location.starts_with("/blog/posts?"));
    assert!(location.contains("report=added"));
}

#[tokio::test]
async fn invalid_submissions_report_field_errors_and_persist_nothing() {
    let harness = post_harness();
    let app = build_admin_router(admin_state(&harness));

    let payload = json!({
        "text": "<p>body</p>",
        "category_id": "new_category",
    });

    let response = app.oneshot(post_request(&payload)).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response.into_body().collect().await.expect("body").to_bytes();
    let value: Value = serde_json::from_slice(&body).expect("json");
    let fields: Vec<&str> = value["errors"]
        .as_array()
        .expect("errors")
        .iter()
        .map(|error| error["field"].as_str().expect("field"))
        .collect();

    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"category_id"));
    assert!(fields.contains(&"publish_on_date"));
    assert!(fields.contains(&"publish_on_time"));

    assert!(harness.content.revisions().await.is_empty());
    assert!(harness.meta.records().await.is_empty());
    assert!(harness.search.entries().await.is_empty());
    assert!(harness.tags.saved().await.is_empty());
}

#[tokio::test]
async fn requests_without_an_identity_header_are_rejected() {
    let harness = post_harness();
    let app = build_admin_router(admin_state(&harness));

    let request = Request::builder()
        .method("POST")
        .uri("/blog/posts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(valid_submission().to_string()))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(harness.content.revisions().await.is_empty());
}

#[tokio::test]
async fn the_form_description_carries_options_and_defaults() {
    let harness = post_harness();
    harness.content.seed_category(3, "General").await;
    harness.content.seed_category(4, "Releases").await;

    let app = build_admin_router(admin_state(&harness));

    let request = Request::builder()
        .method("GET")
        .uri("/blog/posts/new?category=9")
        .header("x-backend-user", "7")
        .body(Body::empty())
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.expect("body").to_bytes();
    let view: Value = serde_json::from_slice(&body).expect("json");

    let categories: Vec<&str> = view["categories"]
        .as_array()
        .expect("categories")
        .iter()
        .map(|option| option["value"].as_str().expect("value"))
        .collect();
    assert!(categories.contains(&"new_category"));

    assert_eq!(view["default_category"], "9");
    assert_eq!(view["default_user"], 7);
    assert_eq!(view["image_enabled"], true);
    assert_eq!(view["hidden_default"], "published");
}
