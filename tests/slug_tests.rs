mod common;

use common::{admin_principal, setup};
use lexhub::{
    AppError,
    models::{CreateTopicRequest, UpdateTopicRequest},
    slug::slugify,
};

fn topic_request(name: &str) -> CreateTopicRequest {
    CreateTopicRequest {
        name: name.to_string(),
        description: None,
    }
}

#[test]
fn test_slugify_normalizes_names() {
    assert_eq!(slugify("Hello, World!").unwrap(), "hello-world");
    assert_eq!(slugify("  Rust 101 ").unwrap(), "rust-101");
    assert_eq!(slugify("ÜBER--cool__stuff").unwrap(), "ber-cool-stuff");
    assert_eq!(slugify("a").unwrap(), "a");
    // Runs of separators collapse; edges are stripped.
    assert_eq!(slugify("--a//b..c--").unwrap(), "a-b-c");
}

#[test]
fn test_slugify_rejects_empty_results() {
    assert!(matches!(slugify(""), Err(AppError::InvalidName)));
    assert!(matches!(slugify("   "), Err(AppError::InvalidName)));
    assert!(matches!(slugify("!!! ---"), Err(AppError::InvalidName)));
}

#[tokio::test]
async fn test_colliding_slugs_get_ascending_suffixes() {
    let ctx = setup();
    let admin = admin_principal();

    // Three distinct names that all normalize to "hello-world".
    let first = ctx
        .services
        .topics
        .create(&admin, topic_request("Hello, World!"))
        .await
        .unwrap();
    let second = ctx
        .services
        .topics
        .create(&admin, topic_request("Hello World"))
        .await
        .unwrap();
    let third = ctx
        .services
        .topics
        .create(&admin, topic_request("hello?? world"))
        .await
        .unwrap();

    assert_eq!(first.slug, "hello-world");
    assert_eq!(second.slug, "hello-world-1");
    assert_eq!(third.slug, "hello-world-2");
}

#[tokio::test]
async fn test_duplicate_topic_name_is_a_conflict() {
    let ctx = setup();
    let admin = admin_principal();
    ctx.services
        .topics
        .create(&admin, topic_request("Animals"))
        .await
        .unwrap();

    // Case-insensitive: " animals " is the same name.
    let err = ctx
        .services
        .topics
        .create(&admin, topic_request(" ANIMALS "))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::TopicNameExists));
}

#[tokio::test]
async fn test_rename_onto_own_slug_keeps_it_unchanged() {
    let ctx = setup();
    let admin = admin_principal();
    let topic = ctx
        .services
        .topics
        .create(&admin, topic_request("Data Types"))
        .await
        .unwrap();
    assert_eq!(topic.slug, "data-types");

    // The new name derives the same slug; no pointless "-1" churn.
    let updated = ctx
        .services
        .topics
        .update(
            &admin,
            topic.id,
            UpdateTopicRequest {
                name: Some("Data!! Types".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.slug, "data-types");
    assert_eq!(updated.name, "Data!! Types");
}

#[tokio::test]
async fn test_rename_onto_foreign_slug_takes_a_suffix() {
    let ctx = setup();
    let admin = admin_principal();
    ctx.services
        .topics
        .create(&admin, topic_request("Data Types"))
        .await
        .unwrap();
    let other = ctx
        .services
        .topics
        .create(&admin, topic_request("Other"))
        .await
        .unwrap();

    let updated = ctx
        .services
        .topics
        .update(
            &admin,
            other.id,
            UpdateTopicRequest {
                name: Some("Data. Types".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.slug, "data-types-1");
}

#[tokio::test]
async fn test_invalid_topic_name_is_rejected() {
    let ctx = setup();
    let err = ctx
        .services
        .topics
        .create(&admin_principal(), topic_request("!!!"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidName));
}
