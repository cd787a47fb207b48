mod common;

use common::{admin_principal, register, seed_approved_vocab, seed_topic, setup};
use lexhub::{
    filters::{UserSearchFilter, VocabSearchFilter, normalize_search},
    models::{
        AdminUpdateUserRequest, CreateVocabularyRequest, PageParams, UserStatus, VocabStatus,
    },
};

#[test]
fn test_normalize_search_blank_means_absent() {
    assert_eq!(normalize_search(None), None);
    assert_eq!(normalize_search(Some("".to_string())), None);
    assert_eq!(normalize_search(Some("   ".to_string())), None);
    assert_eq!(
        normalize_search(Some("  MixedCase ".to_string())),
        Some("mixedcase".to_string())
    );
}

#[tokio::test]
async fn test_vocab_search_combines_criteria_with_and() {
    let ctx = setup();
    seed_approved_vocab(&ctx, "apple", "en", vec![]).await;
    seed_approved_vocab(&ctx, "apfel", "de", vec![]).await;
    seed_approved_vocab(&ctx, "banana", "en", vec![]).await;

    // A pending entry matching both criteria must not leak into the results.
    let contributor = register(&ctx, "pending-author@example.com").await;
    ctx.services
        .vocab
        .contribute(
            contributor.id,
            CreateVocabularyRequest {
                term: "applet".to_string(),
                definition: "a small application".to_string(),
                example: None,
                phonetic: None,
                part_of_speech: None,
                language: "en".to_string(),
                topic_ids: vec![],
            },
        )
        .await
        .unwrap();

    let page = ctx
        .services
        .vocab
        .search_approved(
            VocabSearchFilter {
                query: Some("app".to_string()),
                language: Some("en".to_string()),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();

    // AND semantics: "apfel" fails the language criterion, "banana" the term
    // criterion, "applet" the (forced) status criterion.
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].term, "apple");
    assert_eq!(page.items[0].status, VocabStatus::Approved);
}

#[tokio::test]
async fn test_blank_criteria_are_skipped_not_wildcarded() {
    let ctx = setup();
    seed_approved_vocab(&ctx, "apple", "en", vec![]).await;
    seed_approved_vocab(&ctx, "apfel", "de", vec![]).await;

    let page = ctx
        .services
        .vocab
        .search_approved(
            VocabSearchFilter {
                query: Some("   ".to_string()),
                language: Some("".to_string()),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 2);
}

#[tokio::test]
async fn test_topic_scope_is_part_of_the_composed_query() {
    let ctx = setup();
    let topic = seed_topic(&ctx, "Fruit").await;
    seed_approved_vocab(&ctx, "apple", "en", vec![topic.id]).await;
    seed_approved_vocab(&ctx, "anchor", "en", vec![]).await;

    let scoped = ctx
        .services
        .vocab
        .search_approved(
            VocabSearchFilter {
                topic_id: Some(topic.id),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(scoped.total, 1);
    assert_eq!(scoped.items[0].term, "apple");

    // Topic scope combines with the other criteria in the same predicate.
    let scoped_and_filtered = ctx
        .services
        .vocab
        .search_approved(
            VocabSearchFilter {
                topic_id: Some(topic.id),
                query: Some("anch".to_string()),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(scoped_and_filtered.total, 0);
}

#[tokio::test]
async fn test_term_search_is_case_insensitive_substring() {
    let ctx = setup();
    seed_approved_vocab(&ctx, "Weltanschauung", "de", vec![]).await;

    let page = ctx
        .services
        .vocab
        .search_approved(
            VocabSearchFilter {
                query: Some("  WELTAN ".to_string()),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].term, "Weltanschauung");
}

#[tokio::test]
async fn test_user_search_filters_compose() {
    let ctx = setup();
    let admin = admin_principal();
    let alice = register(&ctx, "alice@example.com").await;
    register(&ctx, "bob@example.com").await;
    let carol = register(&ctx, "carol@example.com").await;

    ctx.services
        .users
        .admin_update(
            &admin,
            carol.id,
            AdminUpdateUserRequest {
                status: Some(UserStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Substring + enum criteria, AND-combined: only active users whose email
    // contains "al".
    let page = ctx
        .services
        .users
        .list(
            &admin,
            UserSearchFilter {
                email: Some("AL".to_string()),
                status: Some(UserStatus::Active),
                ..Default::default()
            },
            PageParams::default(),
        )
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, alice.id);
}

#[tokio::test]
async fn test_pagination_slices_the_filtered_set() {
    let ctx = setup();
    for i in 0..5 {
        register(&ctx, &format!("user{i}@example.com")).await;
        // Distinct creation instants keep the ordering deterministic.
        ctx.clock.advance_secs(60);
    }

    let admin = admin_principal();
    let first = ctx
        .services
        .users
        .list(
            &admin,
            UserSearchFilter::default(),
            PageParams {
                page: Some(0),
                per_page: Some(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.items.len(), 2);
    // Newest first.
    assert_eq!(first.items[0].email, "user4@example.com");

    let last = ctx
        .services
        .users
        .list(
            &admin,
            UserSearchFilter::default(),
            PageParams {
                page: Some(2),
                per_page: Some(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(last.items.len(), 1);
    assert_eq!(last.items[0].email, "user0@example.com");
}
