mod common;

use common::{register, seed_approved_vocab, setup};
use lexhub::{
    AppError, Clock,
    models::{
        CreateVocabularyRequest, LearningStatus, PageParams, UpdateUserVocabularyRequest,
    },
};
use uuid::Uuid;

#[tokio::test]
async fn test_add_approved_vocab_starts_fresh() {
    let ctx = setup();
    let user = register(&ctx, "learner@example.com").await;
    let vocab = seed_approved_vocab(&ctx, "serendipity", "en", vec![]).await;

    let entry = ctx.services.user_vocab.add(user.id, vocab.id).await.unwrap();
    assert_eq!(entry.vocabulary_id, vocab.id);
    assert_eq!(entry.status, LearningStatus::New);
    assert_eq!(entry.progress, 0);
    assert!(entry.last_reviewed_at.is_none());
}

#[tokio::test]
async fn test_add_rejects_non_approved_vocabulary() {
    let ctx = setup();
    let user = register(&ctx, "learner@example.com").await;

    // A pending contribution is invisible to the learning list.
    let contributor = register(&ctx, "author@example.com").await;
    let pending = ctx
        .services
        .vocab
        .contribute(
            contributor.id,
            CreateVocabularyRequest {
                term: "limbo".to_string(),
                definition: "an uncertain state".to_string(),
                example: None,
                phonetic: None,
                part_of_speech: None,
                language: "en".to_string(),
                topic_ids: vec![],
            },
        )
        .await
        .unwrap();

    let err = ctx
        .services
        .user_vocab
        .add(user.id, pending.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::VocabNotFound));

    // A nonexistent id reads the same.
    let err = ctx
        .services
        .user_vocab
        .add(user.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::VocabNotFound));
}

#[tokio::test]
async fn test_add_twice_is_a_conflict() {
    let ctx = setup();
    let user = register(&ctx, "learner@example.com").await;
    let vocab = seed_approved_vocab(&ctx, "echo", "en", vec![]).await;

    ctx.services.user_vocab.add(user.id, vocab.id).await.unwrap();
    let err = ctx
        .services
        .user_vocab
        .add(user.id, vocab.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserVocabExists));
}

#[tokio::test]
async fn test_update_validates_progress_bounds() {
    let ctx = setup();
    let user = register(&ctx, "learner@example.com").await;
    let vocab = seed_approved_vocab(&ctx, "gauge", "en", vec![]).await;
    ctx.services.user_vocab.add(user.id, vocab.id).await.unwrap();

    let over = ctx
        .services
        .user_vocab
        .update(
            user.id,
            vocab.id,
            UpdateUserVocabularyRequest {
                progress: Some(150),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(over, AppError::InvalidProgress));

    let under = ctx
        .services
        .user_vocab
        .update(
            user.id,
            vocab.id,
            UpdateUserVocabularyRequest {
                progress: Some(-1),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(under, AppError::InvalidProgress));

    // The boundary value is stored exactly.
    let updated = ctx
        .services
        .user_vocab
        .update(
            user.id,
            vocab.id,
            UpdateUserVocabularyRequest {
                progress: Some(100),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(updated.progress, 100);
}

#[tokio::test]
async fn test_update_fields_are_independent() {
    let ctx = setup();
    let user = register(&ctx, "learner@example.com").await;
    let vocab = seed_approved_vocab(&ctx, "facet", "en", vec![]).await;
    ctx.services.user_vocab.add(user.id, vocab.id).await.unwrap();

    // Status only: progress stays put.
    let entry = ctx
        .services
        .user_vocab
        .update(
            user.id,
            vocab.id,
            UpdateUserVocabularyRequest {
                status: Some(LearningStatus::Learning),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(entry.status, LearningStatus::Learning);
    assert_eq!(entry.progress, 0);
    assert!(entry.last_reviewed_at.is_none());

    // Progress + review stamp: status stays put.
    let reviewed_at = ctx.clock.now();
    let entry = ctx
        .services
        .user_vocab
        .update(
            user.id,
            vocab.id,
            UpdateUserVocabularyRequest {
                progress: Some(40),
                ..Default::default()
            },
            Some(reviewed_at),
        )
        .await
        .unwrap();
    assert_eq!(entry.status, LearningStatus::Learning);
    assert_eq!(entry.progress, 40);
    assert_eq!(entry.last_reviewed_at, Some(reviewed_at));
}

#[tokio::test]
async fn test_update_unknown_pair_is_not_found() {
    let ctx = setup();
    let user = register(&ctx, "learner@example.com").await;
    let vocab = seed_approved_vocab(&ctx, "void", "en", vec![]).await;

    let err = ctx
        .services
        .user_vocab
        .update(
            user.id,
            vocab.id,
            UpdateUserVocabularyRequest::default(),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserVocabNotFound));
}

#[tokio::test]
async fn test_remove_deletes_the_row_outright() {
    let ctx = setup();
    let user = register(&ctx, "learner@example.com").await;
    let vocab = seed_approved_vocab(&ctx, "ephemeral", "en", vec![]).await;
    ctx.services.user_vocab.add(user.id, vocab.id).await.unwrap();

    ctx.services
        .user_vocab
        .remove(user.id, vocab.id)
        .await
        .unwrap();
    assert!(ctx.user_vocab.rows().is_empty());

    // Removing an absent pair fails, unlike soft-deleted entities elsewhere.
    let err = ctx
        .services
        .user_vocab
        .remove(user.id, vocab.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UserVocabNotFound));
}

#[tokio::test]
async fn test_list_filters_by_learning_status() {
    let ctx = setup();
    let user = register(&ctx, "learner@example.com").await;
    let first = seed_approved_vocab(&ctx, "alpha", "en", vec![]).await;
    let second = seed_approved_vocab(&ctx, "beta", "en", vec![]).await;
    ctx.services.user_vocab.add(user.id, first.id).await.unwrap();
    ctx.services.user_vocab.add(user.id, second.id).await.unwrap();
    ctx.services
        .user_vocab
        .update(
            user.id,
            second.id,
            UpdateUserVocabularyRequest {
                status: Some(LearningStatus::Mastered),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    let all = ctx
        .services
        .user_vocab
        .list(user.id, None, PageParams::default())
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    let mastered = ctx
        .services
        .user_vocab
        .list(user.id, Some(LearningStatus::Mastered), PageParams::default())
        .await
        .unwrap();
    assert_eq!(mastered.total, 1);
    assert_eq!(mastered.items[0].vocabulary_id, second.id);
}
