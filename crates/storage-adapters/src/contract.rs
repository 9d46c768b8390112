//! Behaviour every `PostRepository` adapter must share. Each adapter's test
//! module runs these cases against its own backend.

use chrono::{Duration, DurationRound, Utc};
use domains::{DomainError, Post, PostRepository, POSTS_COLLECTION, POSTS_COLLECTION_ID};

/// Timestamps are truncated to microseconds, the precision Postgres keeps.
pub(crate) fn post(id: &str, minutes_ago: i64) -> Post {
    let at = (Utc::now() - Duration::minutes(minutes_ago))
        .duration_trunc(Duration::microseconds(1))
        .unwrap_or_else(|_| Utc::now());
    Post {
        id: id.to_string(),
        collection_id: POSTS_COLLECTION_ID.into(),
        collection_name: POSTS_COLLECTION.into(),
        created: at,
        updated: at,
        title: format!("Post {id}"),
        body: String::new(),
        slug: format!("post-{id}"),
        user: None,
        files: vec![],
    }
}

pub(crate) async fn create_get_delete(repo: &dyn PostRepository) {
    repo.create(post("a", 0)).await.unwrap();
    assert_eq!(repo.get("a").await.unwrap().unwrap().title, "Post a");
    assert_eq!(repo.delete("a").await.unwrap().unwrap().id, "a");
    assert!(repo.get("a").await.unwrap().is_none());
    assert!(repo.delete("a").await.unwrap().is_none());
}

pub(crate) async fn duplicate_ids_are_rejected(repo: &dyn PostRepository) {
    repo.create(post("a", 0)).await.unwrap();
    let err = repo.create(post("a", 0)).await.unwrap_err();
    assert!(matches!(err, DomainError::Persistence(_)));
}

pub(crate) async fn duplicate_slugs_are_allowed(repo: &dyn PostRepository) {
    let mut b = post("b", 0);
    b.slug = "post-a".into();
    repo.create(post("a", 0)).await.unwrap();
    repo.create(b).await.unwrap();
    assert_eq!(repo.list().await.unwrap().len(), 2);
}

pub(crate) async fn update_requires_existing_record(repo: &dyn PostRepository) {
    assert!(matches!(
        repo.update(post("x", 0)).await.unwrap_err(),
        DomainError::NotFound(_, _)
    ));
}

pub(crate) async fn update_replaces_editable_fields(repo: &dyn PostRepository) {
    let original = repo.create(post("e", 5)).await.unwrap();
    let mut edited = original.clone();
    edited.title = "Edited".into();
    edited.body = "New body".into();
    edited.slug = "edited".into();
    edited.files = vec!["b.jpg".into()];
    edited.updated = post("e", 0).updated;

    let saved = repo.update(edited.clone()).await.unwrap();
    assert_eq!(saved, edited);
    let stored = repo.get("e").await.unwrap().unwrap();
    assert_eq!(stored.title, "Edited");
    assert_eq!(stored.created, original.created);
}

pub(crate) async fn owner_and_files_round_trip(repo: &dyn PostRepository) {
    let mut owned = post("f", 0);
    owned.user = Some("user0000000001a".into());
    owned.files = vec!["one_abc.jpg".into(), "two_def.png".into()];
    repo.create(owned.clone()).await.unwrap();

    let stored = repo.get("f").await.unwrap().unwrap();
    assert_eq!(stored, owned);
}

pub(crate) async fn list_is_newest_first(repo: &dyn PostRepository) {
    repo.create(post("old", 30)).await.unwrap();
    repo.create(post("new", 1)).await.unwrap();
    repo.create(post("mid", 10)).await.unwrap();
    let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(ids, vec!["new", "mid", "old"]);
}
