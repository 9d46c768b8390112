//! AI-assisted post generation.
//!
//! One request: pick a topic, ask the generator, resolve its text into a
//! title and body, fetch placeholder images, persist. Only image failures
//! are tolerated; everything else aborts with a [`GenerateError`].

use std::sync::Arc;

use domains::{Attachment, ContentGenerator, DomainError, FileFetcher, Identity, Post, PostDraft};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::plan::{GenerationPlan, ImageOptions};
use crate::posts::PostService;
use crate::slug::slugify;
use crate::text;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing API key or similar operator mistake.
    #[error("{0}")]
    Configuration(String),
    /// The generator answered with a non-200 status.
    #[error("generator returned HTTP {status}")]
    Upstream { status: u16, body: String },
    /// The generator answered 200 without a usable candidate.
    #[error("unexpected generator response format")]
    UnexpectedFormat { details: String },
    /// Transport or persistence failure.
    #[error("failed to generate post: {0}")]
    Failed(#[source] DomainError),
}

impl GenerateError {
    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Upstream { .. } => "upstream_status",
            Self::UnexpectedFormat { .. } => "upstream_format",
            Self::Failed(DomainError::Persistence(_)) => "persistence",
            Self::Failed(_) => "other",
        }
    }
}

/// A freshly generated and persisted post.
#[derive(Debug, Clone)]
pub struct GeneratedRecord {
    pub post: Post,
    /// True when images were planned but could not be fetched.
    pub images_dropped: bool,
}

#[derive(Clone)]
pub struct GenerationService {
    generator: Arc<dyn ContentGenerator>,
    fetcher: Arc<dyn FileFetcher>,
    posts: PostService,
    images: ImageOptions,
}

impl GenerationService {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        fetcher: Arc<dyn FileFetcher>,
        posts: PostService,
        images: ImageOptions,
    ) -> Self {
        Self {
            generator,
            fetcher,
            posts,
            images,
        }
    }

    /// Draws a random plan and runs it.
    pub async fn generate(&self, identity: &Identity) -> Result<GeneratedRecord, GenerateError> {
        let plan = GenerationPlan::draw(&mut rand::thread_rng(), &self.images);
        self.generate_with_plan(plan, identity).await
    }

    pub async fn generate_with_plan(
        &self,
        plan: GenerationPlan,
        identity: &Identity,
    ) -> Result<GeneratedRecord, GenerateError> {
        info!(topic = %plan.topic, images = plan.image_urls.len(), "starting post generation");

        let raw = self
            .generator
            .generate(&plan.topic)
            .await
            .map_err(|err| match err {
                DomainError::Configuration(msg) => GenerateError::Configuration(msg),
                DomainError::Upstream { status, body } => GenerateError::Upstream { status, body },
                DomainError::UpstreamFormat(details) => GenerateError::UnexpectedFormat { details },
                other => GenerateError::Failed(other),
            })?;
        debug!(preview = %preview(&raw), "generated text");

        let resolved = text::resolve(&raw);
        let slug = slugify(&resolved.title);
        debug!(title = %resolved.title, slug = %slug, "resolved title");

        let (attachments, images_dropped) = self.fetch_images(&plan.image_urls).await;

        let draft = PostDraft {
            title: resolved.title,
            body: resolved.body,
            slug: Some(slug),
            user: identity.user_id().map(str::to_string),
        };
        let post = self.posts.create(draft, attachments).await.map_err(|err| {
            error!(error = %err, "failed to persist generated post");
            GenerateError::Failed(err)
        })?;

        info!(record_id = %post.id, files = post.files.len(), "post generated");
        Ok(GeneratedRecord {
            post,
            images_dropped,
        })
    }

    /// All or nothing: one failed download drops every image.
    async fn fetch_images(&self, urls: &[String]) -> (Vec<Attachment>, bool) {
        let mut attachments = Vec::with_capacity(urls.len());
        for url in urls {
            match self.fetcher.fetch(url).await {
                Ok(attachment) => attachments.push(attachment),
                Err(err) => {
                    warn!(url = %url, error = %err, "image fetch failed, continuing without images");
                    return (Vec::new(), true);
                }
            }
        }
        (attachments, false)
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use domains::{MockContentGenerator, MockFileFetcher, MockFileStore, MockPostRepository};

    fn plan(images: usize) -> GenerationPlan {
        GenerationPlan {
            topic: crate::plan::TOPICS[1].to_string(),
            image_urls: (0..images)
                .map(|i| format!("https://picsum.photos/seed/s{i}/500/300"))
                .collect(),
        }
    }

    fn user() -> Identity {
        Identity::RecordUser {
            id: "user0000000001a".into(),
            collection: "users".into(),
            name: "Ann".into(),
            email: "ann@example.com".into(),
        }
    }

    fn generator_returning(text: &'static str) -> MockContentGenerator {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .withf(|topic| topic.to_string() == crate::plan::TOPICS[1])
            .returning(move |_| Ok(text.to_string()));
        generator
    }

    fn service(
        generator: MockContentGenerator,
        fetcher: MockFileFetcher,
        repo: MockPostRepository,
        files: MockFileStore,
    ) -> GenerationService {
        GenerationService::new(
            Arc::new(generator),
            Arc::new(fetcher),
            PostService::new(Arc::new(repo), Arc::new(files)),
            ImageOptions::default(),
        )
    }

    fn image() -> Attachment {
        Attachment {
            name: "300.jpg".into(),
            content_type: mime::IMAGE_JPEG,
            bytes: Bytes::from_static(b"jpg"),
        }
    }

    #[tokio::test]
    async fn schema_text_becomes_the_record() {
        let mut repo = MockPostRepository::new();
        repo.expect_create().times(1).returning(Ok);
        let svc = service(
            generator_returning(r#"{"title":"Five PocketBase Wins","body":"Realtime, auth, files."}"#),
            MockFileFetcher::new(),
            repo,
            MockFileStore::new(),
        );

        let record = svc.generate_with_plan(plan(0), &user()).await.unwrap();
        assert_eq!(record.post.title, "Five PocketBase Wins");
        assert_eq!(record.post.body, "Realtime, auth, files.");
        assert_eq!(record.post.slug, "five-pocketbase-wins");
        assert_eq!(record.post.user.as_deref(), Some("user0000000001a"));
        assert!(record.post.files.is_empty());
        assert!(!record.images_dropped);
    }

    #[tokio::test]
    async fn blank_schema_title_still_creates_the_record() {
        let mut repo = MockPostRepository::new();
        repo.expect_create().times(1).returning(Ok);
        let svc = service(
            generator_returning(r#"{"title":"","body":"Runes explained."}"#),
            MockFileFetcher::new(),
            repo,
            MockFileStore::new(),
        );

        let record = svc.generate_with_plan(plan(0), &user()).await.unwrap();
        assert_eq!(record.post.title, "Generated Post");
        assert_eq!(record.post.slug, "generated-post");
        assert_eq!(record.post.body, "Runes explained.");
    }

    #[tokio::test]
    async fn admin_generated_posts_have_no_owner() {
        let mut repo = MockPostRepository::new();
        repo.expect_create().returning(Ok);
        let svc = service(
            generator_returning("Plain prose. More prose."),
            MockFileFetcher::new(),
            repo,
            MockFileStore::new(),
        );
        let admin = Identity::Admin {
            id: "a1".into(),
            email: "root@example.com".into(),
        };
        let record = svc.generate_with_plan(plan(0), &admin).await.unwrap();
        assert_eq!(record.post.user, None);
        assert_eq!(record.post.title, "Plain prose.");
    }

    #[tokio::test]
    async fn images_are_attached_in_order() {
        let mut fetcher = MockFileFetcher::new();
        fetcher.expect_fetch().times(3).returning(|_| Ok(image()));
        let mut files = MockFileStore::new();
        let mut n = 0;
        files.expect_save().times(3).returning(move |_, _| {
            n += 1;
            Ok(format!("img_{n}.jpg"))
        });
        let mut repo = MockPostRepository::new();
        repo.expect_create().returning(Ok);

        let svc = service(generator_returning("Title. Body."), fetcher, repo, files);
        let record = svc.generate_with_plan(plan(3), &user()).await.unwrap();
        assert_eq!(record.post.files, vec!["img_1.jpg", "img_2.jpg", "img_3.jpg"]);
    }

    #[tokio::test]
    async fn image_failure_still_creates_the_post() {
        let mut fetcher = MockFileFetcher::new();
        let mut calls = 0;
        fetcher.expect_fetch().returning(move |_| {
            calls += 1;
            if calls == 2 {
                Err(DomainError::Internal("connection reset".into()))
            } else {
                Ok(image())
            }
        });
        let mut repo = MockPostRepository::new();
        repo.expect_create().times(1).returning(Ok);

        let svc = service(generator_returning("Title. Body."), fetcher, repo, MockFileStore::new());
        let record = svc.generate_with_plan(plan(4), &user()).await.unwrap();
        assert!(record.post.files.is_empty());
        assert!(record.images_dropped);
    }

    #[tokio::test]
    async fn upstream_status_is_preserved_and_nothing_is_written() {
        let mut generator = MockContentGenerator::new();
        generator.expect_generate().returning(|_| {
            Err(DomainError::Upstream {
                status: 429,
                body: "{\"error\":{\"code\":429}}".into(),
            })
        });
        let mut repo = MockPostRepository::new();
        repo.expect_create().never();

        let svc = service(generator, MockFileFetcher::new(), repo, MockFileStore::new());
        let err = svc.generate_with_plan(plan(2), &user()).await.unwrap_err();
        match err {
            GenerateError::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "{\"error\":{\"code\":429}}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_is_a_configuration_error() {
        let mut generator = MockContentGenerator::new();
        generator.expect_generate().returning(|_| {
            Err(DomainError::Configuration(
                "GEMINI_API_KEY not configured in environment".into(),
            ))
        });
        let svc = service(
            generator,
            MockFileFetcher::new(),
            MockPostRepository::new(),
            MockFileStore::new(),
        );
        let err = svc.generate_with_plan(plan(0), &user()).await.unwrap_err();
        assert_eq!(err.reason(), "configuration");
        assert_eq!(err.to_string(), "GEMINI_API_KEY not configured in environment");
    }

    #[tokio::test]
    async fn persistence_failure_is_fatal() {
        let mut repo = MockPostRepository::new();
        repo.expect_create()
            .returning(|_| Err(DomainError::persistence(anyhow::anyhow!("unique violation"))));
        let svc = service(
            generator_returning("Title. Body."),
            MockFileFetcher::new(),
            repo,
            MockFileStore::new(),
        );
        let err = svc.generate_with_plan(plan(0), &user()).await.unwrap_err();
        assert_eq!(err.reason(), "persistence");
    }

    #[test]
    fn preview_is_bounded() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(150);
        assert_eq!(preview(&long).len(), 103);
    }
}
