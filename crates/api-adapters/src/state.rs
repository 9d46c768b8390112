//! Shared application context handed to every handler through axum `State`.

use std::sync::Arc;

use domains::{
    AuditLog, ConfigSource, ContentGenerator, FileFetcher, FileStore, IdentityResolver, Mailer,
    PostRepository, SettingsProvider,
};
use services::{
    GenerationService, ImageOptions, MailService, PostService, RecordHooks, SiteConfigService,
};

use crate::metrics::Metrics;

/// Concrete adapters chosen by the binary.
pub struct Ports {
    pub settings: Arc<dyn SettingsProvider>,
    pub posts: Arc<dyn PostRepository>,
    pub files: Arc<dyn FileStore>,
    pub generator: Arc<dyn ContentGenerator>,
    pub fetcher: Arc<dyn FileFetcher>,
    pub mailer: Arc<dyn Mailer>,
    pub audit: Arc<dyn AuditLog>,
    pub config_source: Arc<dyn ConfigSource>,
    pub identity: Arc<dyn IdentityResolver>,
}

/// Values the hook layer exposes to handlers as-is.
#[derive(Debug, Clone)]
pub struct HookVars {
    pub foo: String,
}

impl Default for HookVars {
    fn default() -> Self {
        Self {
            foo: "bar".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub posts: PostService,
    pub generation: GenerationService,
    pub mail: MailService,
    pub site_config: SiteConfigService,
    pub hooks: RecordHooks,
    pub identity: Arc<dyn IdentityResolver>,
    pub vars: Arc<HookVars>,
    pub metrics: Arc<Metrics>,
}

impl AppContext {
    pub fn new(ports: Ports, images: ImageOptions, vars: HookVars) -> Self {
        let posts = PostService::new(ports.posts, ports.files);
        Self {
            generation: GenerationService::new(
                ports.generator,
                ports.fetcher,
                posts.clone(),
                images,
            ),
            mail: MailService::new(ports.settings.clone(), ports.mailer),
            site_config: SiteConfigService::new(ports.config_source, ports.settings),
            hooks: RecordHooks::new(ports.audit),
            identity: ports.identity,
            vars: Arc::new(vars),
            metrics: Arc::new(Metrics::new()),
            posts,
        }
    }
}
