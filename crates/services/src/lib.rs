//! # services
//!
//! Application logic of Inkwell. Every function here talks to the outside
//! world only through the port traits in `domains`.

pub mod generation;
pub mod greeting;
pub mod hooks;
pub mod mail;
pub mod plan;
pub mod posts;
pub mod site_config;
pub mod slug;
pub mod text;

pub use generation::{GenerateError, GeneratedRecord, GenerationService};
pub use hooks::RecordHooks;
pub use mail::MailService;
pub use plan::{GenerationPlan, ImageOptions};
pub use posts::PostService;
pub use site_config::SiteConfigService;
