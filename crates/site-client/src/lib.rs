//! # site-client
//!
//! The page load functions of the site front end, written against the
//! Inkwell HTTP API: the layout load, the new-post redirect and the blank
//! edit form. Notices for the user go through a [`NoticeQueue`] that holds
//! them until the view says it can show them.

pub mod client;
pub mod errors;
pub mod notices;
pub mod pages;

pub use client::SiteClient;
pub use errors::{alert_messages, ClientError, HostErrorBody};
pub use notices::{Notice, NoticeLevel, NoticeQueue, NoticeSink};
pub use pages::{
    alert_on_failure, edit_new_post_load, load_layout, new_post_redirect, EditPostData, LayoutData, Metadata,
    PostForm, Redirect,
};
