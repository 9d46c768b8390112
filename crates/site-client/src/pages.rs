//! # Page loads
//!
//! Each function produces the data one route of the site renders.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::SiteClient;
use crate::errors::{alert_messages, ClientError};
use crate::notices::{Notice, NoticeQueue};

pub const INSTALL_NOTICE: &str =
    r#"Please visit <a href="/_/">/_</a> to finalize installation of PocketBase"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutData {
    /// The site config, or an empty object when it could not be loaded.
    pub config: Value,
    pub metadata: Metadata,
}

/// Root layout: checks whether the admin UI still needs installing and loads
/// the site config. Never fails; problems become notices.
pub async fn load_layout(client: &SiteClient, notices: &NoticeQueue) -> LayoutData {
    let metadata = Metadata {
        title: "Untitled".to_string(),
        headline: None,
    };

    let config = match layout_requests(client, notices).await {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "layout load failed");
            notices.push(Notice::error(err.to_string()));
            Value::Object(Map::new())
        }
    };

    LayoutData { config, metadata }
}

async fn layout_requests(client: &SiteClient, notices: &NoticeQueue) -> Result<Value, ClientError> {
    if client.admin_redirected().await? {
        notices.push(Notice::error(INSTALL_NOTICE).with_links());
    }
    client.fetch_config().await
}

/// Pushes every line of a failed API call as an error notice.
/// Returns the value on success.
pub async fn alert_on_failure<T, F>(notices: &NoticeQueue, request: F) -> Option<T>
where
    F: std::future::Future<Output = Result<T, ClientError>>,
{
    match request.await {
        Ok(value) => Some(value),
        Err(ClientError::Api { body, .. }) => {
            for line in alert_messages(&body) {
                notices.push(Notice::error(line));
            }
            None
        }
        Err(other) => {
            notices.push(Notice::error(other.to_string()));
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub status: u16,
    pub location: String,
}

/// `/posts/new` always forwards to the edit form.
pub fn new_post_redirect(base: &str) -> Redirect {
    Redirect {
        status: 302,
        location: format!("{}/posts/new/edit", base.trim_end_matches('/')),
    }
}

/// The record shape the post form binds to. Every field is a plain string
/// so the blank form can be represented without dates or nulls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    pub id: String,
    pub collection_id: String,
    pub collection_name: String,
    pub created: String,
    pub updated: String,
    pub title: String,
    pub body: String,
    pub user: String,
    pub slug: String,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditPostData {
    pub record: PostForm,
    pub metadata: Metadata,
}

/// Blank post for the create form. No network access.
pub fn edit_new_post_load() -> EditPostData {
    EditPostData {
        record: PostForm {
            collection_name: "posts".to_string(),
            ..PostForm::default()
        },
        metadata: Metadata {
            title: "Create New Post".to_string(),
            headline: Some("Create New Post".to_string()),
        },
    }
}
