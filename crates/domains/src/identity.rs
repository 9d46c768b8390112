//! # Identity
//!
//! Who is making a request. Admins and record users are distinct account
//! kinds; a request carries at most one of them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    Admin {
        id: String,
        email: String,
    },
    RecordUser {
        id: String,
        collection: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: String,
    },
    #[default]
    Anonymous,
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// First present display value: the user's name, then the user's email,
    /// then the admin email.
    pub fn display_name(&self) -> Option<&str> {
        match self {
            Self::RecordUser { name, email, .. } => non_empty(name).or_else(|| non_empty(email)),
            Self::Admin { email, .. } => non_empty(email),
            Self::Anonymous => None,
        }
    }

    /// Mail recipient: the record email is preferred over the admin email.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::RecordUser { email, .. } | Self::Admin { email, .. } => non_empty(email),
            Self::Anonymous => None,
        }
    }

    /// Id of the record user. Admins are not records, so they own nothing.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::RecordUser { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
