//! Article model representing a search hit from the Qiita API.

use serde::{Deserialize, Serialize};

/// An article returned by the search API.
///
/// Equality is structural: two articles are equal when title, URL, and
/// author all match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article title
    pub title: String,

    /// Article page URL
    pub url: String,

    /// The article's author
    pub user: User,
}

impl Article {
    /// Create a new article
    pub fn new(title: impl Into<String>, url: impl Into<String>, user: User) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            user,
        }
    }
}

/// The author of an [`Article`].
///
/// Equality compares `id` only: two users with the same id are the same
/// user even when display fields differ, which keeps selection and diffing
/// stable across profile edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Account id, unique per user
    pub id: String,

    /// Display name shown next to the article
    #[serde(rename = "name")]
    pub display_name: String,

    /// Avatar image URL
    #[serde(rename = "profile_image_url")]
    pub avatar_url: String,
}

impl User {
    /// Create a new user
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            avatar_url: avatar_url.into(),
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}
