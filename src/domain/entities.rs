//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::{language::Language, types::PublicationStatus};

/// One stored revision of a blog item.
///
/// `item_id` is stable across revisions of the same item; `revision_id`
/// uniquely identifies a single saved draft or publish event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPostRecord {
    pub item_id: i64,
    pub revision_id: i64,
    pub meta_id: i64,
    pub category_id: i64,
    pub user_id: i64,
    pub language: Language,
    pub title: String,
    pub introduction: String,
    pub text: String,
    pub image: Option<String>,
    pub publish_on: OffsetDateTime,
    pub created_on: OffsetDateTime,
    pub edited_on: OffsetDateTime,
    pub hidden: bool,
    pub allow_comments: bool,
    pub num_comments: i32,
    pub status: PublicationStatus,
}

/// SEO metadata attached to a blog item revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaRecord {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub title: String,
}

/// A backend user as exposed by the user directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub display_name: String,
    pub is_god: bool,
}
