use std::sync::Arc;

use crate::application::meta::MetaService;
use crate::application::repos::{
    ContentRepo, SearchIndex, SettingsStore, TagsRepo, UserDirectory,
};
use crate::infra::images::ImageStore;

/// Per-module settings consulted by the create action.
pub(super) const SHOW_IMAGE_FORM: &str = "show_image_form";
pub(super) const ALLOW_COMMENTS: &str = "allow_comments";

#[derive(Clone)]
pub struct AdminPostService {
    pub(super) content: Arc<dyn ContentRepo>,
    pub(super) settings: Arc<dyn SettingsStore>,
    pub(super) users: Arc<dyn UserDirectory>,
    pub(super) tags: Arc<dyn TagsRepo>,
    pub(super) search: Arc<dyn SearchIndex>,
    pub(super) meta: MetaService,
    pub(super) images: Arc<ImageStore>,
}

impl AdminPostService {
    pub fn new(
        content: Arc<dyn ContentRepo>,
        settings: Arc<dyn SettingsStore>,
        users: Arc<dyn UserDirectory>,
        tags: Arc<dyn TagsRepo>,
        search: Arc<dyn SearchIndex>,
        meta: MetaService,
        images: Arc<ImageStore>,
    ) -> Self {
        Self {
            content,
            settings,
            users,
            tags,
            search,
            meta,
            images,
        }
    }
}
