//! Serialized view models for the create-post form.

use serde::Serialize;

use crate::application::admin::FieldError;
use crate::application::admin::posts::PostFormContext;
use crate::application::auth::AdminPrincipal;
use crate::domain::language::Language;
use crate::infra::http::SiteContext;

use super::NEW_CATEGORY;

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Everything a client needs to render the create form.
#[derive(Debug, Serialize)]
pub(crate) struct PostFormView {
    pub language: Language,
    pub categories: Vec<SelectOption>,
    /// Pre-selected category; empty when the editor must pick one.
    pub default_category: String,
    pub users: Vec<SelectOption>,
    pub default_user: i64,
    pub allow_comments_default: bool,
    pub hidden_default: &'static str,
    pub image_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostFormErrors {
    pub errors: Vec<FieldError>,
}

pub(crate) fn build_form_view(
    context: PostFormContext,
    principal: &AdminPrincipal,
    language: Language,
    requested_category: Option<i64>,
    site: &SiteContext,
) -> PostFormView {
    let real_category_count = context.categories.len();

    let mut categories: Vec<SelectOption> = context
        .categories
        .iter()
        .map(|category| SelectOption {
            value: category.id.to_string(),
            label: category.title.clone(),
        })
        .collect();
    categories.push(SelectOption {
        value: NEW_CATEGORY.to_string(),
        label: "Add category".to_string(),
    });

    // Pre-select the requested category; otherwise only a lone real
    // category is selected for the editor.
    let default_category = match requested_category {
        Some(id) => id.to_string(),
        None if real_category_count == 1 => categories[0].value.clone(),
        None => String::new(),
    };

    let users = context
        .users
        .iter()
        .map(|user| SelectOption {
            value: user.id.to_string(),
            label: user.display_name.clone(),
        })
        .collect();

    let detail_url = site
        .public_url
        .as_ref()
        .and_then(|base| base.join("blog/detail/").ok())
        .map(|url| url.to_string());

    PostFormView {
        language,
        categories,
        default_category,
        users,
        default_user: principal.user_id,
        allow_comments_default: context.allow_comments_default,
        hidden_default: "published",
        image_enabled: context.image_enabled,
        detail_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CategoryRecord, UserRecord};

    fn context(categories: Vec<CategoryRecord>) -> PostFormContext {
        PostFormContext {
            categories,
            users: vec![UserRecord {
                id: 7,
                display_name: "editor".into(),
                is_god: false,
            }],
            allow_comments_default: true,
            image_enabled: true,
        }
    }

    fn principal() -> AdminPrincipal {
        AdminPrincipal {
            user_id: 7,
            display_name: "editor".into(),
            is_god: false,
        }
    }

    fn site() -> SiteContext {
        SiteContext {
            default_language: "en".parse().unwrap(),
            timezone: chrono_tz::UTC,
            public_url: None,
        }
    }

    #[test]
    fn the_sentinel_is_always_offered() {
        let view = build_form_view(
            context(vec![]),
            &principal(),
            "en".parse().unwrap(),
            None,
            &site(),
        );
        assert!(view.categories.iter().any(|option| option.value == NEW_CATEGORY));
    }

    #[test]
    fn a_lone_category_is_preselected() {
        let view = build_form_view(
            context(vec![CategoryRecord {
                id: 3,
                title: "General".into(),
            }]),
            &principal(),
            "en".parse().unwrap(),
            None,
            &site(),
        );
        assert_eq!(view.default_category, "3");
    }

    #[test]
    fn multiple_categories_default_to_no_selection() {
        let view = build_form_view(
            context(vec![
                CategoryRecord {
                    id: 3,
                    title: "General".into(),
                },
                CategoryRecord {
                    id: 4,
                    title: "Releases".into(),
                },
            ]),
            &principal(),
            "en".parse().unwrap(),
            None,
            &site(),
        );
        assert_eq!(view.default_category, "");
    }

    #[test]
    fn the_query_category_wins() {
        let view = build_form_view(
            context(vec![]),
            &principal(),
            "en".parse().unwrap(),
            Some(9),
            &site(),
        );
        assert_eq!(view.default_category, "9");
    }
}
