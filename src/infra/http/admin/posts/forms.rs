//! Create-post form: deserialization and per-field validation.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;
use serde::Deserialize;
use time::{
    Date, Time,
    format_description::FormatItem,
    macros::format_description,
};

use crate::application::admin::FieldError;
use crate::application::admin::posts::CreatePostCommand;
use crate::application::auth::AdminPrincipal;
use crate::application::meta::{self, MetaFields};
use crate::domain::language::Language;
use crate::domain::slug::SlugError;
use crate::domain::tags::parse_tag_string;
use crate::domain::types::PublicationStatus;
use crate::infra::http::SiteContext;
use crate::infra::images::ImagePayload;
use crate::util::timezone::utc_from_local;

use super::NEW_CATEGORY;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

#[derive(Debug, Deserialize)]
pub(crate) struct PostCreateRequest {
    pub(crate) title: Option<String>,
    pub(crate) introduction: Option<String>,
    pub(crate) text: Option<String>,
    /// Visibility radio: `published` or `hidden`.
    pub(crate) hidden: Option<String>,
    #[serde(default)]
    pub(crate) allow_comments: bool,
    /// Raw dropdown value; may carry the synthetic new-category entry.
    pub(crate) category_id: Option<String>,
    pub(crate) user_id: Option<i64>,
    /// Free-text tag list (`rust, backend`).
    pub(crate) tags: Option<String>,
    pub(crate) publish_on_date: Option<String>,
    pub(crate) publish_on_time: Option<String>,
    pub(crate) status: Option<String>,
    #[serde(default)]
    pub(crate) meta: MetaRequest,
    pub(crate) image: Option<ImageUploadRequest>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MetaRequest {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) keywords: Option<String>,
    pub(crate) url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageUploadRequest {
    pub(crate) filename: String,
    /// Base64-encoded payload.
    pub(crate) data: String,
}

impl PostCreateRequest {
    /// Validate the submission into a typed command.
    ///
    /// Every failure is collected as a field error; the command is only
    /// produced when the whole form is correct, so persistence never starts
    /// from a partially valid submission.
    pub(crate) fn validate(
        self,
        principal: &AdminPrincipal,
        site: &SiteContext,
        language: Language,
    ) -> Result<CreatePostCommand, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = self.title.unwrap_or_default().trim().to_string();
        if title.is_empty() {
            errors.push(FieldError::required("title"));
        }

        let text = self.text.unwrap_or_default();
        if text.trim().is_empty() {
            errors.push(FieldError::required("text"));
        }

        let publish_date = parse_stamp(
            self.publish_on_date.as_deref(),
            "publish_on_date",
            "Date is invalid",
            |raw| Date::parse(raw, DATE_FORMAT),
            &mut errors,
        );
        let publish_time = parse_stamp(
            self.publish_on_time.as_deref(),
            "publish_on_time",
            "Time is invalid",
            |raw| Time::parse(raw, TIME_FORMAT),
            &mut errors,
        );

        let category_id = match self.category_id.as_deref().map(str::trim) {
            None | Some("") => {
                errors.push(FieldError::required("category_id"));
                None
            }
            // The synthetic entry counts as "not filled in".
            Some(NEW_CATEGORY) => {
                errors.push(FieldError::required("category_id"));
                None
            }
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(FieldError::new("category_id", "Invalid value"));
                    None
                }
            },
        };

        let hidden = match self.hidden.as_deref() {
            None | Some("published") => false,
            Some("hidden") => true,
            Some(_) => {
                errors.push(FieldError::new("hidden", "Invalid value"));
                false
            }
        };

        let status = PublicationStatus::from_submission(self.status.as_deref());

        let meta = match meta::prepare(
            MetaFields {
                title: self.meta.title,
                description: self.meta.description,
                keywords: self.meta.keywords,
                url: self.meta.url,
            },
            &title,
        ) {
            Ok(prepared) => Some(prepared),
            Err(SlugError::EmptyInput) => {
                errors.push(FieldError::required("meta_title"));
                None
            }
            Err(_) => {
                errors.push(FieldError::new(
                    "meta_url",
                    "Could not derive a URL from this value",
                ));
                None
            }
        };

        let image = match self.image {
            None => None,
            Some(upload) => match decode_image(upload) {
                Ok(payload) => Some(payload),
                Err(error) => {
                    errors.push(error);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // All parse results are present once validation passed.
        let (date, time) = (
            publish_date.expect("validated date"),
            publish_time.expect("validated time"),
        );

        Ok(CreatePostCommand {
            title,
            introduction: self.introduction.unwrap_or_default(),
            text,
            category_id: category_id.expect("validated category"),
            user_id: self.user_id.unwrap_or(principal.user_id),
            language,
            hidden,
            allow_comments: self.allow_comments,
            publish_on: utc_from_local(date, time, site.timezone),
            status,
            tags: parse_tag_string(self.tags.as_deref().unwrap_or_default()),
            meta: meta.expect("validated meta"),
            image,
        })
    }
}

fn parse_stamp<T>(
    raw: Option<&str>,
    field: &'static str,
    invalid_message: &'static str,
    parse: impl Fn(&str) -> Result<T, time::error::Parse>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.push(FieldError::required(field));
            None
        }
        Some(raw) => match parse(raw) {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(FieldError::new(field, invalid_message));
                None
            }
        },
    }
}

fn decode_image(upload: ImageUploadRequest) -> Result<ImagePayload, FieldError> {
    let extension = std::path::Path::new(&upload.filename)
        .extension()
        .and_then(|value| value.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| FieldError::new("image", "Filename has no extension"))?;

    let mime = mime_guess::from_ext(&extension).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(FieldError::new("image", "Unsupported image type"));
    }

    let data = BASE64
        .decode(upload.data.as_bytes())
        .map_err(|_| FieldError::new("image", "Image data is not valid base64"))?;

    if imagesize::blob_size(&data).is_err() {
        return Err(FieldError::new("image", "Not a valid image file"));
    }

    Ok(ImagePayload {
        extension,
        data: Bytes::from(data),
    })
}
