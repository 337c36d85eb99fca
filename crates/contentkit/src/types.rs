//! Typed models of the Content Delivery API wire format
//!
//! Entries are always requested with `locale=*`, so every field arrives as
//! a mapping from locale code to value. The models here are partial: only
//! the parts of the wire format this crate consumes are typed, everything
//! else is ignored on decode.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Localized values for one field: locale code → value
pub type FieldValues = BTreeMap<String, Value>;

/// System metadata attached to every remote record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sys {
    /// Stable identifier
    #[serde(default)]
    pub id: String,

    /// Creation timestamp (ISO 8601); entries are fetched in ascending
    /// order of this so the pagination window stays stable
    #[serde(default, rename = "createdAt", skip_serializing_if = "String::is_empty")]
    pub created_at: String,

    /// Content type link (entries only)
    #[serde(default, rename = "contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Link>,
}

/// Link to another remote record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkSys {
    #[serde(default)]
    pub id: String,
}

/// Remote content entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    pub sys: Sys,

    /// Field name → locale code → value
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValues>,
}

impl Entry {
    /// Stable identifier
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    /// Content type id, when the entry carries one
    pub fn content_type_id(&self) -> Option<&str> {
        self.sys.content_type.as_ref().map(|l| l.sys.id.as_str())
    }

    /// Value of `field` for `locale`, if the entry has one
    pub fn field(&self, field: &str, locale: &str) -> Option<&Value> {
        self.fields.get(field).and_then(|values| values.get(locale))
    }
}

/// Localized file payload of an asset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFile {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_type: String,
}

/// Asset fields as returned with `locale=*`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetFields {
    #[serde(default)]
    pub title: BTreeMap<String, String>,
    #[serde(default)]
    pub description: BTreeMap<String, String>,
    #[serde(default)]
    pub file: BTreeMap<String, AssetFile>,
}

/// Remote media asset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    pub sys: Sys,
    #[serde(default)]
    pub fields: AssetFields,
}

impl Asset {
    /// Stable identifier
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    /// Title for `locale`, if the asset has one
    pub fn title(&self, locale: &str) -> Option<&str> {
        self.fields.title.get(locale).map(String::as_str)
    }

    /// Description for `locale`, if the asset has one
    pub fn description(&self, locale: &str) -> Option<&str> {
        self.fields.description.get(locale).map(String::as_str)
    }

    /// File payload for `locale`, if the asset has one
    pub fn file(&self, locale: &str) -> Option<&AssetFile> {
        self.fields.file.get(locale)
    }

    /// File URL for `locale`, if the asset has one
    pub fn url(&self, locale: &str) -> Option<&str> {
        self.file(locale).map(|f| f.url.as_str())
    }
}

/// Referenced records returned alongside a page of entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Includes {
    #[serde(default, rename = "Asset")]
    pub assets: Vec<Asset>,
    #[serde(default, rename = "Entry")]
    pub entries: Vec<Entry>,
}

/// One page of entries as returned by the entries endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Total matching entries as reported by the remote system
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub items: Vec<Entry>,
    #[serde(default)]
    pub includes: Includes,
}

/// Locale defined by a space
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Locale {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "default")]
    pub is_default: bool,
}

/// Space descriptor: identity plus the locales it defines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Space {
    #[serde(default)]
    pub sys: Sys,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub locales: Vec<Locale>,
}

impl Space {
    /// Stable identifier
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    /// The locale marked as default, if any
    pub fn default_locale(&self) -> Option<&Locale> {
        self.locales.iter().find(|l| l.is_default)
    }
}

/// Provider error payload
///
/// Shape: `{"sys":{"type":"Error","id":"..."},"message":"...","requestId":"..."}`
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub sys: ApiErrorSys,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "requestId")]
    pub request_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiErrorSys {
    #[serde(default)]
    pub id: String,
}
