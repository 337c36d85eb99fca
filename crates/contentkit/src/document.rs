//! Locale fan-out and document mapping
//!
//! An [`Accumulation`] fans out into one [`Document`] per (entry, locale)
//! pair. [`Documents`] is a lazy iterator over that fan-out: nothing is
//! fetched while iterating, and the included asset and entry collections
//! are shared by reference across every document it yields.

use crate::error::Error;
use crate::images::ImageOptions;
use crate::meta;
use crate::pull::Accumulation;
use crate::query::{LocaleFilter, Query};
use crate::types::{Asset, Entry, Space};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Content placeholder for entries missing the configured field's value
pub const NO_CONTENT: &str = "(no content)";

/// A document metadata value
///
/// Field values arrive as arbitrary JSON; the two included collections are
/// shared across all documents of one pull, so they are reference-counted
/// rather than cloned per document.
#[derive(Debug, Clone)]
pub enum MetaValue {
    /// A field value localized to the document's locale
    Value(Value),
    /// The included assets of the whole pull
    Assets(Arc<[Asset]>),
    /// The included referenced entries of the whole pull
    Entries(Arc<[Entry]>),
}

impl MetaValue {
    /// The underlying JSON value, when this is a field value
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            MetaValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// The string content, when this is a JSON string field value
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// The included assets, when this is the assets collection
    pub fn as_assets(&self) -> Option<&[Asset]> {
        match self {
            MetaValue::Assets(assets) => Some(assets),
            _ => None,
        }
    }

    /// The included entries, when this is the entries collection
    pub fn as_entries(&self) -> Option<&[Entry]> {
        match self {
            MetaValue::Entries(entries) => Some(entries),
            _ => None,
        }
    }
}

impl Serialize for MetaValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetaValue::Value(v) => v.serialize(serializer),
            MetaValue::Assets(assets) => serializer.collect_seq(assets.iter()),
            MetaValue::Entries(entries) => serializer.collect_seq(entries.iter()),
        }
    }
}

/// One output document, mapped from one entry for one locale
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Localized value of the configured content field
    ///
    /// Empty when no content field is configured; [`NO_CONTENT`] when one
    /// is configured but the entry has no value for it in this locale.
    pub content: String,

    /// Every entry field with a value for this locale, plus the reserved
    /// keys from [`meta`](crate::meta)
    pub meta: BTreeMap<String, MetaValue>,
}

impl Document {
    /// Id of the entry this document was mapped from
    pub fn id(&self) -> &str {
        self.meta_str(meta::ENTRY_ID)
    }

    /// Locale code this document was rendered for
    pub fn locale(&self) -> &str {
        self.meta_str(meta::LOCALE)
    }

    /// Included assets of the pull this document came from
    pub fn assets(&self) -> &[Asset] {
        match self.meta.get(meta::ASSETS) {
            Some(MetaValue::Assets(assets)) => assets,
            _ => &[],
        }
    }

    /// Included referenced entries of the pull this document came from
    pub fn linked_entries(&self) -> &[Entry] {
        match self.meta.get(meta::ENTRIES) {
            Some(MetaValue::Entries(entries)) => entries,
            _ => &[],
        }
    }

    /// Look up an included asset by id
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets().iter().find(|a| a.id() == id)
    }

    /// Look up an included referenced entry by id
    pub fn linked_entry(&self, id: &str) -> Option<&Entry> {
        self.linked_entries().iter().find(|e| e.id() == id)
    }

    /// Render an `<img>` tag for an included asset, localized to this
    /// document's locale
    ///
    /// Returns `None` when the asset is not attached to this document or
    /// has no file for the locale.
    pub fn image_tag(&self, asset_id: &str, options: &ImageOptions) -> Option<String> {
        let asset = self.asset(asset_id)?;
        crate::images::image_tag(asset, self.locale(), options, None)
    }

    fn meta_str(&self, key: &str) -> &str {
        match self.meta.get(key) {
            Some(MetaValue::Value(Value::String(s))) => s,
            _ => "",
        }
    }
}

/// Resolve a locale filter against a space's locales
///
/// Matching is exact and case-sensitive. An empty resolution is an error,
/// never an empty fan-out.
pub fn resolve_locales(filter: &LocaleFilter, space: &Space) -> Result<Vec<String>, Error> {
    match filter {
        LocaleFilter::Default => {
            let default = space.default_locale().ok_or(Error::NoDefaultLocale)?;
            Ok(vec![default.code.clone()])
        }
        LocaleFilter::All => {
            let codes: Vec<String> = space.locales.iter().map(|l| l.code.clone()).collect();
            if codes.is_empty() {
                return Err(Error::NoLocales);
            }
            Ok(codes)
        }
        LocaleFilter::Code(code) => {
            let codes: Vec<String> = space
                .locales
                .iter()
                .filter(|l| l.code == *code)
                .map(|l| l.code.clone())
                .collect();
            if codes.is_empty() {
                return Err(Error::UnknownLocale { code: code.clone() });
            }
            Ok(codes)
        }
    }
}

impl Accumulation {
    /// Fan this accumulation out into documents
    ///
    /// Fails if the query's locale filter matches nothing in the space.
    /// An empty accumulation yields an empty iterator, not an error.
    pub fn into_documents(self, query: &Query, space: &Space) -> Result<Documents, Error> {
        let locales = resolve_locales(&query.locale, space)?;
        // An empty field name means unset; a query deserialized from host
        // config carries it as Some("") without the builder's normalization.
        let content_field = query.content_field.clone().filter(|f| !f.is_empty());
        Ok(Documents {
            entries: self.entries,
            locales,
            assets: Arc::from(self.assets),
            linked_entries: Arc::from(self.linked_entries),
            content_field,
            entry_idx: 0,
            locale_idx: 0,
        })
    }
}

/// Lazy iterator over the (entry, locale) fan-out
///
/// Yields documents entry-major: every resolved locale of the first entry,
/// then every locale of the second, and so on.
#[derive(Debug)]
pub struct Documents {
    entries: Vec<Entry>,
    locales: Vec<String>,
    assets: Arc<[Asset]>,
    linked_entries: Arc<[Entry]>,
    content_field: Option<String>,
    entry_idx: usize,
    locale_idx: usize,
}

impl Documents {
    /// The resolved locale codes, in emission order
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    fn build(&self, entry: &Entry, locale: &str) -> Document {
        let mut doc_meta = BTreeMap::new();
        for (field, values) in &entry.fields {
            if let Some(value) = values.get(locale) {
                doc_meta.insert(field.clone(), MetaValue::Value(value.clone()));
            }
        }
        doc_meta.insert(
            meta::ENTRY_ID.to_string(),
            MetaValue::Value(Value::String(entry.sys.id.clone())),
        );
        doc_meta.insert(
            meta::LOCALE.to_string(),
            MetaValue::Value(Value::String(locale.to_string())),
        );
        doc_meta.insert(
            meta::ASSETS.to_string(),
            MetaValue::Assets(Arc::clone(&self.assets)),
        );
        doc_meta.insert(
            meta::ENTRIES.to_string(),
            MetaValue::Entries(Arc::clone(&self.linked_entries)),
        );

        let content = match &self.content_field {
            None => String::new(),
            Some(field) => match entry.field(field, locale) {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => NO_CONTENT.to_string(),
            },
        };

        Document {
            content,
            meta: doc_meta,
        }
    }
}

impl Iterator for Documents {
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        if self.locales.is_empty() {
            return None;
        }
        let entry = self.entries.get(self.entry_idx)?;
        let locale = &self.locales[self.locale_idx];
        let doc = self.build(entry, locale);

        self.locale_idx += 1;
        if self.locale_idx == self.locales.len() {
            self.locale_idx = 0;
            self.entry_idx += 1;
        }
        Some(doc)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .entries
            .len()
            .saturating_sub(self.entry_idx)
            .saturating_mul(self.locales.len())
            .saturating_sub(self.locale_idx);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Documents {}
