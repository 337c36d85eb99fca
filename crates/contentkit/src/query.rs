//! Entry selection parameters
//!
//! A [`Query`] describes which entries to pull and how to map them. It
//! serializes to a flat JSON object so callers can persist or transmit it,
//! and [`Query::schema`] exposes the JSON schema for external tooling.

use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Maximum link resolution depth accepted by the entries endpoint
pub const MAX_INCLUDE: u8 = 10;

/// Page size used when none is given
pub const DEFAULT_LIMIT: u32 = 100;

/// Maximum page size accepted by the entries endpoint
pub const MAX_LIMIT: u32 = 1000;

/// Which of a space's locales to emit documents for
///
/// Serializes as a plain string: `""` for the space default, `"*"` for all
/// locales, anything else is treated as a locale code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocaleFilter {
    /// The space's default locale
    #[default]
    Default,
    /// Every locale the space defines
    All,
    /// One specific locale code, matched case-sensitively
    Code(String),
}

impl From<String> for LocaleFilter {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => LocaleFilter::Default,
            "*" => LocaleFilter::All,
            _ => LocaleFilter::Code(s),
        }
    }
}

impl From<&str> for LocaleFilter {
    fn from(s: &str) -> Self {
        LocaleFilter::from(s.to_string())
    }
}

impl From<LocaleFilter> for String {
    fn from(filter: LocaleFilter) -> Self {
        match filter {
            LocaleFilter::Default => String::new(),
            LocaleFilter::All => "*".to_string(),
            LocaleFilter::Code(code) => code,
        }
    }
}

impl fmt::Display for LocaleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocaleFilter::Default => f.write_str(""),
            LocaleFilter::All => f.write_str("*"),
            LocaleFilter::Code(code) => f.write_str(code),
        }
    }
}

impl FromStr for LocaleFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LocaleFilter::from(s))
    }
}

impl Serialize for LocaleFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LocaleFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(LocaleFilter::from(String::deserialize(deserializer)?))
    }
}

impl JsonSchema for LocaleFilter {
    fn schema_name() -> String {
        "LocaleFilter".to_string()
    }

    fn json_schema(generator: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        let mut schema = String::json_schema(generator);
        if let schemars::schema::Schema::Object(ref mut obj) = schema {
            obj.metadata().description = Some(
                "Locale selection: empty for the space default, \"*\" for all locales, \
                 or a specific locale code"
                    .to_string(),
            );
        }
        schema
    }
}

/// Parameters for one pull of entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Query {
    /// Restrict to entries of this content type
    pub content_type: Option<String>,

    /// Which locales to emit documents for
    pub locale: LocaleFilter,

    /// Link resolution depth (0-10)
    pub include: u8,

    /// Page size (1-1000)
    pub limit: u32,

    /// Entries to skip before the first page
    pub skip: u32,

    /// Follow pagination until the result set is exhausted
    pub recursive: bool,

    /// Entry field whose value becomes the document body
    pub content_field: Option<String>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            content_type: None,
            locale: LocaleFilter::Default,
            include: 1,
            limit: DEFAULT_LIMIT,
            skip: 0,
            recursive: false,
            content_field: None,
        }
    }
}

impl Query {
    /// Create a builder with the defaults
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Query string pairs for the entries endpoint at the given window offset
    ///
    /// Always requests all locales (`locale=*`) and a stable creation-time
    /// order so the pagination window does not shift between requests.
    pub(crate) fn to_params(&self, skip: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("locale", "*".to_string()),
            ("include", self.include.to_string()),
            ("order", "sys.createdAt".to_string()),
            ("limit", self.limit.to_string()),
            ("skip", skip.to_string()),
        ];
        if let Some(ct) = &self.content_type {
            params.push(("content_type", ct.clone()));
        }
        params
    }

    /// JSON schema for [`Query`]
    pub fn schema() -> serde_json::Value {
        let schema = schema_for!(Query);
        serde_json::to_value(schema).unwrap_or_default()
    }
}

/// Builder for [`Query`]
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            query: Query::default(),
        }
    }

    /// Restrict to entries of this content type
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.query.content_type = Some(content_type.into());
        self
    }

    /// Which locales to emit documents for
    pub fn locale(mut self, locale: impl Into<LocaleFilter>) -> Self {
        self.query.locale = locale.into();
        self
    }

    /// Link resolution depth, clamped to 0-10
    pub fn include(mut self, include: u8) -> Self {
        self.query.include = include.min(MAX_INCLUDE);
        self
    }

    /// Page size, clamped to 1-1000
    pub fn limit(mut self, limit: u32) -> Self {
        self.query.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Entries to skip before the first page
    pub fn skip(mut self, skip: u32) -> Self {
        self.query.skip = skip;
        self
    }

    /// Follow pagination until the result set is exhausted
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.query.recursive = recursive;
        self
    }

    /// Entry field whose value becomes the document body
    ///
    /// An empty name clears the selection.
    pub fn content_field(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.query.content_field = if field.is_empty() { None } else { Some(field) };
        self
    }

    pub fn build(self) -> Query {
        self.query
    }
}
