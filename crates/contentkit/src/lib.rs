//! ContentKit - Contentful entry fetching and document mapping
//!
//! This crate pulls entries from a Contentful space over the Content
//! Delivery API and maps them into documents for static-site pipelines.
//!
//! ## Pipeline
//!
//! A pull runs in three stages:
//!
//! - [`Query`] describes what to fetch: content type, locales, link
//!   resolution depth, pagination window, and which field becomes the
//!   document body.
//! - [`fetch_entries`] pages through the API and merges the results into an
//!   [`Accumulation`], deduplicating included assets and linked entries.
//! - [`Accumulation::into_documents`] fans the accumulation out into one
//!   [`Document`] per entry and locale.
//!
//! [`pull`] wires the stages together for the common case:
//!
//! ```no_run
//! use contentkit::{Client, LocaleFilter, Query};
//!
//! # async fn run() -> Result<(), contentkit::Error> {
//! let client = Client::builder()
//!     .space("cfexampleapi")
//!     .token("b4c0n73n7fu1")
//!     .build()?;
//!
//! let query = Query::builder()
//!     .content_type("cat")
//!     .content_field("name")
//!     .locale(LocaleFilter::All)
//!     .recursive(true)
//!     .build();
//!
//! for doc in contentkit::pull(&client, &query).await? {
//!     println!("{} [{}]: {}", doc.id(), doc.locale(), doc.content);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
mod document;
mod error;
pub mod images;
pub mod meta;
mod pull;
mod query;
mod types;

pub use client::{Client, ClientBuilder, EntrySource};
pub use document::{resolve_locales, Document, Documents, MetaValue, NO_CONTENT};
pub use error::Error;
pub use images::{image_tag, image_url, Fit, Focus, Format, ImageOptions};
pub use pull::{fetch_entries, Accumulation};
pub use query::{LocaleFilter, Query, QueryBuilder, DEFAULT_LIMIT, MAX_INCLUDE, MAX_LIMIT};
pub use types::{
    Asset, AssetFile, AssetFields, Entry, FieldValues, Includes, Link, LinkSys, Locale, Page,
    Space, Sys,
};

/// Default Content Delivery API base URL
pub const DEFAULT_BASE_URL: &str = "https://cdn.contentful.com";

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "ContentKit/0.1";

/// Pull all entries matching `query` and fan them out into documents
///
/// Fetches the space descriptor first (for locale resolution), then pages
/// through the entries. Any fetch failure aborts the whole pull; no partial
/// document stream is produced.
pub async fn pull(client: &Client, query: &Query) -> Result<Documents, Error> {
    let space = client.space().await?;
    let accumulation = fetch_entries(client, query).await?;
    tracing::debug!(
        space = %space.id(),
        entries = accumulation.entries.len(),
        assets = accumulation.assets.len(),
        linked = accumulation.linked_entries.len(),
        "Pull complete"
    );
    accumulation.into_documents(query, &space)
}
