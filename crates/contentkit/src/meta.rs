//! Reserved document metadata keys
//!
//! Every document carries these four keys alongside the entry's own fields.
//! The `contentful:` prefix cannot collide with field names because the
//! provider does not allow `:` in field ids.

/// Id of the entry the document was mapped from
pub const ENTRY_ID: &str = "contentful:id";

/// Locale code the document was rendered for
pub const LOCALE: &str = "contentful:locale";

/// Included assets accumulated for the whole pull
pub const ASSETS: &str = "contentful:assets";

/// Included referenced entries accumulated for the whole pull
pub const ENTRIES: &str = "contentful:entries";
