//! Image transform URL and tag helpers
//!
//! Asset files live on the provider's image CDN, which accepts resize and
//! format parameters in the query string. These helpers build such URLs
//! deterministically (parameters sorted by key) and render minimal `<img>`
//! tags with the asset's localized title as alt text.

use crate::types::Asset;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Resize behavior (`fit` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Fit {
    Pad,
    Fill,
    Scale,
    Crop,
    Thumb,
}

impl Fit {
    pub fn as_str(self) -> &'static str {
        match self {
            Fit::Pad => "pad",
            Fit::Fill => "fill",
            Fit::Scale => "scale",
            Fit::Crop => "crop",
            Fit::Thumb => "thumb",
        }
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format (`fm` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Jpg,
    Png,
    Webp,
    Gif,
    Avif,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Jpg => "jpg",
            Format::Png => "png",
            Format::Webp => "webp",
            Format::Gif => "gif",
            Format::Avif => "avif",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crop focus area (`f` parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Face,
    Faces,
}

impl Focus {
    pub fn as_str(self) -> &'static str {
        match self {
            Focus::Center => "center",
            Focus::Top => "top",
            Focus::Bottom => "bottom",
            Focus::Left => "left",
            Focus::Right => "right",
            Focus::TopLeft => "top_left",
            Focus::TopRight => "top_right",
            Focus::BottomLeft => "bottom_left",
            Focus::BottomRight => "bottom_right",
            Focus::Face => "face",
            Focus::Faces => "faces",
        }
    }
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional transform parameters for an asset URL
///
/// All fields default to unset; an all-default value leaves the asset URL
/// untouched.
///
/// ```
/// use contentkit::{Fit, ImageOptions};
///
/// let options = ImageOptions::new().with_width(800).with_fit(Fit::Thumb);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageOptions {
    /// Target width in pixels (`w`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Target height in pixels (`h`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// JPEG quality 1-100 (`q`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    /// Corner radius in pixels (`r`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
    /// Resize behavior (`fit`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<Fit>,
    /// Output format (`fm`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    /// Crop focus area (`f`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<Focus>,
    /// Background color for padding, e.g. `rgb:9090ff` (`bg`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

impl ImageOptions {
    /// Create options with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target width in pixels
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the target height in pixels
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the quality, clamped to 1-100
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality.clamp(1, 100));
        self
    }

    /// Set the corner radius in pixels
    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Set the resize behavior
    pub fn with_fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        self
    }

    /// Set the output format
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the crop focus area
    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Set the background color for padding, e.g. `rgb:9090ff`
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    fn is_empty(&self) -> bool {
        *self == ImageOptions::default()
    }

    /// Query pairs in key order
    fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(w) = self.width {
            params.push(("w", w.to_string()));
        }
        if let Some(h) = self.height {
            params.push(("h", h.to_string()));
        }
        if let Some(q) = self.quality {
            params.push(("q", q.to_string()));
        }
        if let Some(r) = self.radius {
            params.push(("r", r.to_string()));
        }
        if let Some(fit) = self.fit {
            params.push(("fit", fit.as_str().to_string()));
        }
        if let Some(fm) = self.format {
            params.push(("fm", fm.as_str().to_string()));
        }
        if let Some(f) = self.focus {
            params.push(("f", f.as_str().to_string()));
        }
        if let Some(bg) = &self.background {
            params.push(("bg", bg.clone()));
        }
        params.sort_unstable_by_key(|(k, _)| *k);
        params
    }
}

/// Transform URL for an asset's file in `locale`
///
/// Returns the file URL with the transform parameters appended in sorted
/// key order, or the URL untouched when `options` is all-default. Asset
/// URLs come off the wire protocol-relative (`//images...`); those are
/// normalized to `https:`. Returns `None` when the asset has no file for
/// the locale.
pub fn image_url(asset: &Asset, locale: &str, options: &ImageOptions) -> Option<String> {
    let base = normalize_scheme(asset.url(locale)?);
    if options.is_empty() {
        return Some(base);
    }

    let mut url = Url::parse(&base).ok()?;
    url.query_pairs_mut().extend_pairs(options.to_params());
    Some(url.into())
}

/// `<img>` tag for an asset's file in `locale`
///
/// `alt` falls back to the asset's title for the locale, then to empty.
/// Returns `None` when the asset has no file for the locale.
pub fn image_tag(
    asset: &Asset,
    locale: &str,
    options: &ImageOptions,
    alt: Option<&str>,
) -> Option<String> {
    let src = image_url(asset, locale, options)?;
    let alt = alt.or_else(|| asset.title(locale)).unwrap_or("");
    Some(format!(r#"<img src="{}" alt="{}"/>"#, src, escape_attr(alt)))
}

fn normalize_scheme(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
