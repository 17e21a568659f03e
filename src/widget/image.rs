//! Responsive image sources

/// Image reference produced by [`super::WidgetBase::enable_image_optimization`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// The asset URL, unchanged
    Raw(String),
    /// One candidate URL per width
    SrcSet(Vec<SrcSetCandidate>),
}

/// One entry of a `srcset`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcSetCandidate {
    /// Candidate URL
    pub url: String,
    /// Intrinsic width in pixels
    pub width: u32,
}

impl ImageSource {
    /// Build a source set for `url` with one `?w=` variant per width
    pub fn responsive(url: &str, widths: &[u32]) -> Self {
        let separator = if url.contains('?') { '&' } else { '?' };
        let candidates = widths
            .iter()
            .map(|width| SrcSetCandidate {
                url: format!("{}{}w={}", url, separator, width),
                width: *width,
            })
            .collect();
        Self::SrcSet(candidates)
    }

    /// Value for an `src` or `srcset` attribute
    pub fn to_attribute(&self) -> String {
        match self {
            Self::Raw(url) => url.clone(),
            Self::SrcSet(candidates) => candidates
                .iter()
                .map(|c| format!("{} {}w", c.url, c.width))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Smallest candidate, usable as the plain `src` fallback
    pub fn fallback_url(&self) -> Option<&str> {
        match self {
            Self::Raw(url) => Some(url),
            Self::SrcSet(candidates) => candidates
                .iter()
                .min_by_key(|c| c.width)
                .map(|c| c.url.as_str()),
        }
    }
}
