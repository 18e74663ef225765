//! Located asset references inside a document.

use std::ops::Range;

/// Kind of asset reference a document scan looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// `src` attribute of an `<img>` tag.
    Image,
    /// CSS `url(...)` reference.
    InlineStyleUrl,
    /// `href` of an `<a>` tag pointing at a downloadable file.
    AnchorHref,
}

/// A rewritable URL occurrence in a document.
///
/// `span` covers the whole match (e.g. the full `<img ...>` tag) and
/// `url_span` the URL bytes inside it; both index into the scanned source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference<'a> {
    /// Kind of reference.
    pub kind: AssetKind,
    /// Full matched text.
    pub raw: &'a str,
    /// Byte range of the full match in the source.
    pub span: Range<usize>,
    /// Byte range of the URL in the source.
    pub url_span: Range<usize>,
    /// Extracted URL.
    pub url: &'a str,
}

impl<'a> AssetReference<'a> {
    /// Text of the match preceding the URL.
    #[must_use]
    pub fn before(&self) -> &'a str {
        &self.raw[..self.url_span.start - self.span.start]
    }

    /// Text of the match following the URL.
    #[must_use]
    pub fn after(&self) -> &'a str {
        &self.raw[self.url_span.end - self.span.start..]
    }

    /// Rebuilds the match with `url` in place of the original URL.
    #[must_use]
    pub fn reconstruct(&self, url: &str) -> String {
        let mut out = String::with_capacity(self.raw.len() + url.len());
        out.push_str(self.before());
        out.push_str(url);
        out.push_str(self.after());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_preserves_surrounding_text() {
        let source = "x <img alt='a' src=\"/a.png\" class=\"x\"> y";
        let start = source.find("<img").unwrap();
        let end = source.find("> y").unwrap() + 1;
        let url_start = source.find("/a.png").unwrap();
        let reference = AssetReference {
            kind: AssetKind::Image,
            raw: &source[start..end],
            span: start..end,
            url_span: url_start..url_start + 6,
            url: "/a.png",
        };

        assert_eq!(reference.before(), "<img alt='a' src=\"");
        assert_eq!(reference.after(), "\" class=\"x\">");
        assert_eq!(
            reference.reconstruct("https://cdn/a.png"),
            "<img alt='a' src=\"https://cdn/a.png\" class=\"x\">"
        );
    }
}
