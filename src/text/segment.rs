//! Span segmentation for the bio text
//!
//! Splits text into alternating plain / email / URL segments. Emails are
//! scanned first; URL candidates that collide with an accepted email are
//! discarded, so `user@site.com` never also produces a `site.com` link.
//!
//! All offsets exposed from this module are character offsets, matching
//! the cursor and buffer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::measure::TextMeasure;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+").expect("email pattern is valid")
});

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:https?://)?(?:[a-z0-9\-]+\.)+[a-z]{2,}(?:[/?#][^\s]*)?")
        .expect("url pattern is valid")
});

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"'];

/// Classification of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Email,
    Url,
}

/// A URL or email candidate found while scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkMatch {
    pub start: usize,
    pub end: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
    /// Normalized destination for URLs (`https://` added when missing)
    pub display_text: Option<String>,
}

impl LinkMatch {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Rendering class of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Plain,
    Email,
    Link,
}

/// A contiguous run of text classified for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    pub is_link: bool,
    pub is_email: bool,
    /// Measured width against the active font
    pub width: f32,
    /// Destination for URL segments
    pub url: Option<String>,
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn kind(&self) -> SegmentKind {
        if self.is_email {
            SegmentKind::Email
        } else if self.is_link {
            SegmentKind::Link
        } else {
            SegmentKind::Plain
        }
    }

    /// Navigation target: the URL for links, `mailto:` for emails
    pub fn href(&self) -> Option<String> {
        match self.kind() {
            SegmentKind::Link => self.url.clone(),
            SegmentKind::Email => Some(format!("mailto:{}", self.text)),
            SegmentKind::Plain => None,
        }
    }

    pub fn char_count(&self) -> usize {
        self.end - self.start
    }
}

/// Prepend `https://` when the URL has no scheme
pub fn normalize_url(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

fn trim_trailing_punctuation(s: &str) -> &str {
    s.trim_end_matches(TRAILING_PUNCTUATION)
}

fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}

/// Host part of a URL candidate (scheme and path stripped)
fn url_host(candidate: &str) -> &str {
    let lower = candidate.to_ascii_lowercase();
    let rest = if lower.starts_with("https://") {
        &candidate[8..]
    } else if lower.starts_with("http://") {
        &candidate[7..]
    } else {
        candidate
    };
    match rest.find(|c: char| matches!(c, '/' | '?' | '#')) {
        Some(idx) => &rest[..idx],
        None => rest,
    }
}

fn has_interior_dot(host: &str) -> bool {
    let len = host.len();
    host.char_indices().any(|(i, c)| c == '.' && i > 0 && i + 1 < len)
}

fn scan_emails(text: &str) -> Vec<LinkMatch> {
    EMAIL_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let trimmed = trim_trailing_punctuation(m.as_str());
            // "a@." trims down to "a@"
            if trimmed.ends_with('@') || !trimmed.contains('@') {
                return None;
            }
            let start = char_offset(text, m.start());
            let end = start + trimmed.chars().count();
            Some(LinkMatch {
                start,
                end,
                text: trimmed.to_string(),
                kind: LinkKind::Email,
                display_text: None,
            })
        })
        .collect()
}

fn scan_urls(text: &str, emails: &[LinkMatch]) -> Vec<LinkMatch> {
    URL_PATTERN
        .find_iter(text)
        .filter_map(|m| {
            let trimmed = trim_trailing_punctuation(m.as_str());
            let start = char_offset(text, m.start());
            let end = start + trimmed.chars().count();

            if emails.iter().any(|email| email.overlaps(start, end)) {
                return None;
            }
            if trimmed.contains('@') || trimmed.ends_with('.') {
                return None;
            }
            if !has_interior_dot(url_host(trimmed)) {
                return None;
            }

            Some(LinkMatch {
                start,
                end,
                text: trimmed.to_string(),
                kind: LinkKind::Url,
                display_text: Some(normalize_url(trimmed)),
            })
        })
        .collect()
}

/// Find all accepted matches, sorted by start and non-overlapping
pub fn find_matches(text: &str) -> Vec<LinkMatch> {
    let emails = scan_emails(text);
    let urls = scan_urls(text, &emails);
    merge_matches(emails.into_iter().chain(urls).collect())
}

/// Sort by start (URL first on a tie) and drop any match overlapping an
/// earlier accepted one
fn merge_matches(mut all: Vec<LinkMatch>) -> Vec<LinkMatch> {
    all.sort_by(|a, b| {
        let rank = |m: &LinkMatch| match m.kind {
            LinkKind::Url => 0,
            LinkKind::Email => 1,
        };
        a.start.cmp(&b.start).then_with(|| rank(a).cmp(&rank(b)))
    });

    let mut accepted: Vec<LinkMatch> = Vec::with_capacity(all.len());
    for m in all {
        if accepted.last().map_or(true, |prev| m.start >= prev.end) {
            accepted.push(m);
        }
    }
    accepted
}

fn plain_segment(chars: &[char], start: usize, end: usize, measure: &dyn TextMeasure) -> Segment {
    let text: String = chars[start..end].iter().collect();
    Segment {
        width: measure.measure(&text),
        text,
        is_link: false,
        is_email: false,
        url: None,
        start,
        end,
    }
}

/// Split text into ordered plain / email / URL segments
pub fn segment_text(text: &str, measure: &dyn TextMeasure) -> Vec<Segment> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut segments = Vec::new();
    let mut last = 0;

    for m in find_matches(text) {
        if m.start > last {
            segments.push(plain_segment(&chars, last, m.start, measure));
        }
        let is_email = m.kind == LinkKind::Email;
        segments.push(Segment {
            width: measure.measure(&m.text),
            text: m.text,
            is_link: !is_email,
            is_email,
            url: m.display_text,
            start: m.start,
            end: m.end,
        });
        last = m.end;
    }

    if last < chars.len() {
        segments.push(plain_segment(&chars, last, chars.len(), measure));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::measure::FixedWidthMeasure;

    fn segments(text: &str) -> Vec<Segment> {
        segment_text(text, &FixedWidthMeasure::new(10.0))
    }

    fn link(start: usize, end: usize, kind: LinkKind) -> LinkMatch {
        LinkMatch {
            start,
            end,
            text: "x".repeat(end - start),
            kind,
            display_text: None,
        }
    }

    #[test]
    fn test_merge_prefers_url_on_tie_and_drops_overlaps() {
        let merged = merge_matches(vec![
            link(10, 14, LinkKind::Url),
            link(0, 7, LinkKind::Email),
            link(0, 5, LinkKind::Url),
            link(12, 20, LinkKind::Email),
            link(5, 8, LinkKind::Url),
        ]);
        let spans: Vec<(usize, usize, LinkKind)> = merged.iter().map(|m| (m.start, m.end, m.kind)).collect();
        assert_eq!(
            spans,
            vec![
                (0, 5, LinkKind::Url),
                (5, 8, LinkKind::Url),
                (10, 14, LinkKind::Url),
            ]
        );
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_plain_text_is_one_segment() {
        let segs = segments("just words here");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].kind(), SegmentKind::Plain);
        assert_eq!(segs[0].width, 150.0);
    }

    #[test]
    fn test_email_and_url_are_distinct_segments() {
        let segs = segments("contact me at a@b.com or visit a.co");
        let kinds: Vec<SegmentKind> = segs.iter().map(|s| s.kind()).collect();
        assert_eq!(
            kinds,
            vec![SegmentKind::Plain, SegmentKind::Email, SegmentKind::Plain, SegmentKind::Link]
        );
        assert_eq!(segs[0].text, "contact me at ");
        assert_eq!(segs[1].text, "a@b.com");
        assert!(segs[1].is_email && !segs[1].is_link);
        assert_eq!(segs[2].text, " or visit ");
        assert_eq!(segs[3].text, "a.co");
        assert_eq!(segs[3].url.as_deref(), Some("https://a.co"));
    }

    #[test]
    fn test_email_domain_is_not_a_url() {
        let matches = find_matches("mail jane.doe@example.org now");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].kind, LinkKind::Email);
        assert_eq!(matches[0].text, "jane.doe@example.org");
    }

    #[test]
    fn test_match_at_start_has_no_leading_plain_segment() {
        let segs = segments("example.com is mine");
        assert_eq!(segs[0].kind(), SegmentKind::Link);
        assert_eq!(segs[0].start, 0);
        assert_eq!(segs[1].text, " is mine");
    }

    #[test]
    fn test_trailing_punctuation_is_trimmed() {
        let matches = find_matches("see https://rust-lang.org/learn. or me@x.io!");
        assert_eq!(matches[0].text, "https://rust-lang.org/learn");
        assert_eq!(matches[0].display_text.as_deref(), Some("https://rust-lang.org/learn"));
        assert_eq!(matches[1].text, "me@x.io");
    }

    #[test]
    fn test_url_with_at_sign_is_rejected() {
        // The path carries an '@' so the candidate is dropped; the email wins
        let matches = find_matches("site.com/u@me");
        assert!(matches.iter().all(|m| m.kind == LinkKind::Email));
    }

    #[test]
    fn test_dotless_words_are_not_urls() {
        assert!(find_matches("hello world, e.g this").is_empty());
    }

    #[test]
    fn test_offsets_are_char_based() {
        let segs = segments("café → a.co");
        let link = segs.iter().find(|s| s.is_link).unwrap();
        assert_eq!(link.start, 7);
        assert_eq!(link.end, 11);
    }

    #[test]
    fn test_matches_are_sorted_and_disjoint() {
        let matches = find_matches("b.io then a@c.de then d.net and e@f.gh");
        for pair in matches.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert_eq!(matches.len(), 4);
    }

    #[test]
    fn test_segments_cover_whole_text() {
        let text = "x a@b.com y c.org z";
        let segs = segments(text);
        let joined: String = segs.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_normalize_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://a.co"), "http://a.co");
        assert_eq!(normalize_url("HTTPS://a.co"), "HTTPS://a.co");
        assert_eq!(normalize_url("a.co"), "https://a.co");
    }

    #[test]
    fn test_email_href_is_mailto() {
        let segs = segments("a@b.com");
        assert_eq!(segs[0].href().as_deref(), Some("mailto:a@b.com"));
    }
}
