//! Marked-up text carried by views.
//!
//! A `SpannableText` is an immutable pair of raw content and typed spans.
//! Span offsets are UTF-16 code unit offsets into the raw content, which is how
//! the capturing platform counts them.

use std::fmt;

use crate::wire::{SpanMessage, SpanType, TextMessage};

/// Platform class name recorded for clickable spans.
pub const CLICKABLE_SPAN_CLASS_NAME: &str = "android.text.style.ClickableSpan";

/// Platform class name recorded for URL spans.
pub const URL_SPAN_CLASS_NAME: &str = "android.text.style.URLSpan";

/// The concrete kind of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanKind {
    /// Plain marker with no behavior this crate understands
    Generic,
    /// Marker for a region that reacts to clicks
    Clickable,
    /// Clickable region that links to a URL
    Url { url: Option<String> },
}

impl SpanKind {
    fn wire_type(&self) -> SpanType {
        match self {
            SpanKind::Generic => SpanType::Unknown,
            SpanKind::Clickable => SpanType::Clickable,
            SpanKind::Url { .. } => SpanType::Url,
        }
    }
}

/// A positioned markup annotation over a half-open `[start, end)` range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    class_name: Option<String>,
    start: i32,
    end: i32,
    flags: i32,
    kind: SpanKind,
}

impl Span {
    pub fn new(class_name: Option<String>, start: i32, end: i32, flags: i32, kind: SpanKind) -> Self {
        Span {
            class_name,
            start,
            end,
            flags,
            kind,
        }
    }

    pub fn generic(start: i32, end: i32, flags: i32) -> Self {
        Span::new(None, start, end, flags, SpanKind::Generic)
    }

    pub fn clickable(start: i32, end: i32, flags: i32) -> Self {
        Span::new(
            Some(CLICKABLE_SPAN_CLASS_NAME.to_string()),
            start,
            end,
            flags,
            SpanKind::Clickable,
        )
    }

    pub fn url(start: i32, end: i32, flags: i32, url: Option<String>) -> Self {
        Span::new(
            Some(URL_SPAN_CLASS_NAME.to_string()),
            start,
            end,
            flags,
            SpanKind::Url { url },
        )
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn flags(&self) -> i32 {
        self.flags
    }

    pub fn kind(&self) -> &SpanKind {
        &self.kind
    }

    /// URL spans are clickable too.
    pub fn is_clickable(&self) -> bool {
        matches!(self.kind, SpanKind::Clickable | SpanKind::Url { .. })
    }

    pub fn url_target(&self) -> Option<&str> {
        match &self.kind {
            SpanKind::Url { url } => url.as_deref(),
            _ => None,
        }
    }

    /// Returns a copy covering `[start, end)` with the same kind and flags.
    pub fn with_adjusted_position(&self, start: i32, end: i32) -> Span {
        Span {
            start,
            end,
            ..self.clone()
        }
    }

    /// Returns a copy moved by `delta` code units, or `None` if either end
    /// would overflow.
    pub fn shifted(&self, delta: i32) -> Option<Span> {
        let start = self.start.checked_add(delta)?;
        let end = self.end.checked_add(delta)?;
        Some(self.with_adjusted_position(start, end))
    }

    /// The tag is always derived from `kind`, never carried over from the input.
    pub fn to_message(&self) -> SpanMessage {
        SpanMessage {
            span_class_name: self.class_name.clone(),
            start: self.start,
            end: self.end,
            flags: self.flags,
            span_type: self.kind.wire_type(),
            url: self.url_target().map(str::to_string),
        }
    }

    pub fn from_message(message: &SpanMessage) -> Self {
        let kind = match message.span_type {
            SpanType::Url => SpanKind::Url {
                url: message.url.clone(),
            },
            SpanType::Clickable => SpanKind::Clickable,
            SpanType::Unknown => SpanKind::Generic,
        };
        Span::new(
            message.span_class_name.clone(),
            message.start,
            message.end,
            message.flags,
            kind,
        )
    }
}

/// Immutable text content with its spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpannableText {
    raw: String,
    spans: Vec<Span>,
}

impl SpannableText {
    pub fn new(raw: impl Into<String>, spans: Vec<Span>) -> Self {
        SpannableText {
            raw: raw.into(),
            spans,
        }
    }

    pub fn plain(raw: impl Into<String>) -> Self {
        SpannableText::new(raw, Vec::new())
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Length in UTF-16 code units, the unit span offsets are expressed in.
    pub fn len_utf16(&self) -> usize {
        self.raw.encode_utf16().count()
    }

    /// The text a span covers, or `None` if its range does not fit the content.
    pub fn span_text(&self, span: &Span) -> Option<String> {
        let start = usize::try_from(span.start()).ok()?;
        let end = usize::try_from(span.end()).ok()?;
        let units: Vec<u16> = self.raw.encode_utf16().collect();
        if start > end || end > units.len() {
            return None;
        }
        String::from_utf16(&units[start..end]).ok()
    }

    pub fn to_message(&self) -> TextMessage {
        TextMessage {
            text: self.raw.clone(),
            spans: self.spans.iter().map(Span::to_message).collect(),
        }
    }

    pub fn from_message(message: &TextMessage) -> Self {
        SpannableText {
            raw: message.text.clone(),
            spans: message.spans.iter().map(Span::from_message).collect(),
        }
    }
}

impl fmt::Display for SpannableText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// `true` when the text is absent or has no characters.
pub fn is_empty(text: Option<&SpannableText>) -> bool {
    text.map_or(true, SpannableText::is_empty)
}

/// Length of the text after trimming surrounding whitespace.
pub fn trimmed_length(text: &str) -> usize {
    text.trim().chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_span_survives_serialization() {
        let span = Span::url(0, 5, 33, Some("https://example.com".to_string()));

        let json = serde_json::to_string(&span.to_message()).unwrap();
        let message: SpanMessage = serde_json::from_str(&json).unwrap();
        let restored = Span::from_message(&message);

        assert_eq!(
            restored.kind(),
            &SpanKind::Url {
                url: Some("https://example.com".to_string())
            }
        );
        assert_eq!(restored.start(), 0);
        assert_eq!(restored.end(), 5);
        assert_eq!(restored.flags(), 33);
        assert_eq!(restored.url_target(), Some("https://example.com"));
    }

    #[test]
    fn test_specialized_span_with_base_fields_keeps_its_tag() {
        // Only the base fields are populated; the tag still comes from the kind.
        let span = Span::new(None, 2, 4, 0, SpanKind::Clickable);
        assert_eq!(span.to_message().span_type, SpanType::Clickable);

        let span = Span::new(None, 2, 4, 0, SpanKind::Url { url: None });
        let message = span.to_message();
        assert_eq!(message.span_type, SpanType::Url);
        assert_eq!(message.url, None);
    }

    #[test]
    fn test_unknown_tag_becomes_generic() {
        let message = SpanMessage {
            span_type: SpanType::Unknown,
            start: 1,
            end: 2,
            ..Default::default()
        };
        assert_eq!(Span::from_message(&message).kind(), &SpanKind::Generic);
    }

    #[test]
    fn test_shift_produces_new_span() {
        let original = Span::url(3, 8, 17, Some("https://a.example".to_string()));
        let shifted = original.shifted(4).unwrap();

        assert_eq!(shifted.start(), 7);
        assert_eq!(shifted.end(), 12);
        assert_eq!(shifted.flags(), 17);
        assert_eq!(shifted.kind(), original.kind());
        assert_eq!(original.start(), 3);
    }

    #[test]
    fn test_shift_past_i32_range_is_none() {
        let span = Span::clickable(3, i32::MAX - 1, 0);
        assert_eq!(span.shifted(2), None);
        assert_eq!(Span::clickable(-4, 0, 0).shifted(i32::MIN), None);
        assert_eq!(span.shifted(-3).map(|s| s.start()), Some(0));
    }

    #[test]
    fn test_span_text_uses_utf16_offsets() {
        let text = SpannableText::new("😀 link", vec![Span::clickable(3, 7, 0)]);

        assert_eq!(text.len_utf16(), 7);
        assert_eq!(text.span_text(&text.spans()[0]), Some("link".to_string()));
        assert_eq!(text.span_text(&Span::generic(5, 20, 0)), None);
    }

    #[test]
    fn test_text_roundtrip_preserves_span_order() {
        let text = SpannableText::new(
            "Read the terms",
            vec![
                Span::generic(0, 4, 0),
                Span::url(9, 14, 0, Some("https://example.com/terms".to_string())),
            ],
        );

        let restored = SpannableText::from_message(&text.to_message());
        assert_eq!(restored, text);
    }

    #[test]
    fn test_text_helpers() {
        assert!(is_empty(None));
        assert!(is_empty(Some(&SpannableText::plain(""))));
        assert!(!is_empty(Some(&SpannableText::plain(" "))));
        assert_eq!(trimmed_length("  hi  "), 2);
    }
}
