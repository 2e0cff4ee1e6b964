//! Placeholder compilation and binding.
//!
//! Markup is split once into literal text and typed slots. Binding walks the
//! segments a single time, so every occurrence of a placeholder is replaced
//! and a missing value is an error instead of a literal `{{token}}` in the
//! output.

use crate::error::TemplateError;
use crate::placeholder::{Bindings, Placeholder};
use std::collections::BTreeSet;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(Placeholder),
}

/// Markup compiled into literal and placeholder segments.
#[derive(Debug, Clone)]
pub struct CompiledMarkup {
    segments: Vec<Segment>,
    literal_len: usize,
}

impl CompiledMarkup {
    /// Splits `source` into segments, rejecting malformed or unknown tokens.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find(OPEN) {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let after_open = &rest[start + OPEN.len()..];
            let end = after_open
                .find(CLOSE)
                .ok_or(TemplateError::Unterminated { offset: offset + start })?;
            let name = &after_open[..end];
            let placeholder = Placeholder::from_name(name)
                .ok_or_else(|| TemplateError::UnknownPlaceholder { name: name.to_string() })?;
            segments.push(Segment::Slot(placeholder));

            let consumed = start + OPEN.len() + end + CLOSE.len();
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let literal_len = segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => text.len(),
                Segment::Slot(_) => 0,
            })
            .sum();
        Ok(Self { segments, literal_len })
    }

    /// The distinct placeholders this markup uses.
    pub fn placeholders(&self) -> BTreeSet<Placeholder> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Slot(p) => Some(*p),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Number of slots, counting repeats.
    pub fn slot_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Slot(_))).count()
    }

    /// Substitutes every slot with its XML-escaped value.
    pub fn bind(&self, bindings: &Bindings) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.literal_len + 64 * self.slot_count());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(placeholder) => {
                    let value = bindings
                        .get(*placeholder)
                        .ok_or(TemplateError::Unbound(*placeholder))?;
                    escape_xml_into(&mut out, value);
                }
            }
        }
        Ok(out)
    }
}

fn escape_xml_into(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_and_bind_replaces_every_occurrence() {
        let markup = CompiledMarkup::compile("<a>{{asset_tag}}</a><b>{{asset_tag}}</b>").unwrap();
        assert_eq!(markup.slot_count(), 2);
        assert_eq!(markup.placeholders().len(), 1);

        let bindings = Bindings::new().with(Placeholder::AssetTag, "IT-7");
        assert_eq!(markup.bind(&bindings).unwrap(), "<a>IT-7</a><b>IT-7</b>");
    }

    #[test]
    fn test_bind_escapes_xml() {
        let markup = CompiledMarkup::compile("<t>{{asset_name}}</t>").unwrap();
        let bindings = Bindings::new().with(Placeholder::AssetName, "Dock <USB-C> & \"HDMI\"");
        assert_eq!(
            markup.bind(&bindings).unwrap(),
            "<t>Dock &lt;USB-C&gt; &amp; &quot;HDMI&quot;</t>"
        );
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        let err = CompiledMarkup::compile("{{asset_tag}} {{Asset_Tag}}").unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder { ref name } if name == "Asset_Tag"));
    }

    #[test]
    fn test_spaced_token_is_unknown() {
        let err = CompiledMarkup::compile("{{ asset_tag }}").unwrap_err();
        assert!(matches!(err, TemplateError::UnknownPlaceholder { .. }));
    }

    #[test]
    fn test_unterminated_placeholder_rejected() {
        let err = CompiledMarkup::compile("<t>ok</t><t>{{asset_tag</t>").unwrap_err();
        assert!(matches!(err, TemplateError::Unterminated { offset: 12 }));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let markup = CompiledMarkup::compile("{{first_line}}").unwrap();
        let err = markup.bind(&Bindings::new()).unwrap_err();
        assert!(matches!(err, TemplateError::Unbound(Placeholder::FirstLine)));
    }

    #[test]
    fn test_literal_only_markup() {
        let markup = CompiledMarkup::compile("<label/>").unwrap();
        assert!(markup.placeholders().is_empty());
        assert_eq!(markup.bind(&Bindings::new()).unwrap(), "<label/>");
    }
}
