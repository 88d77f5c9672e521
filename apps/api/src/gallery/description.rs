//! Splits card descriptions into plain-text and link segments.
//!
//! Curators write links inline as `[text](url)`. Anything that doesn't form a
//! complete link (unterminated brackets, empty text or url) stays plain text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DescriptionSegment {
    Text { text: String },
    Link { text: String, url: String },
}

pub fn split_description(description: &str) -> Vec<DescriptionSegment> {
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(offset) = description[cursor..].find('[') {
        let open = cursor + offset;
        match parse_link_at(description, open) {
            Some((text, url, end)) => {
                if open > plain_start {
                    segments.push(DescriptionSegment::Text {
                        text: description[plain_start..open].to_string(),
                    });
                }
                segments.push(DescriptionSegment::Link {
                    text: text.to_string(),
                    url: url.to_string(),
                });
                plain_start = end;
                cursor = end;
            }
            None => cursor = open + 1,
        }
    }

    if plain_start < description.len() {
        segments.push(DescriptionSegment::Text {
            text: description[plain_start..].to_string(),
        });
    }
    segments
}

/// Parses `[text](url)` starting at the `[` at byte `open`. Returns the text,
/// the url and the byte index just past the closing `)`.
fn parse_link_at(s: &str, open: usize) -> Option<(&str, &str, usize)> {
    let text_start = open + 1;
    let close = text_start + s[text_start..].find(']')?;
    if close == text_start || !s[close + 1..].starts_with('(') {
        return None;
    }
    let url_start = close + 2;
    let url_end = url_start + s[url_start..].find(')')?;
    if url_end == url_start {
        return None;
    }
    Some((&s[text_start..close], &s[url_start..url_end], url_end + 1))
}
