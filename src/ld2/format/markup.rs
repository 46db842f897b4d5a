//! Reduces the XML/HTML-ish definition markup to plain text.
//!
//! Three shapes are recognised, in this order:
//! 1. a `<![CDATA[ ... ]]>` section: its content is returned;
//! 2. a `<? ... > ... </?` wrapper: the content after the first `>` is returned;
//! 3. anything else: the gaps between consecutive tags are concatenated.
//!
//! Tabs, newlines and the separators U+001E/U+001F become spaces in every
//! case. An empty result means no plain text could be extracted.

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";
const PI_OPEN: &str = "<?";
const PI_CLOSE: &str = "</?";

/// Strips markup from a definition.
pub fn strip(xml: &str) -> String {
    if let Some(open) = xml.find(CDATA_OPEN) {
        return match xml[open..].find(CDATA_CLOSE) {
            Some(close) => normalize(&xml[open + CDATA_OPEN.len()..open + close]),
            None => String::new(),
        };
    }

    if let Some(open) = xml.find(PI_OPEN) {
        return match xml[open..].find(PI_CLOSE) {
            Some(close) => {
                let end = open + close;
                let start = find_byte(xml.as_bytes(), b'>', open + 1).map_or(0, |gt| gt + 1);
                if start <= end {
                    normalize(&xml[start..end])
                } else {
                    String::new()
                }
            }
            None => String::new(),
        };
    }

    strip_tags(xml)
}

/// Concatenates the text between tags.
///
/// The n-th `>` is paired with the (n+1)-th `<`. The scan starts with its
/// `>` cursor on the first character, so that character is never part of
/// the output, and text after the last `<` is dropped. Input without any
/// `<` yields an empty string.
fn strip_tags(xml: &str) -> String {
    let bytes = xml.as_bytes();
    let mut text = String::new();

    let Some(mut open) = find_byte(bytes, b'<', 0) else {
        return text;
    };
    let mut end = 0;
    // Width of the character under the `>` cursor; only the first one can be wider than a byte.
    let mut skip = xml.chars().next().map_or(1, char::len_utf8);

    loop {
        let start = end + skip;
        if open > start {
            text.push_str(&xml[start..open]);
        }
        skip = 1;

        match (find_byte(bytes, b'<', open + 1), find_byte(bytes, b'>', end + 1)) {
            (Some(next_open), Some(next_end)) => {
                open = next_open;
                end = next_end;
            }
            _ => break,
        }
    }

    normalize(&text)
}

fn find_byte(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|pos| pos + from)
}

fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\u{1e}' | '\u{1f}' => ' ',
            other => other,
        })
        .collect()
}
