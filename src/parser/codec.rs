//! Attribute payloads: JSON that the page template HTML-escaped into an
//! attribute value, e.g. `periodes="[{&quot;schooljaar&quot;:...}]"`.

use quick_xml::escape::resolve_html5_entity;
use serde_json::Value;

use crate::error::DecodeError;

/// Longest HTML5 entity name ("CounterClockwiseContourIntegral") plus one.
const MAX_ENTITY_LEN: usize = 32;

/// Decode an escaped attribute value into a JSON tree.
pub fn decode_attr(raw: &str) -> Result<Value, DecodeError> {
    let unescaped = decode_entities(raw);
    Ok(serde_json::from_str(&unescaped)?)
}

/// Inverse of [`decode_attr`]: serialize and escape for use inside a
/// double-quoted attribute.
#[cfg(test)]
pub fn encode_attr(value: &Value) -> String {
    escape_entities(&value.to_string())
}

/// Resolve named (the HTML5 set) and numeric character references.
/// Unknown or malformed references are kept literally.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let resolved = tail[1..]
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| resolve_entity(&tail[1..end + 1], &mut out).then_some(end));
        match resolved {
            Some(end) => rest = &tail[end + 2..],
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Append the text `name` refers to; false when it is not a reference.
fn resolve_entity(name: &str, out: &mut String) -> bool {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => num.parse::<u32>().ok(),
        };
        return match code.and_then(char::from_u32) {
            Some(c) => {
                out.push(c);
                true
            }
            None => false,
        };
    }
    match resolve_html5_entity(name) {
        Some(text) => {
            out.push_str(text);
            true
        }
        None => false,
    }
}

#[cfg(test)]
fn escape_entities(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_quoted_payload() {
        let raw = "[{&quot;schooljaar&quot;:&quot;2022-2023&quot;,&quot;percentage&quot;:91.2}]";
        let v = decode_attr(raw).unwrap();
        assert_eq!(v, json!([{"schooljaar": "2022-2023", "percentage": 91.2}]));
    }

    #[test]
    fn numeric_references() {
        assert_eq!(decode_entities("a&#34;b&#x27;c"), "a\"b'c");
        assert_eq!(decode_entities("&#8212;"), "—");
    }

    #[test]
    fn named_references_beyond_latin1() {
        assert_eq!(decode_entities("Dalton&rsquo;s"), "Dalton’s");
        assert_eq!(decode_entities("Lyc&eacute;e Fran&ccedil;ais"), "Lycée Français");
        assert_eq!(decode_entities("Cre&oacute;n&hellip;"), "Creón…");
        assert_eq!(decode_entities("&ldquo;x&rdquo; &middot; &Ouml;"), "“x” · Ö");
        assert_eq!(
            decode_attr("{&quot;vraag&quot;:&quot;Ben je tevreden over de mentor&rsquo;s uitleg?&quot;}").unwrap(),
            json!({"vraag": "Ben je tevreden over de mentor’s uitleg?"})
        );
    }

    #[test]
    fn unknown_entities_kept() {
        assert_eq!(decode_entities("R&D &bogus; x"), "R&D &bogus; x");
        assert_eq!(decode_entities("a & b"), "a & b");
        assert_eq!(decode_entities("&lt;5"), "<5");
        assert_eq!(decode_entities("R&D &amp; co"), "R&D & co");
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = decode_attr("[{&quot;schooljaar&quot;:").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn round_trip() {
        let values = [
            json!([]),
            json!({"a": "x & y", "b": [1, 2.5, null], "c": "<tag attr=\"v\">'q'</tag>"}),
            json!([{"schooljaar": "2021-2022", "cijfer": 7.1, "naam": "Café &amp; co"}]),
            json!("&quot; literal"),
        ];
        for v in values {
            assert_eq!(decode_attr(&encode_attr(&v)).unwrap(), v);
        }
    }
}
