//! SVG generation: attribute maps, number formatting and element emission

use std::fmt::Write as _;

use indexmap::IndexMap;

/// A serializable attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Num(f64),
    Str(String),
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Num(v)
    }
}

impl From<usize> for AttrValue {
    fn from(v: usize) -> Self {
        AttrValue::Num(v as f64)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        AttrValue::Str(v)
    }
}

impl AttrValue {
    fn render(&self, prec: usize) -> String {
        match self {
            AttrValue::Num(v) => format_num(*v, prec),
            AttrValue::Str(s) => escape_attr(s),
        }
    }
}

/// Ordered rendering attributes of a node.
///
/// Keys are stored as given and hyphenated on output; unset values are
/// never stored, so serialization only sees real attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    entries: IndexMap<String, AttrValue>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.entries.insert(key.to_string(), value.into());
    }

    /// Set `key`, or remove it when `value` is `None`.
    pub fn set_opt<V: Into<AttrValue>>(&mut self, key: &str, value: Option<V>) {
        match value {
            Some(v) => self.set(key, v),
            None => self.remove(key),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.shift_remove(key);
    }

    /// Builder form of [`Attrs::set`].
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` only when it is not already present.
    pub fn set_default(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.entries.entry(key.to_string()).or_insert_with(|| value.into());
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of `self`.
    pub fn merge(mut self, other: &Attrs) -> Self {
        for (k, v) in &other.entries {
            self.entries.insert(k.clone(), v.clone());
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Attrs {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Round to `prec` decimals, trimming trailing zeros and normalising `-0`.
pub fn format_num(v: f64, prec: usize) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut s = format!("{v:.prec$}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// `stroke_width` → `stroke-width`
pub fn attr_key(key: &str) -> String {
    key.replace('_', "-")
}

/// Escape text content, passing through well-formed entities such as `&amp;`.
pub fn escape_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for (i, ch) in s.char_indices() {
        match ch {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' if is_entity_at(s.as_bytes(), i) => result.push('&'),
            '&' => result.push_str("&amp;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Check if position i in bytes starts an HTML entity.
/// Matches: &[#]?[a-zA-Z0-9]+;
fn is_entity_at(bytes: &[u8], i: usize) -> bool {
    if bytes.get(i) != Some(&b'&') {
        return false;
    }
    let mut j = i + 1;
    if bytes.get(j) == Some(&b'#') {
        j += 1;
    }
    let start = j;
    while let Some(&c) = bytes.get(j) {
        if c == b';' {
            return j > start;
        } else if c.is_ascii_alphanumeric() {
            j += 1;
        } else {
            return false;
        }
    }
    false
}

/// Escape an attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Append `<tag a="b" ...>inner</tag>`, or a self-closing element when
/// `inner` is `None`.
pub fn write_element(out: &mut String, tag: &str, attrs: &Attrs, inner: Option<&str>, prec: usize) {
    out.push('<');
    out.push_str(tag);
    for (key, value) in attrs.iter() {
        // writing into a String cannot fail
        let _ = write!(out, " {}=\"{}\"", attr_key(key), value.render(prec));
    }
    match inner {
        Some(inner) => {
            out.push('>');
            out.push_str(inner);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        None => out.push_str(" />"),
    }
}

/// `x,y x,y ...` for `points` attributes.
pub fn format_points(points: &[glam::DVec2], prec: usize) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", format_num(p.x, prec), format_num(p.y, prec)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_rounded_and_trimmed() {
        assert_eq!(format_num(1.0, 2), "1");
        assert_eq!(format_num(1.23456, 2), "1.23");
        assert_eq!(format_num(0.5, 3), "0.5");
        assert_eq!(format_num(-0.0001, 2), "0");
        assert_eq!(format_num(-90.0, 2), "-90");
        assert_eq!(format_num(f64::NAN, 2), "0");
        assert_eq!(format_num(12.0, 0), "12");
    }

    #[test]
    fn keys_are_hyphenated() {
        assert_eq!(attr_key("stroke_width"), "stroke-width");
        assert_eq!(attr_key("font_family"), "font-family");
        assert_eq!(attr_key("x"), "x");
    }

    #[test]
    fn unset_values_are_dropped() {
        let mut attrs = Attrs::new().with("fill", "red").with("opacity", 0.5);
        attrs.set_opt::<f64>("opacity", None);
        attrs.remove("fill");
        assert!(!attrs.contains("fill"));
        assert!(!attrs.contains("opacity"));
        assert!(attrs.is_empty());
    }

    #[test]
    fn text_escaping_keeps_entities() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_text("&amp; &#945;"), "&amp; &#945;");
        assert_eq!(escape_text("R&D"), "R&amp;D");
        assert_eq!(escape_attr("say \"hi\""), "say &quot;hi&quot;");
    }

    #[test]
    fn elements_serialize_in_insertion_order() {
        let attrs = Attrs::new().with("x", 1.005).with("stroke_width", 2.0);
        let mut out = String::new();
        write_element(&mut out, "rect", &attrs, None, 2);
        insta::assert_snapshot!(out, @r#"<rect x="1" stroke-width="2" />"#);

        let mut out = String::new();
        write_element(&mut out, "text", &Attrs::new(), Some("hi"), 2);
        assert_eq!(out, "<text>hi</text>");
    }
}
