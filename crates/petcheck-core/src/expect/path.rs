//! Dotted JSON paths: `category.name`, `tags[0].name`, `""` for the root

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a JSON document.
///
/// Parsing never fails: a segment that is not a valid index is kept as a
/// literal key, which then simply does not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    raw: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    #[must_use]
    pub fn root() -> Self {
        Self::parse("")
    }

    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            segments: parse_segments(raw),
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Value at this path, or `None` if any segment is missing.
    #[must_use]
    pub fn resolve<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match segment {
                Segment::Key(key) => current.as_object()?.get(key),
                Segment::Index(i) => current.as_array()?.get(*i),
            })
    }

    /// Display form of element `index` of this collection, optionally
    /// followed by a path inside that element: `tags[2].name`.
    #[must_use]
    pub fn item(&self, index: usize, inner: &JsonPath) -> String {
        let mut out = format!("{}[{index}]", self.raw);
        if !inner.is_root() {
            out.push('.');
            out.push_str(&inner.raw);
        }
        out
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_root() {
            f.write_str("$")
        } else {
            f.write_str(&self.raw)
        }
    }
}

impl From<&str> for JsonPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

fn parse_segments(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    for part in raw.split('.').filter(|p| !p.is_empty()) {
        let (key, mut rest) = match part.find('[') {
            Some(i) => part.split_at(i),
            None => (part, ""),
        };
        if !key.is_empty() {
            segments.push(Segment::Key(key.to_string()));
        }
        while let Some(open) = rest.strip_prefix('[') {
            let Some(close) = open.find(']') else {
                segments.push(Segment::Key(rest.to_string()));
                rest = "";
                break;
            };
            let inner = &open[..close];
            segments.push(match inner.parse::<usize>() {
                Ok(i) => Segment::Index(i),
                Err(_) => Segment::Key(inner.to_string()),
            });
            rest = &open[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Key(rest.to_string()));
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        json!({
            "id": 7,
            "category": {"id": 1, "name": "Dogs"},
            "tags": [{"id": 1, "name": "friendly"}, {"id": 2, "name": "quiet"}],
            "matrix": [[1, 2], [3, 4]]
        })
    }

    #[test]
    fn root_resolves_to_document() {
        let d = doc();
        assert_eq!(JsonPath::root().resolve(&d), Some(&d));
        assert_eq!(JsonPath::root().to_string(), "$");
    }

    #[test]
    fn nested_key() {
        let d = doc();
        assert_eq!(
            JsonPath::parse("category.name").resolve(&d),
            Some(&json!("Dogs"))
        );
    }

    #[test]
    fn indexed_key() {
        let d = doc();
        assert_eq!(
            JsonPath::parse("tags[1].name").resolve(&d),
            Some(&json!("quiet"))
        );
        assert_eq!(JsonPath::parse("matrix[1][0]").resolve(&d), Some(&json!(3)));
    }

    #[test]
    fn leading_index_on_array_root() {
        let arr = json!([{"status": "sold"}]);
        assert_eq!(
            JsonPath::parse("[0].status").resolve(&arr),
            Some(&json!("sold"))
        );
    }

    #[test]
    fn missing_segments_resolve_to_none() {
        let d = doc();
        assert_eq!(JsonPath::parse("owner").resolve(&d), None);
        assert_eq!(JsonPath::parse("tags[5]").resolve(&d), None);
        assert_eq!(JsonPath::parse("id.value").resolve(&d), None);
        assert_eq!(JsonPath::parse("tags[x]").resolve(&d), None);
        assert_eq!(JsonPath::parse("tags[0").resolve(&d), None);
    }

    #[test]
    fn item_location() {
        let tags = JsonPath::parse("tags");
        assert_eq!(tags.item(2, &JsonPath::parse("name")), "tags[2].name");
        assert_eq!(JsonPath::root().item(0, &JsonPath::parse("status")), "[0].status");
        assert_eq!(tags.item(1, &JsonPath::root()), "tags[1]");
    }
}
