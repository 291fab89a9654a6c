use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A book is an open record: `id`, `title` and `author` by convention, plus
/// whatever else the caller sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Book(Map<String, Value>);

impl Book {
    /// Builds `{ id, ...payload }`. A payload `id` replaces the generated one.
    pub fn new(id: String, payload: Map<String, Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::String(id));
        for (key, value) in payload {
            fields.insert(key, value);
        }
        Book(fields)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Only string ids can match a path segment.
    pub fn has_id(&self, id: &str) -> bool {
        self.id() == Some(id)
    }

    /// Shallow merge: top-level fields of `patch` replace ours, `id` included.
    pub fn merge(&self, patch: &Map<String, Value>) -> Book {
        let mut fields = self.0.clone();
        for (key, value) in patch {
            fields.insert(key.clone(), value.clone());
        }
        Book(fields)
    }
}

impl From<Map<String, Value>> for Book {
    fn from(fields: Map<String, Value>) -> Self {
        Book(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_new_puts_id_first() {
        let book = Book::new(
            "d5fE_asz".into(),
            object(json!({"title": "The Black Swan", "author": "Nassim Nicholas Taleb"})),
        );

        let keys: Vec<&str> = book.0.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "title", "author"]);
        assert_eq!(book.id(), Some("d5fE_asz"));
    }

    #[test]
    fn test_new_payload_id_overrides_generated() {
        let book = Book::new("generatd".into(), object(json!({"id": "mine", "title": "Dune"})));

        assert_eq!(book.id(), Some("mine"));
        assert_eq!(serde_json::to_value(&book).unwrap(), json!({"id": "mine", "title": "Dune"}));
    }

    #[test]
    fn test_non_string_id_never_matches() {
        let book = Book::new("x".into(), object(json!({"id": 42})));

        assert_eq!(book.id(), None);
        assert!(!book.has_id("42"));
    }

    #[test]
    fn test_merge_is_shallow() {
        let book = Book::from(object(json!({
            "id": "abc",
            "title": "Dune",
            "meta": {"pages": 412, "lang": "en"}
        })));

        let merged = book.merge(&object(json!({"meta": {"pages": 500}, "year": 1965})));

        assert_eq!(
            serde_json::to_value(&merged).unwrap(),
            json!({"id": "abc", "title": "Dune", "meta": {"pages": 500}, "year": 1965})
        );
        // source record untouched
        assert_eq!(book.get("year"), None);
    }

    #[test]
    fn test_merge_can_change_id() {
        let book = Book::from(object(json!({"id": "abc", "title": "Dune"})));
        let merged = book.merge(&object(json!({"id": "xyz"})));

        assert!(merged.has_id("xyz"));
        assert!(!merged.has_id("abc"));
    }
}
