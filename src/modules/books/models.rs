use serde::{Deserialize, Serialize};
use shelf_kernel::settings::ValidationPolicy;

/// A book record as stored in the data file and exchanged over HTTP.
///
/// Every field defaults when absent so that an incomplete payload reaches
/// validation instead of failing to decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    /// Unique identifier, supplied by the client and immutable afterwards
    pub book_id: String,
    /// Opaque author reference; never resolved
    pub author_id: String,
    /// Opaque publisher reference; never resolved
    pub publisher_id: String,
    pub title: String,
    /// Kept verbatim so it round-trips unchanged
    pub publication_date: String,
    pub isbn: String,
    pub pages: i64,
    pub genre: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Book {
    /// Names of required fields that are blank under `policy`.
    pub fn missing_fields(&self, policy: ValidationPolicy) -> Vec<&'static str> {
        let mut checks = vec![("book_id", &self.book_id)];
        if policy == ValidationPolicy::Strict {
            checks.push(("author_id", &self.author_id));
            checks.push(("publisher_id", &self.publisher_id));
        }

        checks
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| field)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(book_id: &str, author_id: &str, publisher_id: &str) -> Book {
        Book {
            book_id: book_id.to_string(),
            author_id: author_id.to_string(),
            publisher_id: publisher_id.to_string(),
            ..Book::default()
        }
    }

    #[test]
    fn strict_requires_all_identifiers() {
        assert!(book("1", "101", "201")
            .missing_fields(ValidationPolicy::Strict)
            .is_empty());
        assert_eq!(
            book("1", "", " ").missing_fields(ValidationPolicy::Strict),
            vec!["author_id", "publisher_id"]
        );
    }

    #[test]
    fn relaxed_requires_only_book_id() {
        assert!(book("1", "", "").missing_fields(ValidationPolicy::Relaxed).is_empty());
        assert_eq!(
            book("", "101", "201").missing_fields(ValidationPolicy::Relaxed),
            vec!["book_id"]
        );
    }

    #[test]
    fn partial_payload_decodes_with_defaults() {
        let book: Book = serde_json::from_str(r#"{"book_id": "7", "title": "Dune"}"#).unwrap();
        assert_eq!(book.book_id, "7");
        assert_eq!(book.pages, 0);
        assert!(book.author_id.is_empty());
        assert!(book.description.is_none());
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let book = Book {
            book_id: "1".to_string(),
            publication_date: "2016-11-01T00:00:00Z".to_string(),
            price: 39.99,
            ..Book::default()
        };

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value["book_id"], "1");
        assert_eq!(value["publication_date"], "2016-11-01T00:00:00Z");
        assert_eq!(value["price"], 39.99);
        assert!(value.get("description").is_none());
    }
}
