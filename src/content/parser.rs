use serde_json::{Map, Value};
use thiserror::Error;

use super::ContentRecord;

// Each field lists the canonical key first, then the spellings found in
// hand-authored target metadata.
const TITLE_KEYS: &[&str] = &["title"];
const AUTHOR_KEYS: &[&str] = &["author"];
const AVERAGE_RATING_KEYS: &[&str] = &["averageRating", "average rating", "average_rating"];
const RATING_COUNT_KEYS: &[&str] = &["ratingCount", "# of ratings", "rating_count"];
const LIST_PRICE_KEYS: &[&str] = &["listPrice", "list price", "list_price"];
const YOUR_PRICE_KEYS: &[&str] = &["yourPrice", "your price", "your_price"];
const THUMBNAIL_URL_KEYS: &[&str] = &["thumbnailUrl", "thumburl", "thumbnail_url"];
const DETAIL_URL_KEYS: &[&str] = &["detailUrl", "bookurl", "detail_url"];

/// Reasons a metadata document cannot become a [`ContentRecord`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedDocument {
    #[error("metadata document is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("metadata document must be a JSON object")]
    NotAnObject,
    #[error("metadata document has no thumbnail url")]
    MissingThumbnailUrl,
}

/// Parses a fetched metadata document.
///
/// Optional fields fall back to defaults: empty strings for text, `0` for
/// ratings, `None` for prices and the detail url. Numbers may arrive as JSON
/// numbers or numeric strings. The thumbnail url is mandatory because the
/// second fetch stage depends on it.
pub fn parse(bytes: &[u8]) -> Result<ContentRecord, MalformedDocument> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| MalformedDocument::InvalidJson(err.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(MalformedDocument::NotAnObject);
    };

    let thumbnail_url = text_field(&fields, THUMBNAIL_URL_KEYS)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or(MalformedDocument::MissingThumbnailUrl)?;

    Ok(ContentRecord {
        title: text_field(&fields, TITLE_KEYS).unwrap_or_default(),
        author: text_field(&fields, AUTHOR_KEYS).unwrap_or_default(),
        average_rating: number_field(&fields, AVERAGE_RATING_KEYS)
            .map(|rating| rating as f32)
            .unwrap_or(0.0),
        rating_count: number_field(&fields, RATING_COUNT_KEYS)
            .filter(|count| *count >= 0.0)
            .map(|count| count.min(u32::MAX as f64) as u32)
            .unwrap_or(0),
        list_price: text_field(&fields, LIST_PRICE_KEYS),
        your_price: text_field(&fields, YOUR_PRICE_KEYS),
        thumbnail_url,
        detail_url: text_field(&fields, DETAIL_URL_KEYS).filter(|url| !url.trim().is_empty()),
    })
}

fn lookup<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find(|value| !value.is_null())
}

fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match lookup(fields, keys)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn number_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    let number = match lookup(fields, keys)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_DOCUMENT: &str = r##"{
        "title": "The Hitchhiker's Guide",
        "author": "Douglas Adams",
        "average rating": "4.5",
        "# of ratings": "1,204",
        "list price": "12.99",
        "your price": "9.99",
        "thumburl": "https://cdn.example.com/thumbs/hhgttg.png",
        "bookurl": "https://shop.example.com/hhgttg"
    }"##;

    #[test]
    fn parses_legacy_key_spellings() {
        let record = parse(LEGACY_DOCUMENT.as_bytes()).unwrap();

        assert_eq!(record.title, "The Hitchhiker's Guide");
        assert_eq!(record.author, "Douglas Adams");
        assert_eq!(record.average_rating, 4.5);
        assert_eq!(record.rating_count, 1204);
        assert_eq!(record.list_price.as_deref(), Some("12.99"));
        assert_eq!(record.your_price.as_deref(), Some("9.99"));
        assert_eq!(record.thumbnail_url, "https://cdn.example.com/thumbs/hhgttg.png");
        assert_eq!(record.detail_url.as_deref(), Some("https://shop.example.com/hhgttg"));
    }

    #[test]
    fn optional_fields_take_defaults() {
        let record = parse(br#"{"thumbnailUrl": "thumb.png"}"#).unwrap();

        assert_eq!(record.title, "");
        assert_eq!(record.author, "");
        assert_eq!(record.average_rating, 0.0);
        assert_eq!(record.rating_count, 0);
        assert_eq!(record.list_price, None);
        assert_eq!(record.detail_url, None);
        assert_eq!(record.thumbnail_url, "thumb.png");
    }

    #[test]
    fn numeric_fields_accept_json_numbers() {
        let record = parse(
            br#"{"thumbnailUrl": "t.png", "averageRating": 3, "ratingCount": 17, "listPrice": 20}"#,
        )
        .unwrap();

        assert_eq!(record.average_rating, 3.0);
        assert_eq!(record.rating_count, 17);
        assert_eq!(record.list_price.as_deref(), Some("20"));
    }

    #[test]
    fn unparseable_numbers_fall_back_to_zero() {
        let record =
            parse(br#"{"thumbnailUrl": "t.png", "averageRating": "n/a", "ratingCount": -4}"#)
                .unwrap();

        assert_eq!(record.average_rating, 0.0);
        assert_eq!(record.rating_count, 0);
    }

    #[test]
    fn missing_thumbnail_url_is_rejected() {
        let err = parse(br#"{"title": "No picture"}"#).unwrap_err();
        assert_eq!(err, MalformedDocument::MissingThumbnailUrl);
    }

    #[test]
    fn blank_or_null_thumbnail_url_is_rejected() {
        assert_eq!(
            parse(br#"{"thumburl": "   "}"#).unwrap_err(),
            MalformedDocument::MissingThumbnailUrl
        );
        assert_eq!(
            parse(br#"{"thumbnailUrl": null}"#).unwrap_err(),
            MalformedDocument::MissingThumbnailUrl
        );
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert_eq!(parse(b"[1, 2, 3]").unwrap_err(), MalformedDocument::NotAnObject);
        assert!(matches!(
            parse(b"{ not json").unwrap_err(),
            MalformedDocument::InvalidJson(_)
        ));
    }

    #[test]
    fn serialized_record_parses_back_to_the_same_record() {
        let record = parse(LEGACY_DOCUMENT.as_bytes()).unwrap();
        let serialized = record.to_json_string().unwrap();

        assert!(serialized.contains("\"thumbnailUrl\""));
        assert_eq!(parse(serialized.as_bytes()).unwrap(), record);
    }
}
