//! Field normalization for raw catalog columns.
//!
//! Both functions are total: whatever the export put in a cell, they return
//! a usable value and never an error.

use catalog::{RawImages, RawPrice};
use serde_json::Value;

use crate::literal::{parse_literal, Literal};

/// Image URL used when a product has no usable image
pub const DEFAULT_IMAGE_URL: &str = "https://example.com/default-image.jpg";

/// Coerce a raw price cell to a non-negative float.
///
/// - absent → 0.0
/// - number → itself, except NaN / infinite / negative → 0.0
/// - string → every character other than `0-9` and `.` is dropped, the rest
///   is parsed; nothing left or unparseable (`"1.2.3"`) → 0.0
/// - anything else → 0.0
pub fn normalize_price(raw: Option<&RawPrice>) -> f64 {
    let value = match raw {
        None => return 0.0,
        Some(RawPrice::Number(n)) => *n,
        Some(RawPrice::Text(s)) => parse_price_text(s),
        Some(RawPrice::Other(Value::Number(n))) => n.as_f64().unwrap_or(0.0),
        Some(RawPrice::Other(Value::String(s))) => parse_price_text(s),
        Some(RawPrice::Other(_)) => 0.0,
    };

    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn parse_price_text(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// First URL of a raw image cell, or [`DEFAULT_IMAGE_URL`].
///
/// A string cell must be a list literal whose first element is a string;
/// tuples, empty lists, non-string first elements and parse failures all
/// fall back to the placeholder. An already-decoded array is handled the
/// same way.
pub fn first_image_url(raw: Option<&RawImages>) -> String {
    let first = match raw {
        Some(RawImages::Text(text)) => first_string_of_literal(text),
        Some(RawImages::List(items)) => first_string_of_json(items),
        Some(RawImages::Other(Value::Array(items))) => first_string_of_json(items),
        Some(RawImages::Other(_)) | None => None,
    };

    first.unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string())
}

fn first_string_of_literal(text: &str) -> Option<String> {
    match parse_literal(text).ok()? {
        Literal::List(items) => match items.into_iter().next()? {
            Literal::Str(url) => Some(url),
            _ => None,
        },
        _ => None,
    }
}

fn first_string_of_json(items: &[Value]) -> Option<String> {
    items.first()?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_price(s: &str) -> RawPrice {
        RawPrice::Text(s.to_string())
    }

    fn text_images(s: &str) -> RawImages {
        RawImages::Text(s.to_string())
    }

    // ============================================================================
    // normalize_price
    // ============================================================================

    #[test]
    fn test_price_currency_string() {
        assert_eq!(normalize_price(Some(&text_price("$24.99"))), 24.99);
        assert_eq!(normalize_price(Some(&text_price("USD 1,299.00"))), 1299.0);
    }

    #[test]
    fn test_price_absent() {
        assert_eq!(normalize_price(None), 0.0);
    }

    #[test]
    fn test_price_numeric() {
        assert_eq!(normalize_price(Some(&RawPrice::Number(19.5))), 19.5);
        assert_eq!(normalize_price(Some(&RawPrice::Number(0.0))), 0.0);
    }

    #[test]
    fn test_price_not_a_number() {
        assert_eq!(normalize_price(Some(&text_price("N/A"))), 0.0);
        assert_eq!(normalize_price(Some(&text_price(""))), 0.0);
        assert_eq!(normalize_price(Some(&text_price("."))), 0.0);
        assert_eq!(normalize_price(Some(&text_price("1.2.3"))), 0.0);
    }

    #[test]
    fn test_price_sign_is_stripped_from_strings() {
        assert_eq!(normalize_price(Some(&text_price("-$5.00"))), 5.0);
    }

    #[test]
    fn test_price_odd_numbers_become_zero() {
        assert_eq!(normalize_price(Some(&RawPrice::Number(f64::NAN))), 0.0);
        assert_eq!(normalize_price(Some(&RawPrice::Number(f64::INFINITY))), 0.0);
        assert_eq!(normalize_price(Some(&RawPrice::Number(-3.0))), 0.0);
    }

    #[test]
    fn test_price_other_json_values() {
        assert_eq!(normalize_price(Some(&RawPrice::Other(Value::Bool(true)))), 0.0);
        assert_eq!(
            normalize_price(Some(&RawPrice::Other(serde_json::json!({"amount": 3})))),
            0.0
        );
    }

    // ============================================================================
    // first_image_url
    // ============================================================================

    #[test]
    fn test_image_first_of_list_literal() {
        let raw = text_images("['http://a.com/1.jpg','http://a.com/2.jpg']");
        assert_eq!(first_image_url(Some(&raw)), "http://a.com/1.jpg");
    }

    #[test]
    fn test_image_not_a_list() {
        assert_eq!(first_image_url(Some(&text_images("not a list"))), DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_image_empty_list() {
        assert_eq!(first_image_url(Some(&text_images("[]"))), DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_image_wrong_shapes() {
        for raw in [
            "('http://a.com/1.jpg',)",
            "'http://a.com/1.jpg'",
            "[1, 'http://a.com/1.jpg']",
            "[None]",
            "[b'http://a.com/1.jpg']",
            "{'url': 'http://a.com/1.jpg'}",
            "['http://a.com/1.jpg'",
        ] {
            assert_eq!(
                first_image_url(Some(&text_images(raw))),
                DEFAULT_IMAGE_URL,
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_image_deeply_nested_brackets() {
        let raw = text_images(&"[".repeat(100_000));
        assert_eq!(first_image_url(Some(&raw)), DEFAULT_IMAGE_URL);

        let closed = format!("{}'http://a.com/1.jpg'{}", "[".repeat(5_000), "]".repeat(5_000));
        assert_eq!(first_image_url(Some(&text_images(&closed))), DEFAULT_IMAGE_URL);
    }

    #[test]
    fn test_image_absent() {
        assert_eq!(first_image_url(None), DEFAULT_IMAGE_URL);
        assert_eq!(
            first_image_url(Some(&RawImages::Other(Value::Null))),
            DEFAULT_IMAGE_URL
        );
    }

    #[test]
    fn test_image_decoded_json_array() {
        let raw = RawImages::List(vec![
            Value::String("http://a.com/x.jpg".into()),
            Value::String("http://a.com/y.jpg".into()),
        ]);
        assert_eq!(first_image_url(Some(&raw)), "http://a.com/x.jpg");

        let raw = RawImages::List(vec![Value::from(3)]);
        assert_eq!(first_image_url(Some(&raw)), DEFAULT_IMAGE_URL);
    }
}
