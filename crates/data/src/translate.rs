//! Narrowing of vendor error bodies to a single message.
//!
//! The session reports `BadQuery` and `MissingResource` with the raw JSON error
//! body as the message. Each Data API operation rewrites that into the one
//! message a caller needs. The error body shapes differ per endpoint:
//!
//! | operation | body | message |
//! |---|---|---|
//! | quick search | `{"field": {"<name>": [{"message": ..}]}}` | first field, first message |
//! | asset listing | `{"general": [{"message": ..}]}` | `general[0].message` |
//! | activation | `{"general": {"message": ..}}` | `general.message` |
//!
//! Listing and activation disagree on the shape of `general`. Both are parsed
//! exactly as sent, by separate functions.
//!
//! A body that does not have the expected shape is an error in its own right
//! and is returned instead of the original error.

use serde_json::Value;

use crate::error::{DataError, Result};

/// First message of the first reported field in a quick-search error body.
///
/// "First" follows the key order of the body as sent by the server.
pub fn first_field_message(body: &str) -> Result<String> {
    let json: Value = serde_json::from_str(body)?;
    let (_, errors) = json
        .get("field")
        .and_then(Value::as_object)
        .and_then(|fields| fields.iter().next())
        .ok_or_else(|| malformed("field.<name>", body))?;
    errors
        .get(0)
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed("field.<name>[0].message", body))
}

/// `general[0].message` of an asset-listing error body.
pub fn general_list_message(body: &str) -> Result<String> {
    let json: Value = serde_json::from_str(body)?;
    json.get("general")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed("general[0].message", body))
}

/// `general.message` of an activation error body.
pub fn general_object_message(body: &str) -> Result<String> {
    let json: Value = serde_json::from_str(body)?;
    json.get("general")
        .and_then(Value::as_object)
        .and_then(|general| general.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| malformed("general.message", body))
}

/// Rewrite a quick-search `BadQuery`; other errors pass through.
pub fn narrow_bad_query(err: DataError) -> DataError {
    match err {
        DataError::BadQuery(body) => match first_field_message(&body) {
            Ok(msg) => DataError::BadQuery(msg),
            Err(e) => e,
        },
        other => other,
    }
}

/// Rewrite an asset-listing `MissingResource`; other errors pass through.
pub fn narrow_listing_missing(err: DataError) -> DataError {
    match err {
        DataError::MissingResource(body) => match general_list_message(&body) {
            Ok(msg) => DataError::MissingResource(msg),
            Err(e) => e,
        },
        other => other,
    }
}

/// Rewrite an activation `MissingResource`; other errors pass through.
pub fn narrow_activation_missing(err: DataError) -> DataError {
    match err {
        DataError::MissingResource(body) => match general_object_message(&body) {
            Ok(msg) => DataError::MissingResource(msg),
            Err(e) => e,
        },
        other => other,
    }
}

fn malformed(expected: &'static str, body: &str) -> DataError {
    DataError::MalformedErrorBody {
        expected,
        body: body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_query_takes_first_field_first_message() {
        let body = r#"{"field": {"geometry": [{"message": "invalid coordinates"}]}}"#;
        assert_eq!(first_field_message(body).unwrap(), "invalid coordinates");
    }

    #[test]
    fn bad_query_field_order_is_body_order() {
        let body = r#"{
            "field": {
                "item_types": [{"message": "unknown item type"}, {"message": "second"}],
                "filter": [{"message": "bad filter"}]
            },
            "general": []
        }"#;
        assert_eq!(first_field_message(body).unwrap(), "unknown item type");
    }

    #[test]
    fn listing_reads_general_list() {
        let body = r#"{"general": [{"message": "no such item"}, {"message": "other"}]}"#;
        assert_eq!(general_list_message(body).unwrap(), "no such item");
    }

    #[test]
    fn activation_reads_general_object() {
        let body = r#"{"general": {"message": "no such asset"}}"#;
        assert_eq!(general_object_message(body).unwrap(), "no such asset");
    }

    #[test]
    fn general_shapes_are_not_interchangeable() {
        let list = r#"{"general": [{"message": "no such item"}]}"#;
        let object = r#"{"general": {"message": "no such asset"}}"#;
        assert!(matches!(
            general_object_message(list),
            Err(DataError::MalformedErrorBody { expected: "general.message", .. })
        ));
        assert!(matches!(
            general_list_message(object),
            Err(DataError::MalformedErrorBody { expected: "general[0].message", .. })
        ));
    }

    #[test]
    fn missing_keys_are_fatal() {
        assert!(matches!(
            first_field_message(r#"{"general": []}"#),
            Err(DataError::MalformedErrorBody { .. })
        ));
        assert!(matches!(
            first_field_message(r#"{"field": {}}"#),
            Err(DataError::MalformedErrorBody { .. })
        ));
        assert!(matches!(
            first_field_message(r#"{"field": {"geometry": []}}"#),
            Err(DataError::MalformedErrorBody { expected: "field.<name>[0].message", .. })
        ));
        assert!(matches!(
            general_list_message(r#"{"general": []}"#),
            Err(DataError::MalformedErrorBody { .. })
        ));
    }

    #[test]
    fn non_json_body_is_fatal() {
        assert!(matches!(
            first_field_message("<html>Bad Request</html>"),
            Err(DataError::Json(_))
        ));
        assert!(matches!(
            narrow_listing_missing(DataError::MissingResource("Not Found".into())),
            DataError::Json(_)
        ));
    }

    #[test]
    fn narrowing_rewrites_only_its_own_kind() {
        let body = r#"{"field": {"geometry": [{"message": "invalid coordinates"}]}}"#;
        match narrow_bad_query(DataError::BadQuery(body.into())) {
            DataError::BadQuery(msg) => assert_eq!(msg, "invalid coordinates"),
            other => panic!("unexpected {other:?}"),
        }

        // A MissingResource during search is not a bad query; left as is.
        match narrow_bad_query(DataError::MissingResource("raw".into())) {
            DataError::MissingResource(msg) => assert_eq!(msg, "raw"),
            other => panic!("unexpected {other:?}"),
        }

        match narrow_activation_missing(DataError::ServerError("boom".into())) {
            DataError::ServerError(msg) => assert_eq!(msg, "boom"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
