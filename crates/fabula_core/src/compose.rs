//! JSON-level stage composition.
//!
//! The typed chain in [`crate::story`] makes field collisions unrepresentable,
//! but persistence and resume work with raw JSON values. This helper is the
//! single place where a new stage field is merged into a persisted record,
//! and it enforces the no-overwrite contract.

use fabula_error::{ComposeError, ComposeErrorKind, FabulaResult};
use serde_json::Value;

/// Merge one new stage field into a composed record value.
///
/// Returns a new object holding all of `previous`'s fields plus `field`.
/// The previous value is never mutated.
///
/// # Errors
///
/// Returns [`ComposeErrorKind::FieldCollision`] if `field` already exists on
/// `previous` - a programming-contract violation, stages add each field
/// exactly once. Returns [`ComposeErrorKind::MissingField`] if `previous` is
/// not a JSON object.
///
/// # Examples
///
/// ```
/// use fabula_core::compose_value;
/// use serde_json::json;
///
/// let story = json!({ "brief": { "title": "Fen" } });
/// let next = compose_value(&story, "plot", json!({ "summary": "..." })).unwrap();
/// assert!(next.get("brief").is_some());
/// assert!(next.get("plot").is_some());
///
/// // Composing the same field twice fails loudly.
/// assert!(compose_value(&next, "plot", json!({})).is_err());
/// ```
pub fn compose_value(previous: &Value, field: &str, new: Value) -> FabulaResult<Value> {
    let object = previous.as_object().ok_or_else(|| {
        ComposeError::new(ComposeErrorKind::MissingField(
            "composed record is not an object".to_string(),
        ))
    })?;

    if object.contains_key(field) {
        return Err(ComposeError::new(ComposeErrorKind::FieldCollision(field.to_string())).into());
    }

    let mut next = object.clone();
    next.insert(field.to_string(), new);
    Ok(Value::Object(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compose_preserves_all_previous_fields() {
        let brief = json!({ "brief": { "title": "t" } });
        let with_plot = compose_value(&brief, "plot", json!({ "summary": "s" })).unwrap();
        let with_prose = compose_value(&with_plot, "prose", json!({ "pages": [] })).unwrap();

        // Field-for-field equality with building the record directly.
        let direct = json!({
            "brief": { "title": "t" },
            "plot": { "summary": "s" },
            "prose": { "pages": [] },
        });
        assert_eq!(with_prose, direct);
    }

    #[test]
    fn collision_fails_loudly() {
        let record = json!({ "prose": {} });
        let err = compose_value(&record, "prose", json!({})).unwrap_err();
        assert!(format!("{}", err).contains("already present"));
    }

    #[test]
    fn previous_record_is_not_mutated() {
        let record = json!({ "brief": {} });
        let _ = compose_value(&record, "plot", json!({})).unwrap();
        assert_eq!(record, json!({ "brief": {} }));
    }
}
