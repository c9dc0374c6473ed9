//! Validation boundary for raw embedding input
//!
//! Embeddings arrive from storage in whatever shape the writer produced: a JSON
//! array of numbers, a Postgres-style delimited string such as `"[0.1, -0.2]"` or
//! `"{0.1,-0.2}"`, or something unusable. Everything past this module works on
//! [`Vector`]s of exactly the configured dimension.

use crate::{Error, Result, Vector};
use serde_json::Value;

/// Normalize an arbitrary raw value into a vector of exactly `expected_dim` entries.
///
/// Arrays have each element coerced to a number: numbers as-is, numeric strings
/// parsed, blank strings and `null` as 0, booleans as 1 or 0, a one-element array
/// as its element, anything else non-finite. Strings are parsed with
/// [`parse_vector_str`]. Any other shape is rejected.
pub fn sanitize(raw: &Value, expected_dim: usize) -> Result<Vector> {
    let values: Vec<f64> = match raw {
        Value::Array(items) => items.iter().map(coerce_number).collect(),
        Value::String(s) => parse_vector_str(s),
        Value::Null => return Err(Error::InvalidVector("missing vector".to_string())),
        other => {
            return Err(Error::InvalidVector(format!(
                "unsupported vector shape: {}",
                value_kind(other)
            )))
        }
    };
    sanitize_values(&values, expected_dim)
}

/// Fit already-numeric input to `expected_dim`, zero-filling missing components,
/// truncating excess ones and zeroing non-finite values.
///
/// Fails when the input is empty or no copied component was finite. A vector of
/// finite zeros is accepted.
pub fn sanitize_values(values: &[f64], expected_dim: usize) -> Result<Vector> {
    if values.is_empty() {
        return Err(Error::InvalidVector("no usable data".to_string()));
    }

    let mut out = Vector::zeros(expected_dim);
    let mut saw_finite = false;
    for (slot, value) in out.as_mut_slice().iter_mut().zip(values.iter()) {
        if value.is_finite() {
            *slot = *value;
            saw_finite = true;
        }
    }

    if saw_finite {
        Ok(out)
    } else {
        Err(Error::InvalidVector("no finite values".to_string()))
    }
}

/// Parse a delimited vector string.
///
/// One leading `[`/`{` and one trailing `]`/`}` are stripped and the remainder is
/// split on commas. A blank token reads as 0; a token that does not parse to a
/// finite number is dropped, shifting later values left.
pub fn parse_vector_str(s: &str) -> Vec<f64> {
    let trimmed = s.trim();
    let trimmed = trimmed
        .strip_prefix(|c: char| c == '[' || c == '{')
        .unwrap_or(trimmed);
    let trimmed = trimmed
        .strip_suffix(|c: char| c == ']' || c == '}')
        .unwrap_or(trimmed);

    if trimmed.is_empty() {
        return Vec::new();
    }

    trimmed
        .split(',')
        .map(parse_token)
        .filter(|n| n.is_finite())
        .collect()
}

/// Average a batch of embeddings (one per source text) into a single vector.
///
/// Empty input vectors are skipped. Each remaining vector is fitted to
/// `expected_dim` with non-finite components zeroed before averaging.
pub fn mean_pool(vectors: &[Vec<f64>], expected_dim: usize) -> Result<Vector> {
    let usable: Vec<&Vec<f64>> = vectors.iter().filter(|v| !v.is_empty()).collect();
    if usable.is_empty() {
        return Err(Error::EmptyInputSet);
    }

    let mut sum = Vector::zeros(expected_dim);
    for v in &usable {
        let mut fitted = Vector::zeros(expected_dim);
        for (slot, value) in fitted.as_mut_slice().iter_mut().zip(v.iter()) {
            *slot = if value.is_finite() { *value } else { 0.0 };
        }
        sum += &fitted;
    }

    let mut mean = sum;
    mean /= usable.len() as f64;
    for x in mean.as_mut_slice() {
        if !x.is_finite() {
            *x = 0.0;
        }
    }
    Ok(mean)
}

fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => coerce_as_text(single),
            _ => f64::NAN,
        },
        other => coerce_as_text(other),
    }
}

// A value as it reads once rendered to text: `null` is blank, booleans and
// objects are words.
fn coerce_as_text(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_token(s),
        Value::Array(items) => match items.as_slice() {
            [] => 0.0,
            [single] => coerce_as_text(single),
            _ => f64::NAN,
        },
        Value::Bool(_) | Value::Object(_) => f64::NAN,
    }
}

fn parse_token(token: &str) -> f64 {
    let token = token.trim();
    if token.is_empty() {
        return 0.0;
    }
    token.parse::<f64>().unwrap_or(f64::NAN)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_is_padded_to_dimension() {
        let v = sanitize(&json!([0.5, -1.0]), 4).unwrap();
        assert_eq!(v.as_slice(), &[0.5, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_array_is_truncated_to_dimension() {
        let v = sanitize(&json!([1, 2, 3, 4, 5]), 3).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_bracket_and_brace_strings() {
        let v = sanitize(&json!("[0.1, -0.2]"), 2).unwrap();
        assert_eq!(v.as_slice(), &[0.1, -0.2]);

        let v = sanitize(&json!("{0.1,-0.2,3}"), 3).unwrap();
        assert_eq!(v.as_slice(), &[0.1, -0.2, 3.0]);
    }

    #[test]
    fn test_string_drops_unparseable_tokens() {
        // Dropped tokens shift later values left
        assert_eq!(parse_vector_str("[1, abc, 2, NaN, inf]"), vec![1.0, 2.0]);
        assert_eq!(parse_vector_str("  []  "), Vec::<f64>::new());
        assert_eq!(parse_vector_str(""), Vec::<f64>::new());
    }

    #[test]
    fn test_string_blank_tokens_read_as_zero() {
        assert_eq!(parse_vector_str("[1,,2]"), vec![1.0, 0.0, 2.0]);
        assert_eq!(parse_vector_str("{ , 3}"), vec![0.0, 3.0]);

        let v = sanitize(&json!("[1,,2]"), 3).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 0.0, 2.0]);

        let blank = sanitize(&json!("[ ]"), 3).unwrap();
        assert!(blank.is_zero());
        assert_eq!(blank.dim(), 3);
    }

    #[test]
    fn test_array_elements_coerce_like_number_conversion() {
        let v = sanitize(&json!([1.0, "NaN", null, "2.5", true, false, "", " ", [4], []]), 10).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 0.0, 0.0, 2.5, 1.0, 0.0, 0.0, 0.0, 4.0, 0.0]);

        let v = sanitize(&json!([true, 0.5]), 2).unwrap();
        assert_eq!(v.as_slice(), &[1.0, 0.5]);

        let v = sanitize(&json!([{"a": 1}, [1, 2], [true], "x", 3]), 5).unwrap();
        assert_eq!(v.as_slice(), &[0.0, 0.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn test_null_elements_are_finite_zeros() {
        let v = sanitize(&json!([null, null]), 2).unwrap();
        assert!(v.is_zero());
    }

    #[test]
    fn test_empty_input_is_invalid() {
        assert!(matches!(sanitize(&json!([]), 3), Err(Error::InvalidVector(_))));
        assert!(matches!(sanitize(&json!("[]"), 3), Err(Error::InvalidVector(_))));
    }

    #[test]
    fn test_no_finite_values_is_invalid() {
        assert!(matches!(
            sanitize(&json!(["x", {"a": 1}, "inf"]), 3),
            Err(Error::InvalidVector(_))
        ));
    }

    #[test]
    fn test_finite_zeros_are_accepted() {
        let v = sanitize(&json!([0.0, 0.0]), 3).unwrap();
        assert!(v.is_zero());
        assert_eq!(v.dim(), 3);
    }

    #[test]
    fn test_finite_value_beyond_dimension_does_not_count() {
        // Only the copied prefix is inspected
        assert!(sanitize_values(&[f64::NAN, 1.0], 1).is_err());
    }

    #[test]
    fn test_garbage_shapes_are_invalid() {
        assert!(sanitize(&json!(null), 3).is_err());
        assert!(sanitize(&json!(42), 3).is_err());
        assert!(sanitize(&json!({"a": 1}), 3).is_err());
        assert!(sanitize(&json!("not a vector"), 3).is_err());
    }

    #[test]
    fn test_mean_pool() {
        let pooled = mean_pool(&[vec![1.0, 2.0, 3.0], vec![], vec![3.0, f64::INFINITY]], 3).unwrap();
        assert_eq!(pooled.as_slice(), &[2.0, 1.0, 1.5]);
    }

    #[test]
    fn test_mean_pool_empty() {
        assert!(matches!(mean_pool(&[], 3), Err(Error::EmptyInputSet)));
        assert!(matches!(mean_pool(&[vec![]], 3), Err(Error::EmptyInputSet)));
    }
}
