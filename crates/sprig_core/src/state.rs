//! State store primitives
//!
//! Component state is a flat mapping from string keys to dynamic values.
//! `set` never mutates the current map; it builds a new one by shallow
//! overwrite and swaps it in, so observers can hold a reference to the old
//! state without it changing underneath them during dispatch.

/// Dynamic state value
pub type Value = serde_json::Value;

/// Flat key/value state mapping
///
/// Built with `preserve_order`, so iteration follows insertion order the
/// way a JS object's keys do.
pub type StateMap = serde_json::Map<String, Value>;

/// Build a `StateMap` literal
///
/// ```
/// use sprig_core::state;
///
/// let partial = state! { "value": "a", "disabled": false };
/// assert_eq!(partial.len(), 2);
/// ```
#[macro_export]
macro_rules! state {
    ($($key:literal : $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut map = $crate::StateMap::new();
        $( map.insert(($key).to_string(), $crate::Value::from($value)); )*
        map
    }};
}

/// Shallow-overwrite merge: every key in `partial` overwrites the old
/// state; keys absent from `partial` carry over unchanged.
pub(crate) fn merge(old: &StateMap, partial: &StateMap) -> StateMap {
    let mut merged = old.clone();
    for (key, value) in partial {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Whether a value is composite (object or array)
///
/// Composite values are always treated as changed, even when structurally
/// identical; equality on composites is never consulted.
pub(crate) fn is_composite(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// The dispatch skip-condition: a key's update is a no-op only when the new
/// value equals the old one AND is not composite.
pub(crate) fn unchanged(new: &Value, old: Option<&Value>) -> bool {
    match old {
        Some(old) => new == old && !is_composite(new),
        None => false,
    }
}

/// JS-style truthiness, used by widgets for attribute fallbacks
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
