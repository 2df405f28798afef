//! Runtime value representation and best-effort typed coercion.
//!
//! Configuration rows are stored as strings; callers read them as typed
//! values. Coercion never fails outward: a raw value that does not parse as
//! the requested type degrades to the caller-supplied default, and the
//! outcome is reported through [`Coerced`] rather than an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The runtime representation a caller can request for a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    /// Raw string, as stored.
    Text,
    /// Signed 64-bit integer.
    Int,
    /// Boolean.
    Bool,
    /// Decimal number (f64).
    Decimal,
    /// Parsed JSON document.
    Json,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueKind::Text => "text",
            ValueKind::Int => "int",
            ValueKind::Bool => "bool",
            ValueKind::Decimal => "decimal",
            ValueKind::Json => "json",
        };
        write!(f, "{}", s)
    }
}

/// A configuration value as held by the cache.
///
/// An entry starts life as `Text` when seeded from the store, but the miss
/// path inserts the coerced representation, so any variant can appear in a
/// cache entry. The read path checks the variant against the requested type
/// and re-coerces from the raw form on mismatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Decimal(f64),
    Json(serde_json::Value),
}

impl ConfigValue {
    /// The kind of this value's current representation.
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Text(_) => ValueKind::Text,
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Decimal(_) => ValueKind::Decimal,
            ConfigValue::Json(_) => ValueKind::Json,
        }
    }

    /// Canonical string form, used as the source text for re-coercion.
    pub fn raw(&self) -> String {
        match self {
            ConfigValue::Text(s) => s.clone(),
            ConfigValue::Int(i) => i.to_string(),
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::Decimal(d) => d.to_string(),
            ConfigValue::Json(v) => v.to_string(),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<f64> for ConfigValue {
    fn from(d: f64) -> Self {
        ConfigValue::Decimal(d)
    }
}

/// A type a configuration value can be read as.
///
/// `from_exact` succeeds only when the cached representation already matches
/// the requested type; `parse_raw` is the permissive fallback used by
/// [`coerce`]. `into_value` is how a coerced result is written back into the
/// cache on the miss path.
pub trait ConfigPrimitive: Clone + Send + Sync + 'static {
    /// The kind this primitive corresponds to.
    fn kind() -> ValueKind;

    /// Extract the value if the cached representation already matches.
    fn from_exact(value: &ConfigValue) -> Option<Self>;

    /// Parse from the raw string form. `None` means "fall back to default".
    fn parse_raw(raw: &str) -> Option<Self>;

    /// Convert into a cacheable value.
    fn into_value(self) -> ConfigValue;
}

impl ConfigPrimitive for String {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn from_exact(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }

    fn into_value(self) -> ConfigValue {
        ConfigValue::Text(self)
    }
}

impl ConfigPrimitive for i64 {
    fn kind() -> ValueKind {
        ValueKind::Int
    }

    fn from_exact(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    fn into_value(self) -> ConfigValue {
        ConfigValue::Int(self)
    }
}

impl ConfigPrimitive for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn from_exact(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Accepts the permissive forms stored configuration commonly uses.
    fn parse_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        }
    }

    fn into_value(self) -> ConfigValue {
        ConfigValue::Bool(self)
    }
}

impl ConfigPrimitive for f64 {
    fn kind() -> ValueKind {
        ValueKind::Decimal
    }

    fn from_exact(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    fn into_value(self) -> ConfigValue {
        ConfigValue::Decimal(self)
    }
}

impl ConfigPrimitive for serde_json::Value {
    fn kind() -> ValueKind {
        ValueKind::Json
    }

    fn from_exact(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Json(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    fn into_value(self) -> ConfigValue {
        ConfigValue::Json(self)
    }
}

impl ConfigPrimitive for ConfigValue {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn from_exact(value: &ConfigValue) -> Option<Self> {
        Some(value.clone())
    }

    fn parse_raw(raw: &str) -> Option<Self> {
        Some(ConfigValue::Text(raw.to_string()))
    }

    fn into_value(self) -> ConfigValue {
        self
    }
}

/// Outcome of a coercion, carrying whether the caller's default was used.
///
/// This replaces exception-driven fallback with an explicit result consumed
/// locally: the read path calls [`Coerced::into_inner`] and never propagates
/// a parse failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
    /// The raw value parsed as the requested type.
    Parsed(T),
    /// The raw value did not parse; this is the caller's default.
    Defaulted(T),
}

impl<T> Coerced<T> {
    /// Consume the outcome and return the value.
    pub fn into_inner(self) -> T {
        match self {
            Coerced::Parsed(v) | Coerced::Defaulted(v) => v,
        }
    }

    /// Borrow the value regardless of outcome.
    pub fn value(&self) -> &T {
        match self {
            Coerced::Parsed(v) | Coerced::Defaulted(v) => v,
        }
    }

    /// True if the caller's default was used.
    pub fn was_defaulted(&self) -> bool {
        matches!(self, Coerced::Defaulted(_))
    }
}

/// Coerce a raw stored string into `T`, falling back to `default`.
pub fn coerce<T: ConfigPrimitive>(raw: &str, default: T) -> Coerced<T> {
    match T::parse_raw(raw) {
        Some(v) => Coerced::Parsed(v),
        None => Coerced::Defaulted(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_coerce_int_parses() {
        let out = coerce::<i64>("42", 0);
        assert!(!out.was_defaulted());
        assert_eq!(out.into_inner(), 42);
    }

    #[test]
    fn test_coerce_int_trims_whitespace() {
        assert_eq!(coerce::<i64>("  7 ", 0).into_inner(), 7);
    }

    #[test]
    fn test_coerce_int_defaults_on_garbage() {
        let out = coerce::<i64>("not-a-number", 13);
        assert!(out.was_defaulted());
        assert_eq!(out.into_inner(), 13);
    }

    #[test]
    fn test_coerce_bool_permissive_forms() {
        for raw in ["true", "TRUE", "1", "yes", "Yes"] {
            assert!(coerce::<bool>(raw, false).into_inner(), "raw={}", raw);
        }
        for raw in ["false", "0", "no", "NO"] {
            assert!(!coerce::<bool>(raw, true).into_inner(), "raw={}", raw);
        }
        assert!(coerce::<bool>("maybe", true).was_defaulted());
    }

    #[test]
    fn test_coerce_decimal() {
        let out = coerce::<f64>("3.25", 0.0);
        assert_eq!(out.into_inner(), 3.25);
        assert!(coerce::<f64>("x", 1.5).was_defaulted());
    }

    #[test]
    fn test_coerce_json() {
        let out = coerce::<serde_json::Value>(r#"{"a":1}"#, serde_json::Value::Null);
        assert_eq!(out.value()["a"], 1);
        assert!(coerce::<serde_json::Value>("{broken", serde_json::Value::Null).was_defaulted());
    }

    #[test]
    fn test_coerce_string_never_defaults() {
        let out = coerce::<String>("anything at all", String::new());
        assert!(!out.was_defaulted());
        assert_eq!(out.into_inner(), "anything at all");
    }

    #[test]
    fn test_from_exact_requires_matching_representation() {
        let v = ConfigValue::Text("7".to_string());
        assert_eq!(i64::from_exact(&v), None);
        assert_eq!(String::from_exact(&v), Some("7".to_string()));

        let v = ConfigValue::Int(7);
        assert_eq!(i64::from_exact(&v), Some(7));
        assert_eq!(String::from_exact(&v), None);
    }

    #[test]
    fn test_config_value_kind_and_raw() {
        assert_eq!(ConfigValue::Int(5).kind(), ValueKind::Int);
        assert_eq!(ConfigValue::Int(5).raw(), "5");
        assert_eq!(ConfigValue::Bool(true).raw(), "true");
        assert_eq!(ConfigValue::Text("x".into()).kind(), ValueKind::Text);
        assert_eq!(
            ConfigValue::Json(serde_json::json!({"k": "v"})).raw(),
            r#"{"k":"v"}"#
        );
    }

    #[test]
    fn test_primitive_kinds() {
        assert_eq!(<i64 as ConfigPrimitive>::kind(), ValueKind::Int);
        assert_eq!(<bool as ConfigPrimitive>::kind(), ValueKind::Bool);
        assert_eq!(<f64 as ConfigPrimitive>::kind(), ValueKind::Decimal);
        assert_eq!(<String as ConfigPrimitive>::kind(), ValueKind::Text);
        assert_eq!(<serde_json::Value as ConfigPrimitive>::kind(), ValueKind::Json);
    }

    #[test]
    fn test_value_kind_display() {
        assert_eq!(ValueKind::Decimal.to_string(), "decimal");
        assert_eq!(ValueKind::Json.to_string(), "json");
    }

    proptest! {
        #[test]
        fn prop_int_raw_roundtrip(n in any::<i64>()) {
            let raw = ConfigValue::Int(n).raw();
            let out = coerce::<i64>(&raw, 0);
            prop_assert!(!out.was_defaulted());
            prop_assert_eq!(out.into_inner(), n);
        }

        #[test]
        fn prop_non_numeric_defaults(s in "[a-zA-Z]{1,12}") {
            // Alphabetic strings never parse as i64.
            let out = coerce::<i64>(&s, -1);
            prop_assert!(out.was_defaulted());
            prop_assert_eq!(out.into_inner(), -1);
        }

        #[test]
        fn prop_coerced_value_matches_variant(n in any::<i64>()) {
            let v: ConfigValue = n.into();
            prop_assert_eq!(i64::from_exact(&v), Some(n));
            prop_assert_eq!(v.kind(), ValueKind::Int);
        }
    }
}
