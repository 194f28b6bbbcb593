//! scalar coercion
//!
//! The inventory only knows strings. Any YAML scalar is accepted wherever a string is expected:
//! - string: as is
//! - number: its textual form (`22` becomes `"22"`)
//! - boolean: `"true"`/`"false"`
//! - null: `""`
//!
//! Sequences and mappings are never coerced. Where a known field expects a scalar they are a decode
//! error, in residual variable maps they are skipped. Tags are ignored.
//!
//! Documents read by [crate::document::parse] only hold string scalars, so numbers and booleans
//! keep their source text. The conversions below apply to trees built by other means.
use serde::de::{Deserialize, Deserializer, EnumAccess, IgnoredAny, VariantAccess, Visitor};
use serde_yaml::Value;
use std::fmt::Formatter;

/// Text of a scalar node, `None` for sequences and mappings
pub(crate) fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(_) | Value::Mapping(_) => None,
        Value::Tagged(tagged) => to_string(&tagged.value),
    }
}

/// A string decoded from any scalar
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Scalar(pub String);

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str("a scalar value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Scalar(v.to_string()))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Scalar(v.to_string()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Scalar(v.to_string()))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        // same formatting as `serde_yaml::Number`'s Display
        Ok(Scalar(serde_yaml::Number::from(v).to_string()))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Scalar(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Scalar(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Scalar::default())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Scalar::default())
    }

    // tagged value
    fn visit_enum<A>(self, data: A) -> Result<Self::Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (IgnoredAny, value) = data.variant::<IgnoredAny>()?;
        value.newtype_variant()
    }
}

/// `deserialize_with` helper for `String` fields that take any scalar
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Into::into)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scalar(yaml: &str) -> Scalar {
        serde_yaml::from_str(yaml).expect("must decode")
    }

    #[test]
    fn coerces_scalars() {
        assert_eq!(scalar("text").0, "text");
        assert_eq!(scalar("22").0, "22");
        assert_eq!(scalar("-3").0, "-3");
        assert_eq!(scalar("true").0, "true");
        assert_eq!(scalar("~").0, "");
        assert_eq!(scalar("'22'").0, "22");
    }

    #[test]
    fn rejects_collections() {
        assert!(serde_yaml::from_str::<Scalar>("[a, b]").is_err());
        assert!(serde_yaml::from_str::<Scalar>("{a: b}").is_err());
    }

    #[test]
    fn ignores_tags() {
        let value: Value = serde_yaml::from_str("!custom 1.50").expect("must parse");
        assert!(matches!(value, Value::Tagged(_)));

        let scalar = Scalar::deserialize(&value).expect("must decode");
        assert_eq!(scalar.0, "1.5");
    }

    #[test]
    fn value_text() {
        let value: Value = serde_yaml::from_str("{a: 1, b: false, c: ~, d: [1], e: !custom x}")
            .expect("must parse");
        let text = |key: &str| to_string(&value[key]);

        assert_eq!(text("a").as_deref(), Some("1"));
        assert_eq!(text("b").as_deref(), Some("false"));
        assert_eq!(text("c").as_deref(), Some(""));
        assert_eq!(text("d"), None);
        assert_eq!(text("e").as_deref(), Some("x"));
    }
}
