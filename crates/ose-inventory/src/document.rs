//! YAML document tree with scalars kept as written
//!
//! [serde_yaml::Value] resolves plain scalars while parsing: `3.10` turns into the float `3.1`,
//! `0x1F` into the integer `31`. Inventory values have to reach the inventory as written, so a
//! document is read twice:
//! - once into a [Value] to learn its shape
//! - once more, guided by that shape, taking the source text of every scalar
//!
//! The result only contains strings, nulls, sequences and mappings. Tags are dropped.
use serde::de::{
    DeserializeSeed, Deserializer, Error as _, IgnoredAny, MapAccess, SeqAccess, Visitor,
};
use serde_yaml::{Mapping, Value};
use std::fmt::Formatter;

/// Parses `text`, keeping scalar source text
pub fn parse(text: &str) -> Result<Value, serde_yaml::Error> {
    let shape: Value = serde_yaml::from_str(text)?;
    if shape.is_null() {
        return Ok(Value::Null);
    }

    SourceText(&shape).deserialize(serde_yaml::Deserializer::from_str(text))
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

/// Reads the node whose shape is `.0`
struct SourceText<'s>(&'s Value);

impl<'de, 's> DeserializeSeed<'de> for SourceText<'s> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        match untag(self.0) {
            Value::Null => {
                deserializer.deserialize_ignored_any(IgnoredAny)?;
                Ok(Value::Null)
            }
            Value::Sequence(items) => deserializer.deserialize_seq(SequenceVisitor(items)),
            Value::Mapping(mapping) => deserializer.deserialize_map(MappingVisitor(mapping)),
            _ => deserializer.deserialize_str(TextVisitor),
        }
    }
}

struct TextVisitor;

impl<'de> Visitor<'de> for TextVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str("a scalar")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Value::String(v))
    }
}

struct SequenceVisitor<'s>(&'s [Value]);

impl<'de, 's> Visitor<'de> for SequenceVisitor<'s> {
    type Value = Value;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "a sequence of {} elements", self.0.len())
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(self.0.len());
        for (index, shape) in self.0.iter().enumerate() {
            let item = seq
                .next_element_seed(SourceText(shape))?
                .ok_or_else(|| A::Error::invalid_length(index, &self))?;
            items.push(item);
        }

        Ok(Value::Sequence(items))
    }
}

struct MappingVisitor<'s>(&'s Mapping);

impl<'de, 's> Visitor<'de> for MappingVisitor<'s> {
    type Value = Value;

    fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "a mapping of {} entries", self.0.len())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::with_capacity(self.0.len());
        for (index, (key_shape, value_shape)) in self.0.iter().enumerate() {
            let key = map
                .next_key_seed(SourceText(key_shape))?
                .ok_or_else(|| A::Error::invalid_length(index, &self))?;
            let value = map.next_value_seed(SourceText(value_shape))?;
            mapping.insert(key, value);
        }

        Ok(Value::Mapping(mapping))
    }
}
