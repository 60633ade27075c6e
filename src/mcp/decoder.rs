use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

use crate::error::{McpError, Result};

/// Turns a raw response into a checked, typed value.
pub trait Decoder: Send + Sync {
    type Output;

    fn decode(&self, raw: Value) -> Result<Self::Output>;
}

/// Deserializes straight into `T`.
pub struct JsonDecoder<T>(PhantomData<fn() -> T>);

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        JsonDecoder(PhantomData)
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Decoder for JsonDecoder<T> {
    type Output = T;

    fn decode(&self, raw: Value) -> Result<T> {
        serde_json::from_value(raw).map_err(|e| McpError::Decode(e.to_string()))
    }
}

/// Validates against a JSON Schema before deserializing into `T`.
pub struct SchemaDecoder<T> {
    schema: JSONSchema,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SchemaDecoder<T> {
    pub fn new(schema: &Value) -> Result<Self> {
        let schema = JSONSchema::compile(schema)
            .map_err(|e| McpError::Decode(format!("Invalid schema: {}", e)))?;
        Ok(Self {
            schema,
            _marker: PhantomData,
        })
    }
}

impl<T: DeserializeOwned> Decoder for SchemaDecoder<T> {
    type Output = T;

    fn decode(&self, raw: Value) -> Result<T> {
        if let Err(errors) = self.schema.validate(&raw) {
            let messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(McpError::Decode(messages.join("; ")));
        }
        serde_json::from_value(raw).map_err(|e| McpError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Weather {
        temperature: f64,
    }

    #[test]
    fn test_json_decoder_reports_shape_mismatch() {
        let decoder = JsonDecoder::<Weather>::new();
        let err = decoder.decode(json!({"temperature": "hot"})).unwrap_err();
        assert!(matches!(err, McpError::Decode(_)));
    }

    #[test]
    fn test_schema_decoder_lists_violations() {
        let decoder = SchemaDecoder::<Weather>::new(&json!({
            "type": "object",
            "properties": {"temperature": {"type": "number", "minimum": -100}},
            "required": ["temperature"]
        }))
        .unwrap();

        assert_eq!(
            decoder.decode(json!({"temperature": 21.5})).unwrap(),
            Weather { temperature: 21.5 }
        );

        let err = decoder.decode(json!({"temperature": -500})).unwrap_err();
        match err {
            McpError::Decode(msg) => assert!(msg.contains("/temperature")),
            other => panic!("unexpected error: {}", other),
        }
    }
}
