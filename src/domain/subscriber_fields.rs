use actix_web::error::QueryPayloadError;
use actix_web::web;
use serde::{Deserialize, Deserializer};
use serde_aux::field_attributes::deserialize_bool_from_anything;
use serde_json::{Map, Value};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Business fields supplied by a create or update request.
///
/// Every field is optional: updates only touch what is present and
/// creation falls back to empty values.
#[derive(Deserialize, Debug, Default, PartialEq)]
pub struct SubscriberFields {
    pub email_address: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_activation_flag")]
    pub activation_flag: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum FieldsError {
    #[error("Failed to decode url-encoded subscriber fields.")]
    Encoding(#[source] QueryPayloadError),
    #[error("Subscriber fields hold values of an unexpected type.")]
    Value(#[source] serde_json::Error),
}

impl SubscriberFields {
    /// Collect fields from the query string and the body. A key present in
    /// both takes the body's value.
    ///
    /// Form bodies are decoded like the query string, anything else is read
    /// as JSON.
    pub fn from_request(
        query_string: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<Self, FieldsError> {
        let from_query = Self::from_urlencoded(query_string)?;
        let from_body = if content_type.starts_with(FORM_CONTENT_TYPE) {
            Self::from_urlencoded(&String::from_utf8_lossy(body))?
        } else {
            Self::from_json(body)?
        };

        Ok(from_body.or(from_query))
    }

    /// Repeated keys keep their last value.
    fn from_urlencoded(raw: &str) -> Result<Self, FieldsError> {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(raw)
            .map_err(FieldsError::Encoding)?
            .into_inner();
        let fields: Map<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();

        Self::from_object(fields)
    }

    fn from_json(body: &[u8]) -> Result<Self, FieldsError> {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Self::from_object(fields),
            // Empty, malformed or non-object bodies carry no fields.
            _ => Ok(Self::default()),
        }
    }

    /// `null` means "not supplied", for every field.
    fn from_object(mut fields: Map<String, Value>) -> Result<Self, FieldsError> {
        fields.retain(|_, value| !value.is_null());
        SubscriberFields::deserialize(Value::Object(fields)).map_err(FieldsError::Value)
    }

    fn or(self, fallback: Self) -> Self {
        Self {
            email_address: self.email_address.or(fallback.email_address),
            first_name: self.first_name.or(fallback.first_name),
            last_name: self.last_name.or(fallback.last_name),
            activation_flag: self.activation_flag.or(fallback.activation_flag),
        }
    }
}

fn deserialize_activation_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_bool_from_anything(deserializer).map(Some)
}
