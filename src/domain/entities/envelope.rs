//! Collection response envelope.

use serde_json::Value;

use super::Entity;

/// Collection response envelope: `{ success, <key>: [...], message? }`.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEnvelope {
    /// Backend `success` flag; missing counts as `false`.
    pub success: bool,
    /// Items under the collection key, in server order; `None` when the key
    /// is missing or not an array.
    pub items: Option<Vec<Entity>>,
    /// Optional backend message.
    pub message: Option<String>,
}

impl CollectionEnvelope {
    /// Reads the envelope out of a response body.
    #[must_use]
    pub fn parse(body: &Value, key: &str) -> Self {
        let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
        let items = body
            .get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().cloned().map(Entity::new).collect());
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Self {
            success,
            items,
            message,
        }
    }

    /// Returns the items when the backend reported success and sent the
    /// collection, otherwise the backend message of the rejected payload.
    ///
    /// # Errors
    /// Returns the optional backend message when the payload is rejected.
    #[must_use]
    pub fn into_accepted(self) -> Result<Vec<Entity>, Option<String>> {
        match (self.success, self.items) {
            (true, Some(items)) => Ok(items),
            _ => Err(self.message),
        }
    }
}
