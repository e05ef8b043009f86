// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Ordered user messages keyed by form property.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Property name for messages that do not belong to a single form field.
pub const GLOBAL_PROPERTY: &str = "_global";

/// A single message: a resource key plus its positional values.
///
/// Message lookup (i18n) happens outside the pipeline; only keys travel here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionMessage {
    /// Message resource key (e.g. `constraints.Required.message`).
    pub key: String,
    /// Positional values for the message.
    pub values: Vec<String>,
}

impl ActionMessage {
    /// Creates a message without values.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: Vec::new(),
        }
    }

    /// Creates a message with positional values.
    pub fn with_values<I, S>(key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key: key.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Messages grouped by property, in the order properties were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionMessages {
    properties: Vec<(String, Vec<ActionMessage>)>,
}

impl ActionMessages {
    /// Creates an empty message set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message to the given property.
    pub fn add(&mut self, property: &str, message: ActionMessage) {
        match self.properties.iter_mut().find(|(p, _)| p == property) {
            Some((_, messages)) => messages.push(message),
            None => self.properties.push((property.to_string(), vec![message])),
        }
    }

    /// Adds a message key without values to the given property.
    pub fn add_key(&mut self, property: &str, key: &str) {
        self.add(property, ActionMessage::new(key));
    }

    /// Adds a message to the global property.
    pub fn add_global(&mut self, message: ActionMessage) {
        self.add(GLOBAL_PROPERTY, message);
    }

    /// Appends every message of `other`, keeping property order.
    pub fn merge(&mut self, other: &ActionMessages) {
        for (property, messages) in &other.properties {
            for message in messages {
                self.add(property, message.clone());
            }
        }
    }

    /// Returns the messages for a property.
    pub fn get(&self, property: &str) -> &[ActionMessage] {
        self.properties
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, m)| m.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if the property has at least one message.
    pub fn has_property(&self, property: &str) -> bool {
        !self.get(property).is_empty()
    }

    /// Property names in insertion order.
    pub fn properties(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(p, _)| p.as_str())
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.properties.iter().map(|(_, m)| m.len()).sum()
    }

    /// Returns true if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts to a JSON object (`{ property: [{key, values}] }`) for display data.
    pub fn to_json(&self) -> JsonValue {
        let mut map = serde_json::Map::new();
        for (property, messages) in &self.properties {
            let list = messages
                .iter()
                .map(|m| serde_json::to_value(m).unwrap_or(JsonValue::Null))
                .collect();
            map.insert(property.clone(), JsonValue::Array(list));
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_order_is_insertion_order() {
        let mut messages = ActionMessages::new();
        messages.add_key("name", "constraints.Required.message");
        messages.add_key("age", "constraints.Min.message");
        messages.add_key("name", "constraints.Size.message");

        let properties: Vec<&str> = messages.properties().collect();
        assert_eq!(properties, vec!["name", "age"]);
        assert_eq!(messages.get("name").len(), 2);
        assert_eq!(messages.len(), 3);
    }

    #[test]
    fn test_merge() {
        let mut first = ActionMessages::new();
        first.add_global(ActionMessage::new("errors.a"));
        let mut second = ActionMessages::new();
        second.add_key("name", "errors.b");
        second.add_global(ActionMessage::new("errors.c"));

        first.merge(&second);
        assert_eq!(first.get(GLOBAL_PROPERTY).len(), 2);
        assert!(first.has_property("name"));
    }

    #[test]
    fn test_to_json() {
        let mut messages = ActionMessages::new();
        messages.add("age", ActionMessage::with_values("constraints.Min.message", ["18"]));
        let json = messages.to_json();
        assert_eq!(json["age"][0]["key"], "constraints.Min.message");
        assert_eq!(json["age"][0]["values"][0], "18");
    }

    #[test]
    fn test_missing_property_is_empty() {
        let messages = ActionMessages::new();
        assert!(messages.is_empty());
        assert!(messages.get("nothing").is_empty());
    }
}
