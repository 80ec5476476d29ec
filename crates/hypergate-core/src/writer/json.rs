// crates/hypergate-core/src/writer/json.rs
// ============================================================================
// Module: JSON Object Builder
// Description: Nested JSON object builder addressed by key locations.
// Purpose: Give message mappers one mutable document to write into.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Mappers translate a [`crate::writer::FieldPath`] into a list of JSON keys
//! (a *location*) and write values there. Intermediate objects are created
//! on demand. A write blocked by a non-object value is refused, the value
//! stays, and the blocked location is recorded in
//! [`JsonObjectBuilder::collisions`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Builder
// ============================================================================

/// Mutable JSON document under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObjectBuilder {
    /// Root object.
    root: Map<String, Value>,
    /// Dotted locations of refused writes.
    collisions: Vec<String>,
}

impl JsonObjectBuilder {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value` inside the object at `location`.
    pub fn set(&mut self, location: &[String], name: &str, value: Value) {
        self.write(location, &mut |target| {
            target.insert(name.to_string(), value.clone());
        });
    }

    /// Sets `name` only when it is not already present.
    pub fn set_default(&mut self, location: &[String], name: &str, value: Value) {
        self.write(location, &mut |target| {
            target.entry(name.to_string()).or_insert_with(|| value.clone());
        });
    }

    /// Appends `value` to the array `name` inside the object at `location`.
    ///
    /// A non-array value already stored under `name` is kept and the push
    /// is recorded as a collision.
    pub fn push(&mut self, location: &[String], name: &str, value: Value) {
        if self.get(location, name).is_some_and(|existing| !existing.is_array()) {
            self.collisions.push(dotted(location.iter().map(String::as_str).chain([name])));
            return;
        }
        self.write(location, &mut |target| {
            if let Value::Array(items) =
                target.entry(name.to_string()).or_insert_with(|| Value::Array(Vec::new()))
            {
                items.push(value.clone());
            }
        });
    }

    /// Ensures an (possibly empty) object exists at `location`.
    pub fn touch(&mut self, location: &[String]) {
        self.write(location, &mut |_| {});
    }

    /// Returns the dotted locations of writes refused because a non-object
    /// (or, for [`Self::push`], non-array) value occupied them.
    #[must_use]
    pub fn collisions(&self) -> &[String] {
        &self.collisions
    }

    /// Returns the value at `location`/`name`, if present.
    #[must_use]
    pub fn get(&self, location: &[String], name: &str) -> Option<&Value> {
        let mut current = &self.root;
        for key in location {
            current = current.get(key)?.as_object()?;
        }
        current.get(name)
    }

    /// Removes and returns the value at `location`/`name`, if present.
    pub fn take(&mut self, location: &[String], name: &str) -> Option<Value> {
        let mut current = &mut self.root;
        for key in location {
            current = current.get_mut(key)?.as_object_mut()?;
        }
        current.remove(name)
    }

    /// Runs `write` at `location` unless a non-object value blocks the way.
    fn write(&mut self, location: &[String], write: &mut dyn FnMut(&mut Map<String, Value>)) {
        if let Some(depth) = blocked_at(&self.root, location) {
            self.collisions.push(dotted(location.iter().take(depth + 1).map(String::as_str)));
            return;
        }
        write_at(&mut self.root, location, write);
    }

    /// Returns true when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Consumes the builder into a JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    /// Serializes the document.
    ///
    /// # Errors
    ///
    /// Returns the serializer error.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.root)
    }
}

/// Returns the depth of the first non-object value along `location`.
fn blocked_at(object: &Map<String, Value>, location: &[String]) -> Option<usize> {
    let mut current = object;
    for (depth, key) in location.iter().enumerate() {
        match current.get(key) {
            Some(Value::Object(child)) => current = child,
            Some(_) => return Some(depth),
            None => return None,
        }
    }
    None
}

/// Joins keys into a dotted location.
fn dotted<'a>(keys: impl Iterator<Item = &'a str>) -> String {
    keys.collect::<Vec<_>>().join(".")
}

/// Runs `write` against the object at `location`, creating intermediate
/// objects as needed.
fn write_at(
    object: &mut Map<String, Value>,
    location: &[String],
    write: &mut dyn FnMut(&mut Map<String, Value>),
) {
    match location.split_first() {
        None => write(object),
        Some((head, rest)) => {
            let mut child = match object.remove(head) {
                Some(Value::Object(child)) => child,
                _ => Map::new(),
            };
            write_at(&mut child, rest, write);
            object.insert(head.clone(), Value::Object(child));
        }
    }
}
