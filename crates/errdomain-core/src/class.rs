//! Error representation: classes and the error values built from them.
//!
//! An [`ErrorClass`] plays the part of an error constructor. It has a display
//! name and an identity; two classes created separately are distinct even if
//! their names match. A [`CodedError`] is the value a class constructs from a
//! message, with the code and extra properties attached afterwards.

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::ErrorCode;

/// Ordered bag of named diagnostic fields attached to an error value.
pub type ExtraProperties = Map<String, Value>;

/// Keys the serialized form writes from the value itself.
const RESERVED_KEYS: [&str; 3] = ["name", "message", "code"];

/// Identity of the process default class.
const DEFAULT_CLASS_ID: u64 = 0;

/// Source of identities for classes minted at runtime.
static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(DEFAULT_CLASS_ID + 1);

/// A constructible error representation.
///
/// Equality is identity: clones of one class compare equal, separately
/// created classes never do.
#[derive(Debug, Clone)]
pub struct ErrorClass {
    id: u64,
    name: Cow<'static, str>,
}

impl ErrorClass {
    /// Mints a new class with its own identity.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// The process default class, named `Error`.
    pub const fn error() -> Self {
        Self {
            id: DEFAULT_CLASS_ID,
            name: Cow::Borrowed("Error"),
        }
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this is the process default class.
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_CLASS_ID
    }

    /// Constructs a bare instance of this class carrying `message`.
    ///
    /// The instance has an empty code until a builder assigns one.
    pub fn construct(&self, message: impl Into<String>) -> CodedError {
        CodedError {
            class: self.clone(),
            message: message.into(),
            code: None,
            properties: ExtraProperties::new(),
        }
    }
}

impl Default for ErrorClass {
    fn default() -> Self {
        Self::error()
    }
}

impl PartialEq for ErrorClass {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ErrorClass {}

impl std::hash::Hash for ErrorClass {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

/// An error value produced by a descriptor or builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CodedError {
    class: ErrorClass,
    message: String,
    code: Option<ErrorCode>,
    properties: ExtraProperties,
}

impl CodedError {
    /// Returns the class this value was constructed from.
    pub fn class(&self) -> &ErrorClass {
        &self.class
    }

    /// Returns true if this value was constructed from `class`.
    pub fn instance_of(&self, class: &ErrorClass) -> bool {
        self.class == *class
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the code, if one has been assigned.
    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    /// Returns one extra property by name.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn properties(&self) -> &ExtraProperties {
        &self.properties
    }

    /// Writes `properties` onto this value, later keys winning.
    ///
    /// Mirrors assigning fields onto an error object: a `message` key replaces
    /// the message (non-string values in their JSON form) and a string or
    /// numeric `code` key sets the code; other `code` values are ignored.
    /// Every other key lands in the extra-property map. A `name` property is
    /// kept there but left out of the serialized form, where `name` is the
    /// class name.
    pub(crate) fn assign(&mut self, properties: &ExtraProperties) {
        for (key, value) in properties {
            match (key.as_str(), value) {
                ("message", Value::String(message)) => self.message = message.clone(),
                ("message", other) => self.message = other.to_string(),
                ("code", Value::String(code)) => self.code = Some(ErrorCode::new(code.clone())),
                ("code", Value::Number(n)) => self.code = Some(ErrorCode::new(n.to_string())),
                ("code", _) => {}
                _ => {
                    self.properties.insert(key.clone(), value.clone());
                }
            }
        }
    }

    pub(crate) fn set_code(&mut self, code: ErrorCode) {
        self.properties.remove("code");
        self.code = Some(code);
    }
}

impl fmt::Display for CodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.class)
        } else {
            write!(f, "{}: {}", self.class, self.message)
        }
    }
}

impl std::error::Error for CodedError {}

impl Serialize for CodedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = self
            .properties
            .keys()
            .filter(|key| !RESERVED_KEYS.contains(&key.as_str()))
            .count();
        let mut map = serializer.serialize_map(Some(extra + RESERVED_KEYS.len()))?;
        map.serialize_entry("name", self.class.name())?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("code", &self.code)?;
        for (key, value) in &self.properties {
            if RESERVED_KEYS.contains(&key.as_str()) {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
