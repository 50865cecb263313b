//! Partial element updates.
//!
//! A patch is a flat map of camelCase keys. Every key belongs to exactly one
//! class in a fixed table: geometry keys write the element transform, `content`
//! and `groupId` write top-level fields, everything else writes the style
//! record. Unknown keys reject the whole patch.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::{CoreError, CoreResult, Element};

/// Where a patch key is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    /// A field of [`crate::Transform`].
    Geometry,
    /// The kind-dependent payload.
    Content,
    /// The grouping tag.
    Group,
    /// A field of [`crate::Style`].
    Style,
}

const GEOMETRY_KEYS: &[&str] = &["x", "y", "width", "height", "rotation", "scaleX", "scaleY"];

const STYLE_KEYS: &[&str] = &[
    "fontFamily",
    "fontSize",
    "fontWeight",
    "fontStyle",
    "textDecoration",
    "lineHeight",
    "letterSpacing",
    "color",
    "gradient",
    "backgroundColor",
    "textAlign",
    "borderRadius",
    "padding",
    "opacity",
    "borderWidth",
    "borderColor",
    "zIndex",
];

/// Classify a patch key, or `None` if it is not patchable.
#[must_use]
pub fn classify(key: &str) -> Option<KeyClass> {
    if GEOMETRY_KEYS.contains(&key) {
        Some(KeyClass::Geometry)
    } else if STYLE_KEYS.contains(&key) {
        Some(KeyClass::Style)
    } else {
        match key {
            "content" => Some(KeyClass::Content),
            "groupId" => Some(KeyClass::Group),
            _ => None,
        }
    }
}

/// A set of key/value changes applied to one or more elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementPatch {
    fields: Map<String, Value>,
}

impl ElementPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one key. A `null` value clears optional style fields.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Build a patch from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object or names an unknown key.
    pub fn from_json(value: Value) -> CoreResult<Self> {
        let Value::Object(fields) = value else {
            return Err(CoreError::InvalidOperation(
                "patch must be a JSON object".to_string(),
            ));
        };
        let patch = Self { fields };
        patch.validate()?;
        Ok(patch)
    }

    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Keys in the patch.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Check that every key is routable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownPatchKey`] for the first unknown key.
    pub fn validate(&self) -> CoreResult<()> {
        match self.fields.keys().find(|k| classify(k).is_none()) {
            Some(key) => Err(CoreError::UnknownPatchKey(key.clone())),
            None => Ok(()),
        }
    }

    /// Apply the patch to an element. Either every key applies or none does.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is unknown or a value has the wrong shape.
    pub fn apply(&self, element: &mut Element) -> CoreResult<()> {
        self.validate()?;

        let mut transform = to_object(&element.transform)?;
        let mut style = to_object(&element.style)?;
        let mut content = None;
        let mut group_id = element.group_id.clone();

        for (key, value) in &self.fields {
            match classify(key) {
                Some(KeyClass::Geometry) => {
                    transform.insert(key.clone(), value.clone());
                }
                Some(KeyClass::Style) => {
                    if value.is_null() {
                        style.remove(key);
                    } else {
                        match key.as_str() {
                            "color" => {
                                style.remove("gradient");
                            }
                            "gradient" => {
                                style.remove("color");
                            }
                            "opacity" => {
                                if !value.as_f64().is_some_and(|o| (0.0..=1.0).contains(&o)) {
                                    return Err(invalid(key, "expected a number in 0..=1"));
                                }
                            }
                            _ => {}
                        }
                        style.insert(key.clone(), value.clone());
                    }
                }
                Some(KeyClass::Content) => {
                    let text = value.as_str().ok_or_else(|| invalid(key, "expected a string"))?;
                    content = Some(text.to_string());
                }
                Some(KeyClass::Group) => {
                    group_id = match value {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        _ => return Err(invalid(key, "expected a string or null")),
                    };
                }
                None => return Err(CoreError::UnknownPatchKey(key.clone())),
            }
        }

        let transform = from_object(transform, &self.fields, KeyClass::Geometry)?;
        let style = from_object(style, &self.fields, KeyClass::Style)?;

        element.transform = transform;
        element.style = style;
        element.group_id = group_id;
        if let Some(content) = content {
            element.kind.set_content(content);
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> CoreError {
    CoreError::InvalidPatchValue {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn to_object<T: Serialize>(value: &T) -> CoreResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::InvalidOperation(
            "record did not serialize to an object".to_string(),
        )),
    }
}

fn from_object<T: DeserializeOwned>(
    map: Map<String, Value>,
    fields: &Map<String, Value>,
    class: KeyClass,
) -> CoreResult<T> {
    serde_json::from_value(Value::Object(map)).map_err(|e| {
        let keys: Vec<&str> = fields
            .keys()
            .filter(|k| classify(k) == Some(class))
            .map(String::as_str)
            .collect();
        CoreError::InvalidPatchValue {
            key: keys.join(","),
            reason: e.to_string(),
        }
    })
}
