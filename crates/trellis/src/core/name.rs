//! Widget names.
//!
//! Relative positions and expand-to-target dimensions refer to other widgets
//! by name rather than by handle, so a declaration can be written before its
//! target exists and keeps working when the target is replaced. Names are
//! resolved through the core's [`Lookup`](crate::backend::Lookup) each time a
//! declaration is evaluated. They are not unique; the lookup decides which of
//! several widgets with the same name a declaration sees.

use std::{fmt, str::FromStr};

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Characters allowed in a name: lowercase ASCII letters, digits and `_`.
pub fn valid_name_char(c: char) -> bool {
    (c.is_ascii_lowercase() || c.is_ascii_digit()) || c == '_'
}

/// True if `name` is non-empty and made only of allowed characters.
pub fn valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(valid_name_char)
}

/// The name a widget is known by to the declarations of other widgets.
///
/// Strict constructors ([`TryFrom`], [`FromStr`] and deserialization) reject
/// anything outside the allowed character set, which catches typos in
/// serialized layouts. [`NodeName::convert`] is the lenient path used by
/// [`Core::set_name`](crate::Core::set_name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeName {
    name: String,
}

impl FromStr for NodeName {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl NodeName {
    fn new(name: &str) -> Result<Self> {
        if !valid_name(name) {
            return Err(Error::InvalidName(name.into()));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    /// Normalize any string into a name. `"HealthBar"` and `"health bar"`
    /// both become `health_bar`, so a declaration and its target agree on
    /// spelling. Strings with nothing usable left become `node`.
    pub fn convert(name: &str) -> Self {
        let raw = name.to_case(Case::Snake);
        let filtered: String = raw.chars().filter(|x| valid_name_char(*x)).collect();
        let name = if filtered.is_empty() {
            "node".to_string()
        } else {
            filtered
        };
        Self { name }
    }

    /// The name as passed to [`Lookup::find`](crate::backend::Lookup::find).
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl PartialEq<&str> for NodeName {
    fn eq(&self, other: &&str) -> bool {
        self.name == *other
    }
}

impl PartialEq<str> for NodeName {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

impl TryFrom<&str> for NodeName {
    type Error = Error;
    fn try_from(name: &str) -> Result<Self> {
        Self::new(name)
    }
}

impl TryFrom<String> for NodeName {
    type Error = Error;
    fn try_from(name: String) -> Result<Self> {
        Self::new(&name)
    }
}

impl From<NodeName> for String {
    fn from(n: NodeName) -> Self {
        n.name
    }
}
