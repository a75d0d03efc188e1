use serde_json::{Map, Value};

use crate::location::Location;

/// Property tokens receive their location under unless told otherwise.
pub const DEFAULT_PROPERTY: &str = "loc";

/// A token that can carry a [`Location`] under a named property.
///
/// Usually derived with `#[derive(Locate)]`; see `lexloc_macros::Locate`.
pub trait Locate {
    /// Stores `location` under `property`, along with its range when the
    /// token has a place for one. Returns `false` if the token has no slot
    /// for `property`, in which case nothing is changed.
    fn attach_location(&mut self, property: &str, location: Location) -> bool;

    /// Whether `property` names something the token already owns, such as
    /// its kind or value. Locations are never attached under these.
    fn reserves_property(_property: &str) -> bool
    where
        Self: Sized,
    {
        false
    }
}

/// Key loose JSON tokens keep their range under.
const RANGE_KEY: &str = "range";

/// Tokens kept as loose JSON objects get the location serialized in place,
/// plus a `range` array. `range` itself is refused as a property.
impl Locate for Map<String, Value> {
    fn attach_location(&mut self, property: &str, location: Location) -> bool {
        if Self::reserves_property(property) {
            return false;
        }

        let range = location.range();
        let value = match serde_json::to_value(&location) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%err, property, "could not serialize location");
                return false;
            }
        };

        self.insert(property.to_string(), value);
        self.insert(RANGE_KEY.to_string(), Value::from(range.to_vec()));
        true
    }

    fn reserves_property(property: &str) -> bool {
        property == RANGE_KEY
    }
}

impl Locate for Value {
    fn attach_location(&mut self, property: &str, location: Location) -> bool {
        match self {
            Value::Object(map) => map.attach_location(property, location),
            _ => false,
        }
    }

    fn reserves_property(property: &str) -> bool {
        Map::<String, Value>::reserves_property(property)
    }
}
