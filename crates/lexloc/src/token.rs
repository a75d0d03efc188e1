use std::collections::BTreeMap;

use lexloc_macros::Locate;
use serde::{Deserialize, Serialize};

use crate::{locate::DEFAULT_PROPERTY, location::Location};

/// A token produced by [`crate::lexer::Lexer`].
///
/// The location lands in `loc` under the default property name. Any other
/// property name is kept in `extra` and serialized next to the token's own
/// fields, so `{"type": "text", "value": "foo", "whatever": {...}}` round-trips.
/// The token's own keys (`type`, `value`, `range`) are refused as properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Locate)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[location]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,
    #[range]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[usize; 2]>,
    #[location(extra)]
    #[serde(flatten)]
    pub extra: BTreeMap<String, Location>,
}

impl Token {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            loc: None,
            range: None,
            extra: BTreeMap::new(),
        }
    }

    /// The location stored under `property`, if any.
    pub fn location(&self, property: &str) -> Option<&Location> {
        if property == DEFAULT_PROPERTY {
            self.loc.as_ref()
        } else {
            self.extra.get(property)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{locate::Locate, location::Position};
    use color_eyre::Result;
    use serde_json::json;

    fn loc(start: usize, end: usize) -> Location {
        Location::with_source(
            Position::new(start, 1, start),
            Position::new(end, 1, end),
            "string",
        )
    }

    #[test]
    fn test_default_property_fills_loc() {
        let mut token = Token::new("text", "foo");

        assert!(token.attach_location("loc", loc(0, 3)));
        assert_eq!(token.loc, Some(loc(0, 3)));
        assert_eq!(token.range, Some([0, 3]));
        assert!(token.extra.is_empty());
    }

    #[test]
    fn test_other_properties_land_in_extra() {
        let mut token = Token::new("text", "foo");

        assert!(token.attach_location("whatever", loc(0, 3)));
        assert_eq!(token.loc, None);
        assert_eq!(token.location("whatever"), Some(&loc(0, 3)));
        assert_eq!(token.range, Some([0, 3]));
    }

    #[test]
    fn test_serializes_like_a_plain_object() -> Result<()> {
        let mut token = Token::new("text", "foo");
        token.attach_location("whatever", loc(0, 3));

        let value = serde_json::to_value(&token)?;
        assert_eq!(
            value,
            json!({
                "type": "text",
                "value": "foo",
                "range": [0, 3],
                "whatever": {
                    "source": "string",
                    "start": { "index": 0, "column": 0, "line": 1 },
                    "end": { "index": 3, "column": 3, "line": 1 }
                }
            })
        );

        let parsed: Token = serde_json::from_value(value)?;
        assert_eq!(parsed, token);

        Ok(())
    }

    #[test]
    fn test_own_keys_are_not_properties() -> Result<()> {
        for property in ["type", "value", "range"] {
            let mut token = Token::new("text", "foo");

            assert!(Token::reserves_property(property));
            assert!(!token.attach_location(property, loc(0, 3)));
            assert_eq!(token, Token::new("text", "foo"));

            let parsed: Token = serde_json::from_value(serde_json::to_value(&token)?)?;
            assert_eq!(parsed, token);
        }

        assert!(!Token::reserves_property("loc"));
        assert!(!Token::reserves_property("extra"));

        Ok(())
    }

    #[test]
    fn test_unlocated_token_serializes_bare() -> Result<()> {
        let token = Token::new("slash", "/");
        assert_eq!(
            serde_json::to_value(&token)?,
            json!({ "type": "slash", "value": "/" })
        );

        Ok(())
    }

    /// A token type without a catch-all only accepts the names it declares.
    #[derive(Debug, Default, Locate)]
    struct Strict {
        #[location(name = "span")]
        where_: Option<Location>,
    }

    #[derive(Debug, Default, Serialize, Locate)]
    struct Renamed {
        #[location]
        loc: Option<Location>,
        #[serde(rename = "kind")]
        ty: String,
        #[location(extra)]
        #[serde(flatten)]
        rest: BTreeMap<String, Location>,
    }

    #[test]
    fn test_derive_reserves_renamed_keys() {
        assert!(Renamed::reserves_property("kind"));
        assert!(!Renamed::reserves_property("ty"));
        assert!(!Renamed::reserves_property("rest"));

        let mut token = Renamed::default();
        assert!(!token.attach_location("kind", loc(0, 1)));
        assert!(token.attach_location("ty", loc(0, 1)));
        assert_eq!(token.rest.get("ty"), Some(&loc(0, 1)));
    }

    #[test]
    fn test_derive_refuses_unknown_property() {
        let mut token = Strict::default();

        assert!(!token.attach_location("loc", loc(0, 1)));
        assert!(token.where_.is_none());

        assert!(token.attach_location("span", loc(0, 1)));
        assert_eq!(token.where_, Some(loc(0, 1)));
    }
}
