use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Deref,
    str::FromStr,
};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};

/// The identifier of an entity within a workspace.
///
/// Names are case-sensitive and never empty. By convention they start with a
/// capital letter, but that is a style rule checked by the validator rather
/// than an invariant of this type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(NonEmptyString);

impl Name {
    /// Creates a new `Name`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidName`] if the string is empty.
    pub fn new(s: String) -> Result<Self, InvalidName> {
        NonEmptyString::new(s).map(Self).map_err(|_| InvalidName)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the first character is already in its upper-case form.
    ///
    /// Characters without case (digits, underscores, most scripts) count as
    /// capitalised.
    #[must_use]
    pub fn starts_with_capital(&self) -> bool {
        self.as_str()
            .chars()
            .next()
            .is_none_or(|first| first.to_uppercase().eq(std::iter::once(first)))
    }
}

impl TryFrom<String> for Name {
    type Error = InvalidName;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidName;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.as_str().to_owned()
    }
}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl FromStr for Name {
    type Err = InvalidName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for Name {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when constructing a [`Name`] from an empty string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("names must not be empty")]
pub struct InvalidName;

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{InvalidName, Name};

    #[test_case("Alpha", true; "capitalised")]
    #[test_case("alpha", false; "lower case")]
    #[test_case("ALPHA", true; "all caps")]
    #[test_case("Émile", true; "non-ascii capital")]
    #[test_case("élan", false; "non-ascii lower case")]
    #[test_case("1st", true; "leading digit")]
    #[test_case("_private", true; "leading underscore")]
    fn capital_detection(input: &str, expected: bool) {
        let name = Name::try_from(input).unwrap();
        assert_eq!(name.starts_with_capital(), expected);
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(Name::try_from(""), Err(InvalidName));
    }

    #[test]
    fn names_are_case_sensitive() {
        let upper = Name::try_from("Alpha").unwrap();
        let lower = Name::try_from("alpha").unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn deserialize_rejects_empty() {
        let result: Result<Name, _> = serde_yaml::from_str("''");
        assert!(result.is_err());
    }
}
