use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

/// Error returned when a value does not satisfy a field's format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{constraints}")]
pub struct ValidationError {
    field: &'static str,
    constraints: &'static str,
}

impl ValidationError {
    pub(crate) const fn new(field: &'static str, constraints: &'static str) -> Self {
        Self { field, constraints }
    }

    /// The label of the field that rejected the value (e.g. `"Phone"`).
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// A description of the values the field accepts.
    #[must_use]
    pub const fn constraints(&self) -> &'static str {
        self.constraints
    }
}

/// A validated scalar attribute of a [`Person`](crate::Person).
///
/// Implementors can only be constructed from values that pass their format
/// check, so holding one is proof of validity.
pub trait FieldValue: Sized + Clone + PartialEq + fmt::Display {
    /// Human-readable label, used in error messages and the private
    /// placeholder.
    const LABEL: &'static str;

    /// Validates `value` and wraps it.
    ///
    /// Leading and trailing whitespace is dropped first, so the stored value
    /// survives a round trip through the data file unchanged.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `value` does not satisfy the field's
    /// format.
    fn new(value: String) -> Result<Self, ValidationError>;

    /// Returns the underlying validated value.
    fn as_str(&self) -> &str;
}

/// Trims surrounding whitespace, reusing the allocation when there is none.
fn normalize(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

macro_rules! validated_field {
    (
        $(#[$meta:meta])*
        $ty:ident {
            label: $label:literal,
            pattern: $pattern:literal,
            constraints: $constraints:literal $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $ty(String);

        impl $ty {
            /// Describes the values this field accepts.
            pub const CONSTRAINTS: &'static str = $constraints;

            /// Returns `true` if `value` is acceptable for this field.
            #[must_use]
            pub fn is_valid(value: &str) -> bool {
                static PATTERN: LazyLock<Regex> =
                    LazyLock::new(|| Regex::new($pattern).expect("field pattern must compile"));
                PATTERN.is_match(value)
            }
        }

        impl FieldValue for $ty {
            const LABEL: &'static str = $label;

            fn new(value: String) -> Result<Self, ValidationError> {
                let value = normalize(value);
                if Self::is_valid(&value) {
                    Ok(Self(value))
                } else {
                    Err(ValidationError::new($label, $constraints))
                }
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as FieldValue>::new(s.to_string())
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

validated_field! {
    /// A person's name: alphanumeric words separated by spaces.
    Name {
        label: "Name",
        pattern: r"^[[:alnum:]][[:alnum:] ]*$",
        constraints: "Person names should only contain alphanumeric characters and spaces, and it should not be blank",
    }
}

validated_field! {
    /// A phone number of at least three digits.
    Phone {
        label: "Phone",
        pattern: r"^[0-9]{3,}$",
        constraints: "Phone numbers can only contain numbers, and should be at least 3 digits long",
    }
}

validated_field! {
    /// An email address of the form `local@domain`.
    Email {
        label: "Email",
        pattern: r"^[A-Za-z0-9_.]+@[A-Za-z0-9_.]+$",
        constraints: "Person emails should be 2 alphanumeric/period strings separated by '@'",
    }
}

validated_field! {
    /// A postal address. Anything goes, as long as it doesn't start blank.
    Address {
        label: "Address",
        pattern: r"^\S.*$",
        constraints: "Person addresses can take any values, and it should not be blank",
    }
}

validated_field! {
    /// A free-form note about a person. May be empty.
    Remark {
        label: "Remark",
        pattern: r"(?s)^.*$",
        constraints: "Person remarks can take any values, and it can be blank",
    }
}

impl Remark {
    /// The empty remark.
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Returns `true` if no remark has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A field value paired with a display-privacy flag.
///
/// Privacy is purely a presentation concern: a private field renders as a
/// fixed placeholder such as `<Private Phone>`, but its value, equality and
/// persistence are unaffected.
#[derive(Debug, Clone)]
pub struct Field<T> {
    value: T,
    private: bool,
}

impl<T: FieldValue> Field<T> {
    /// Wraps an already validated value.
    #[must_use]
    pub const fn new(value: T, private: bool) -> Self {
        Self { value, private }
    }

    /// Wraps an already validated value as a public field.
    #[must_use]
    pub const fn public(value: T) -> Self {
        Self::new(value, false)
    }

    /// Validates `value` and wraps it as a public field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `value` is not acceptable for `T`.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        T::new(value.into()).map(Self::public)
    }

    /// The underlying value, regardless of privacy.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// The underlying value as a string slice, regardless of privacy.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// Whether the field is hidden when displayed.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.private
    }

    /// Returns the same value with a different privacy flag.
    ///
    /// The value is not validated again.
    #[must_use]
    pub fn with_privacy(self, private: bool) -> Self {
        Self { private, ..self }
    }

    /// Returns a new value that keeps this field's privacy flag.
    #[must_use]
    pub fn with_value(self, value: T) -> Self {
        Self {
            value,
            private: self.private,
        }
    }
}

impl<T: FieldValue> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::public(value)
    }
}

impl<T: PartialEq> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Field<T> {}

impl<T: FieldValue> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.private {
            write!(f, "<Private {}>", T::LABEL)
        } else {
            fmt::Display::fmt(&self.value, f)
        }
    }
}
