//! Compiled option descriptors.
//!
//! A [`Descriptor`] is what one declaration string compiles to. It carries no
//! behavior of its own: the registry stores it and the matcher reads it.

use serde::Serialize;
use std::cmp::Ordering;

/// Option modifier, written in brackets before the handle list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "arg")]
pub enum Modifier {
    #[default]
    None,
    /// `[<handle]`: must appear before `handle`. Reserved.
    Before(String),
    /// `[>handle]`: must appear after `handle`. Reserved.
    After(String),
    /// `[&]`: the option is a subcommand and must be the first token.
    Subcommand,
    /// `[!handle]`: may not appear together with `handle`. Reserved.
    NotWith(String),
}

/// How many times an option may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    /// `?` or nothing.
    #[default]
    AtMostOne,
    /// `*`
    AnyCount,
}

/// Whether and how a value is attached to the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Assignment {
    /// No value; the option is a presence flag.
    #[default]
    Forbidden,
    /// `=`: value must follow an inline `=`.
    RequiredInline,
    /// `=?`: inline `=` value, or else the next token.
    OptionalInline,
    /// `=!`: value is always the next token.
    ForbiddenInline,
}

impl Assignment {
    pub fn takes_value(self) -> bool {
        self != Self::Forbidden
    }
}

/// How a matched value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    #[default]
    Scalar,
    /// Value is split on `,` and each piece stored separately.
    List,
}

/// Validation applied to each stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    /// `s`
    #[default]
    String,
    /// `i`: decimal digits only.
    Integer,
    /// `f`: `digits` or `digits.digits`.
    Float,
}

impl ValueType {
    pub(crate) fn from_spec_char(ch: char) -> Option<Self> {
        match ch {
            's' => Some(Self::String),
            'i' => Some(Self::Integer),
            'f' => Some(Self::Float),
            _ => None,
        }
    }

    /// Check `value` against this type.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::String => true,
            Self::Integer => value.chars().all(|c| c.is_ascii_digit()),
            Self::Float => is_float(value),
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }
}

fn is_float(value: &str) -> bool {
    #[derive(PartialEq)]
    enum Scan {
        Start,
        Whole,
        Dot,
        Fraction,
    }

    let mut state = Scan::Start;
    for ch in value.chars() {
        state = match (state, ch) {
            (Scan::Start | Scan::Whole, c) if c.is_ascii_digit() => Scan::Whole,
            (Scan::Whole, '.') => Scan::Dot,
            (Scan::Dot | Scan::Fraction, c) if c.is_ascii_digit() => Scan::Fraction,
            _ => return false,
        };
    }
    matches!(state, Scan::Whole | Scan::Fraction)
}

/// The compiled form of one option declaration.
///
/// Equality and ordering only look at [`Descriptor::name`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Descriptor {
    pub(crate) name: String,
    pub(crate) handles: Vec<String>,
    pub(crate) modifier: Modifier,
    pub(crate) cardinality: Cardinality,
    pub(crate) assignment: Assignment,
    pub(crate) collection: Collection,
    pub(crate) value_type: ValueType,
}

impl Descriptor {
    /// Canonical name under which values are stored.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every handle that resolves to this option, in declaration order.
    pub fn handles(&self) -> &[String] {
        self.handles.as_slice()
    }

    pub fn modifier(&self) -> &Modifier {
        &self.modifier
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn assignment(&self) -> Assignment {
        self.assignment
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn is_subcommand(&self) -> bool {
        self.modifier == Modifier::Subcommand
    }

    /// Whether `other` may be used interchangeably with `self` under one name.
    pub fn compatible(&self, other: &Descriptor) -> bool {
        self.cardinality == other.cardinality
            && self.assignment == other.assignment
            && self.collection == other.collection
            && self.value_type == other.value_type
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Descriptor {}

impl PartialOrd for Descriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Descriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, value_type: ValueType) -> Descriptor {
        Descriptor {
            name: name.to_string(),
            handles: vec![format!("-{name}")],
            modifier: Modifier::None,
            cardinality: Cardinality::AtMostOne,
            assignment: Assignment::RequiredInline,
            collection: Collection::Scalar,
            value_type,
        }
    }

    #[test]
    fn float_scan_requires_digits_on_both_sides_of_dot() {
        for ok in ["0", "42", "3.14", "10.0"] {
            assert!(ValueType::Float.accepts(ok), "{ok} should be a float");
        }
        for bad in ["", ".", "1.", ".5", "1.2.3", "12abc", "-1", "1e5"] {
            assert!(!ValueType::Float.accepts(bad), "{bad} should not be a float");
        }
    }

    #[test]
    fn integer_accepts_only_digits() {
        assert!(ValueType::Integer.accepts("0042"));
        assert!(!ValueType::Integer.accepts("4.2"));
        assert!(!ValueType::Integer.accepts("-1"));
        assert!(ValueType::String.accepts("anything, really"));
    }

    #[test]
    fn identity_is_the_name() {
        let a = descriptor("age", ValueType::Integer);
        let mut b = descriptor("age", ValueType::Float);
        b.handles.push("--age".to_string());

        assert_eq!(a, b);
        assert!(!a.compatible(&b));
        assert!(descriptor("age", ValueType::String) < descriptor("wife", ValueType::String));
    }
}
