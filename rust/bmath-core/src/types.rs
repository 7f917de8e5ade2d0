//! Dynamic type descriptors.
//!
//! Types are first-class runtime values: calling one casts, and the `is`
//! operator tests membership. Two relations exist — [`Type::identical`]
//! is exact structural equality, while [`Type::accepts`] lets a value
//! lower in the numeric tower (`Integer <= Real <= Complex`) pass for a
//! target higher up.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SimpleType {
    Integer,
    Real,
    Complex,
    Boolean,
    Vector,
    Sequence,
    Function,
    Type,
    String,
    Error,
}

impl SimpleType {
    pub const ALL: [SimpleType; 10] = [
        SimpleType::Integer,
        SimpleType::Real,
        SimpleType::Complex,
        SimpleType::Boolean,
        SimpleType::Vector,
        SimpleType::Sequence,
        SimpleType::Function,
        SimpleType::Type,
        SimpleType::String,
        SimpleType::Error,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SimpleType::Integer => "Integer",
            SimpleType::Real => "Real",
            SimpleType::Complex => "Complex",
            SimpleType::Boolean => "Boolean",
            SimpleType::Vector => "Vector",
            SimpleType::Sequence => "Sequence",
            SimpleType::Function => "Function",
            SimpleType::Type => "Type",
            SimpleType::String => "String",
            SimpleType::Error => "Error",
        }
    }

    /// Position in the numeric tower; None for non-numeric types.
    fn numeric_rank(&self) -> Option<u8> {
        match self {
            SimpleType::Integer => Some(0),
            SimpleType::Real => Some(1),
            SimpleType::Complex => Some(2),
            _ => None,
        }
    }

    /// Whether a value of this type fits a target type slot, counting the
    /// numeric tower as compatible upward.
    pub fn fits(&self, target: SimpleType) -> bool {
        if *self == target {
            return true;
        }
        match (self.numeric_rank(), target.numeric_rank()) {
            (Some(v), Some(t)) => v <= t,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    Simple(SimpleType),
    Sum(BTreeSet<SimpleType>),
    Error(String),
}

impl Type {
    /// The sum of every simple type.
    pub fn any() -> Type {
        Type::Sum(SimpleType::ALL.into_iter().collect())
    }

    /// The numeric tower as a sum type.
    pub fn number() -> Type {
        Type::Sum(
            [SimpleType::Integer, SimpleType::Real, SimpleType::Complex]
                .into_iter()
                .collect(),
        )
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Sum(s) if s.len() == SimpleType::ALL.len())
    }

    /// Exact structural equality (the `===` relation).
    pub fn identical(&self, other: &Type) -> bool {
        self == other
    }

    /// Whether a value of the given simple type belongs to this type,
    /// counting the numeric tower as compatible upward.
    pub fn accepts(&self, value_type: SimpleType) -> bool {
        match self {
            Type::Simple(t) => value_type.fits(*t),
            Type::Sum(members) => members.iter().any(|t| value_type.fits(*t)),
            Type::Error(_) => value_type == SimpleType::Error,
        }
    }

    /// Resolve a builtin type name; used by the parser for type literals
    /// and annotations.
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "Any" => Some(Type::any()),
            "Number" => Some(Type::number()),
            "Integer" => Some(Type::Simple(SimpleType::Integer)),
            "Real" => Some(Type::Simple(SimpleType::Real)),
            "Complex" => Some(Type::Simple(SimpleType::Complex)),
            "Boolean" => Some(Type::Simple(SimpleType::Boolean)),
            "Vector" => Some(Type::Simple(SimpleType::Vector)),
            "Sequence" => Some(Type::Simple(SimpleType::Sequence)),
            "Function" => Some(Type::Simple(SimpleType::Function)),
            "Type" => Some(Type::Simple(SimpleType::Type)),
            "String" => Some(Type::Simple(SimpleType::String)),
            "Error" => Some(Type::Simple(SimpleType::Error)),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Simple(t) => write!(f, "{}", t.name()),
            Type::Sum(members) => {
                if self.is_any() {
                    return write!(f, "Any");
                }
                if *self == Type::number() {
                    return write!(f, "Number");
                }
                let names: Vec<_> = members.iter().map(|t| t.name()).collect();
                write!(f, "{}", names.join(" | "))
            }
            Type::Error(msg) => write!(f, "Error({})", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_tower_fits_upward() {
        assert!(SimpleType::Integer.fits(SimpleType::Real));
        assert!(SimpleType::Real.fits(SimpleType::Complex));
        assert!(!SimpleType::Complex.fits(SimpleType::Real));
        assert!(!SimpleType::Boolean.fits(SimpleType::Integer));
    }

    #[test]
    fn test_any_accepts_everything() {
        let any = Type::any();
        for t in SimpleType::ALL {
            assert!(any.accepts(t));
        }
    }

    #[test]
    fn test_number_accepts_numerics_only() {
        let number = Type::number();
        assert!(number.accepts(SimpleType::Integer));
        assert!(number.accepts(SimpleType::Complex));
        assert!(!number.accepts(SimpleType::Vector));
    }

    #[test]
    fn test_identity_is_exact() {
        assert!(!Type::Simple(SimpleType::Real).identical(&Type::Simple(SimpleType::Integer)));
        assert!(Type::any().identical(&Type::any()));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Type::any().to_string(), "Any");
        assert_eq!(Type::number().to_string(), "Number");
        assert_eq!(Type::Simple(SimpleType::Vector).to_string(), "Vector");
    }
}
