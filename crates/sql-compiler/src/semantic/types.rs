//! The analyzer's type lattice: one `Type` per declared-type/literal kind,
//! plus `Unknown` for the "don't cascade" sentinel described in §7's
//! propagation policy.

use std::fmt;

/// An inferred or declared SQL type. `Unknown` is not a SQL type; it marks
/// an expression whose real type could not be determined (an unresolved
/// reference, a prior error) so downstream rules can skip it without
/// emitting a second diagnostic for the same root cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Type {
    Integer,
    Float,
    Text,
    Boolean,
    Date,
    /// The type of a `NULL` literal: compatible with any column type.
    Null,
    Unknown,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Type::Integer => "INTEGER",
            Type::Float => "FLOAT",
            Type::Text => "TEXT",
            Type::Boolean => "BOOLEAN",
            Type::Date => "DATE",
            Type::Null => "NULL",
            Type::Unknown => "UNKNOWN",
        })
    }
}

impl Type {
    /// Parses a data-type keyword from a `ColumnDef` (`INTEGER`, `INT`,
    /// `FLOAT`, `DOUBLE`, `REAL`, `TEXT`, `VARCHAR`, `CHAR`, `BOOLEAN`,
    /// `DATE`) into the declared column type.
    pub fn from_keyword(upper: &str) -> Option<Type> {
        match upper {
            "INTEGER" | "INT" => Some(Type::Integer),
            "FLOAT" | "DOUBLE" | "REAL" => Some(Type::Float),
            "TEXT" | "VARCHAR" | "CHAR" => Some(Type::Text),
            "BOOLEAN" => Some(Type::Boolean),
            "DATE" => Some(Type::Date),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Type::Integer | Type::Float)
    }

    /// Comparison operands are compatible per rule 3: numeric<->numeric,
    /// TEXT<->TEXT, BOOLEAN<->BOOLEAN, anything<->NULL. `Unknown` is
    /// compatible with everything so a prior error doesn't cascade.
    pub fn comparable_with(self, other: Type) -> bool {
        if self == Type::Unknown || other == Type::Unknown {
            return true;
        }
        if self == Type::Null || other == Type::Null {
            return true;
        }
        match (self, other) {
            (a, b) if a.is_numeric() && b.is_numeric() => true,
            (Type::Text, Type::Text) => true,
            (Type::Boolean, Type::Boolean) => true,
            _ => false,
        }
    }

    /// BOOLEAN-compatible per rule 3/5: BOOLEAN itself, or numeric
    /// (coerced 0≠nonzero), or a prior error.
    pub fn is_boolean_compatible(self) -> bool {
        matches!(self, Type::Boolean | Type::Unknown) || self.is_numeric()
    }

    /// Assignment compatibility for INSERT/UPDATE (rule 4): numeric
    /// widening is allowed (INTEGER into a FLOAT column, and vice versa
    /// for a literal that fits); TEXT only assigns to TEXT; NULL assigns
    /// to anything; `Unknown` never rejects (prior error already
    /// reported).
    pub fn assignable_to(self, target: Type) -> bool {
        if self == Type::Unknown || target == Type::Unknown {
            return true;
        }
        if self == Type::Null {
            return true;
        }
        match (self, target) {
            (a, b) if a.is_numeric() && b.is_numeric() => true,
            (Type::Text, Type::Text) => true,
            (Type::Boolean, Type::Boolean) => true,
            (Type::Date, Type::Date) => true,
            _ => false,
        }
    }

    /// Result type of `+ - * / %`: FLOAT if either operand is FLOAT, else
    /// INTEGER, per rule 3. Callers must have already checked both
    /// operands are numeric.
    pub fn arithmetic_result(self, other: Type) -> Type {
        if self == Type::Unknown || other == Type::Unknown {
            Type::Unknown
        } else if self == Type::Float || other == Type::Float {
            Type::Float
        } else {
            Type::Integer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_keywords_map_to_their_family() {
        assert_eq!(Type::from_keyword("INT"), Some(Type::Integer));
        assert_eq!(Type::from_keyword("VARCHAR"), Some(Type::Text));
        assert_eq!(Type::from_keyword("REAL"), Some(Type::Float));
        assert_eq!(Type::from_keyword("BOOLEAN"), Some(Type::Boolean));
        assert_eq!(Type::from_keyword("BLOB"), None);
    }

    #[test]
    fn arithmetic_widens_to_float() {
        assert_eq!(Type::Integer.arithmetic_result(Type::Integer), Type::Integer);
        assert_eq!(Type::Integer.arithmetic_result(Type::Float), Type::Float);
    }

    #[test]
    fn null_is_comparable_with_anything() {
        assert!(Type::Null.comparable_with(Type::Text));
        assert!(Type::Boolean.comparable_with(Type::Null));
    }

    #[test]
    fn text_is_not_assignable_to_numeric() {
        assert!(!Type::Text.assignable_to(Type::Integer));
        assert!(Type::Integer.assignable_to(Type::Float));
    }
}
