//! Parsing of JVM field and method descriptors (JVMS §4.3).
//!
//! The table builder only needs to know whether a descriptor is well-formed, but the parsed
//! form is exposed so callers (e.g. a reflection layer) can inspect parameter types without
//! re-implementing the grammar.
//!
//! ```rust
//! use methodtable::metadata::descriptor::{BaseType, FieldType, MethodDescriptor};
//!
//! let desc = MethodDescriptor::parse("(I[Ljava/lang/String;)V").unwrap();
//! assert_eq!(desc.parameters.len(), 2);
//! assert_eq!(desc.parameters[0], FieldType::Base(BaseType::Int));
//! assert!(desc.return_type.is_none());
//! ```

use std::iter::Peekable;
use std::str::Chars;

/// Maximum number of array dimensions a descriptor may declare
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Outcome of a descriptor parse; the error is a human readable reason
pub type DescriptorResult<T> = std::result::Result<T, String>;

/// Primitive value types
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BaseType {
    /// `B`
    Byte,
    /// `C`
    Char,
    /// `D`
    Double,
    /// `F`
    Float,
    /// `I`
    Int,
    /// `J`
    Long,
    /// `S`
    Short,
    /// `Z`
    Boolean,
}

impl BaseType {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'B' => BaseType::Byte,
            'C' => BaseType::Char,
            'D' => BaseType::Double,
            'F' => BaseType::Float,
            'I' => BaseType::Int,
            'J' => BaseType::Long,
            'S' => BaseType::Short,
            'Z' => BaseType::Boolean,
            _ => return None,
        })
    }
}

/// Type of a field, parameter or return value
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum FieldType {
    /// Primitive type
    Base(BaseType),
    /// Class or interface, by binary name (`java/lang/String`)
    Object(String),
    /// Array with the given number of dimensions
    Array {
        /// Number of `[` prefixes
        dimensions: usize,
        /// Element type, never itself an array
        element: Box<FieldType>,
    },
}

impl FieldType {
    /// Parse a complete field descriptor
    ///
    /// # Errors
    /// Returns the reason if the input is not exactly one field type.
    pub fn parse(source: &str) -> DescriptorResult<Self> {
        let mut chars = source.chars().peekable();
        let ret = Self::parse_from(&mut chars)?;
        match chars.next() {
            None => Ok(ret),
            Some(c) => Err(format!("unexpected leftover input '{c}'")),
        }
    }

    fn parse_from(source: &mut Peekable<Chars>) -> DescriptorResult<Self> {
        let mut dimensions = 0;
        while source.peek() == Some(&'[') {
            source.next();
            dimensions += 1;
        }
        if dimensions > MAX_ARRAY_DIMENSIONS {
            return Err(format!(
                "array has {dimensions} dimensions, at most {MAX_ARRAY_DIMENSIONS} are allowed"
            ));
        }

        let element = match source.next() {
            Some('L') => {
                let mut name = String::new();
                loop {
                    match source.next() {
                        Some(';') => break,
                        Some('.' | '[') => {
                            return Err(format!("illegal character in class name '{name}'"))
                        }
                        Some(c) => name.push(c),
                        None => return Err("unterminated class name".to_string()),
                    }
                }
                if name.is_empty() || name.split('/').any(str::is_empty) {
                    return Err(format!("invalid class name '{name}'"));
                }
                FieldType::Object(name)
            }
            Some(c) => match BaseType::from_char(c) {
                Some(base) => FieldType::Base(base),
                None => return Err(format!("invalid type character '{c}'")),
            },
            None => return Err("unexpected end of descriptor".to_string()),
        };

        if dimensions == 0 {
            Ok(element)
        } else {
            Ok(FieldType::Array {
                dimensions,
                element: Box::new(element),
            })
        }
    }

    /// Number of local variable slots a value of this type occupies
    #[must_use]
    pub fn slots(&self) -> usize {
        match self {
            FieldType::Base(BaseType::Double | BaseType::Long) => 2,
            _ => 1,
        }
    }
}

/// Signature of a method
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MethodDescriptor {
    /// Parameter types in declaration order
    pub parameters: Vec<FieldType>,
    /// `None` is for `void`
    pub return_type: Option<FieldType>,
}

impl MethodDescriptor {
    /// Parse a complete method descriptor
    ///
    /// # Errors
    /// Returns the reason if the input is not a well-formed method descriptor, or if the
    /// parameters need more than 255 slots.
    pub fn parse(source: &str) -> DescriptorResult<Self> {
        let mut chars = source.chars().peekable();

        if chars.next() != Some('(') {
            return Err("expected '(' for method".to_string());
        }

        let mut parameters = vec![];
        loop {
            match chars.peek() {
                Some(')') => {
                    chars.next();
                    break;
                }
                Some(_) => parameters.push(FieldType::parse_from(&mut chars)?),
                None => return Err("expected ')' for method".to_string()),
            }
        }

        let return_type = if chars.peek() == Some(&'V') {
            chars.next();
            None
        } else {
            Some(FieldType::parse_from(&mut chars)?)
        };

        if let Some(c) = chars.next() {
            return Err(format!("unexpected leftover input '{c}'"));
        }

        let descriptor = MethodDescriptor {
            parameters,
            return_type,
        };
        // Receiver slot excluded, the descriptor alone cannot tell static from instance
        if descriptor.parameter_slots() > 255 {
            return Err("method parameters exceed 255 slots".to_string());
        }
        Ok(descriptor)
    }

    /// Total slots used by the parameters, excluding any receiver
    #[must_use]
    pub fn parameter_slots(&self) -> usize {
        self.parameters.iter().map(FieldType::slots).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_types() {
        assert_eq!(FieldType::parse("J"), Ok(FieldType::Base(BaseType::Long)));
        assert_eq!(
            FieldType::parse("Ljava/lang/Object;"),
            Ok(FieldType::Object("java/lang/Object".to_string()))
        );
        assert_eq!(
            FieldType::parse("[[Z"),
            Ok(FieldType::Array {
                dimensions: 2,
                element: Box::new(FieldType::Base(BaseType::Boolean)),
            })
        );
    }

    #[test]
    fn invalid_field_types() {
        assert!(FieldType::parse("").is_err());
        assert!(FieldType::parse("V").is_err());
        assert!(FieldType::parse("Ljava/lang/Object").is_err());
        assert!(FieldType::parse("Ljava.lang.Object;").is_err());
        assert!(FieldType::parse("L;").is_err());
        assert!(FieldType::parse("II").is_err());
        assert!(FieldType::parse(&format!("{}I", "[".repeat(256))).is_err());
        assert!(FieldType::parse(&format!("{}I", "[".repeat(255))).is_ok());
    }

    #[test]
    fn method_descriptors() {
        let desc = MethodDescriptor::parse("()V").unwrap();
        assert!(desc.parameters.is_empty());
        assert!(desc.return_type.is_none());

        let desc = MethodDescriptor::parse("(JD[I)Ljava/lang/String;").unwrap();
        assert_eq!(desc.parameters.len(), 3);
        assert_eq!(desc.parameter_slots(), 5);
        assert_eq!(
            desc.return_type,
            Some(FieldType::Object("java/lang/String".to_string()))
        );
    }

    #[test]
    fn invalid_method_descriptors() {
        assert!(MethodDescriptor::parse("V").is_err());
        assert!(MethodDescriptor::parse("(I").is_err());
        assert!(MethodDescriptor::parse("(I)").is_err());
        assert!(MethodDescriptor::parse("(V)V").is_err());
        assert!(MethodDescriptor::parse("()VV").is_err());
        assert!(MethodDescriptor::parse(&format!("({})V", "J".repeat(128))).is_err());
        assert!(MethodDescriptor::parse(&format!("({})V", "I".repeat(255))).is_ok());
    }
}
