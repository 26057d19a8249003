//! Field and method descriptors.
//!
//! Descriptors are the textual type signatures the class file uses for fields and methods,
//! e.g. `I`, `[Ljava/lang/String;` or `(IJ)Ljava/lang/Object;`. They are parsed once when an
//! instruction or method header enters the model, so every transformation on them (changing
//! the return type, prepending a receiver parameter) is infallible afterwards.
//!
//! # Examples
//!
//! ```rust
//! use lambdascope::model::{FieldType, MethodDescriptor};
//!
//! let desc: MethodDescriptor = "(I[J)V".parse()?;
//! assert_eq!(desc.params().len(), 2);
//! assert_eq!(desc.parameter_slots(), 2);
//!
//! let forwarder = desc.with_leading_parameter(FieldType::object("com/example/Foo"));
//! assert_eq!(forwarder.to_string(), "(Lcom/example/Foo;I[J)V");
//! # Ok::<(), lambdascope::Error>(())
//! ```

use std::{fmt, str::FromStr};

use crate::{model::Opcode, Error, Result};

/// Maximum number of array dimensions a type may declare
const MAX_ARRAY_DIMENSIONS: usize = 255;

/// The type of a field, parameter or non-void return value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
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
    /// `L<internal name>;`
    Object(String),
    /// `[<component>`
    Array(Box<FieldType>),
}

impl FieldType {
    /// Create an object type from an internal class name such as `java/lang/String`
    pub fn object(internal_name: impl Into<String>) -> Self {
        FieldType::Object(internal_name.into())
    }

    /// Parse a complete field descriptor
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if `descriptor` is not exactly one field type.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let mut parser = DescriptorParser::new(descriptor);
        let field = parser.parse_field_type()?;
        parser.expect_end()?;
        Ok(field)
    }

    /// Number of local variable slots a value of this type occupies
    #[must_use]
    pub fn slots(&self) -> u16 {
        match self {
            FieldType::Long | FieldType::Double => 2,
            _ => 1,
        }
    }

    /// Opcode that loads a local variable of this type
    #[must_use]
    pub fn load_opcode(&self) -> Opcode {
        match self {
            FieldType::Long => Opcode::Lload,
            FieldType::Float => Opcode::Fload,
            FieldType::Double => Opcode::Dload,
            FieldType::Object(_) | FieldType::Array(_) => Opcode::Aload,
            FieldType::Byte
            | FieldType::Char
            | FieldType::Int
            | FieldType::Short
            | FieldType::Boolean => Opcode::Iload,
        }
    }

    /// Opcode that returns a value of this type
    #[must_use]
    pub fn return_opcode(&self) -> Opcode {
        match self {
            FieldType::Long => Opcode::Lreturn,
            FieldType::Float => Opcode::Freturn,
            FieldType::Double => Opcode::Dreturn,
            FieldType::Object(_) | FieldType::Array(_) => Opcode::Areturn,
            FieldType::Byte
            | FieldType::Char
            | FieldType::Int
            | FieldType::Short
            | FieldType::Boolean => Opcode::Ireturn,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Byte => f.write_str("B"),
            FieldType::Char => f.write_str("C"),
            FieldType::Double => f.write_str("D"),
            FieldType::Float => f.write_str("F"),
            FieldType::Int => f.write_str("I"),
            FieldType::Long => f.write_str("J"),
            FieldType::Short => f.write_str("S"),
            FieldType::Boolean => f.write_str("Z"),
            FieldType::Object(name) => write!(f, "L{name};"),
            FieldType::Array(component) => write!(f, "[{component}"),
        }
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldType::parse(s)
    }
}

/// The return type of a method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    /// `V`
    Void,
    /// Any field type
    Value(FieldType),
}

impl ReturnType {
    /// Opcode that returns from a method with this return type
    #[must_use]
    pub fn return_opcode(&self) -> Opcode {
        match self {
            ReturnType::Void => Opcode::Return,
            ReturnType::Value(field) => field.return_opcode(),
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => f.write_str("V"),
            ReturnType::Value(field) => field.fmt(f),
        }
    }
}

/// A parsed method descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDescriptor {
    params: Vec<FieldType>,
    return_type: ReturnType,
}

impl MethodDescriptor {
    /// Create a descriptor from its parameter list and return type
    #[must_use]
    pub fn new(params: Vec<FieldType>, return_type: ReturnType) -> Self {
        MethodDescriptor {
            params,
            return_type,
        }
    }

    /// Parse a method descriptor such as `(Ljava/lang/String;I)V`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if the text is not a well-formed method descriptor.
    pub fn parse(descriptor: &str) -> Result<Self> {
        let mut parser = DescriptorParser::new(descriptor);
        let parsed = parser.parse_method()?;
        parser.expect_end()?;
        Ok(parsed)
    }

    /// Parameter types in declaration order
    #[must_use]
    pub fn params(&self) -> &[FieldType] {
        &self.params
    }

    /// The return type
    #[must_use]
    pub fn return_type(&self) -> &ReturnType {
        &self.return_type
    }

    /// Total local variable slots taken by the parameters, excluding any receiver
    #[must_use]
    pub fn parameter_slots(&self) -> u16 {
        self.params.iter().map(FieldType::slots).sum()
    }

    /// The same parameters with a different return type
    #[must_use]
    pub fn with_return_type(&self, return_type: FieldType) -> Self {
        MethodDescriptor {
            params: self.params.clone(),
            return_type: ReturnType::Value(return_type),
        }
    }

    /// The same descriptor with `param` inserted as the first parameter
    #[must_use]
    pub fn with_leading_parameter(&self, param: FieldType) -> Self {
        let mut params = Vec::with_capacity(self.params.len() + 1);
        params.push(param);
        params.extend(self.params.iter().cloned());
        MethodDescriptor {
            params,
            return_type: self.return_type.clone(),
        }
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.params {
            param.fmt(f)?;
        }
        f.write_str(")")?;
        self.return_type.fmt(f)
    }
}

impl FromStr for MethodDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        MethodDescriptor::parse(s)
    }
}

/// Cursor over descriptor text
struct DescriptorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> DescriptorParser<'a> {
    fn new(input: &'a str) -> Self {
        DescriptorParser { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn next(&mut self) -> Result<u8> {
        let byte = self.peek().ok_or_else(|| {
            malformed_error!("Descriptor '{}' ends unexpectedly", self.input)
        })?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect_end(&self) -> Result<()> {
        if self.pos != self.input.len() {
            return Err(malformed_error!(
                "Trailing characters in descriptor '{}' at offset {}",
                self.input,
                self.pos
            ));
        }
        Ok(())
    }

    fn parse_method(&mut self) -> Result<MethodDescriptor> {
        if self.next()? != b'(' {
            return Err(malformed_error!(
                "Method descriptor '{}' does not start with '('",
                self.input
            ));
        }

        let mut params = Vec::new();
        while self.peek() != Some(b')') {
            params.push(self.parse_field_type()?);
        }
        self.pos += 1;

        let return_type = if self.peek() == Some(b'V') {
            self.pos += 1;
            ReturnType::Void
        } else {
            ReturnType::Value(self.parse_field_type()?)
        };

        Ok(MethodDescriptor {
            params,
            return_type,
        })
    }

    fn parse_field_type(&mut self) -> Result<FieldType> {
        let mut dimensions = 0;
        while self.peek() == Some(b'[') {
            self.pos += 1;
            dimensions += 1;
        }
        if dimensions > MAX_ARRAY_DIMENSIONS {
            return Err(malformed_error!(
                "Descriptor '{}' declares {} array dimensions",
                self.input,
                dimensions
            ));
        }

        let start = self.pos;
        let mut field = match self.next()? {
            b'B' => FieldType::Byte,
            b'C' => FieldType::Char,
            b'D' => FieldType::Double,
            b'F' => FieldType::Float,
            b'I' => FieldType::Int,
            b'J' => FieldType::Long,
            b'S' => FieldType::Short,
            b'Z' => FieldType::Boolean,
            b'L' => {
                let rest = &self.input[self.pos..];
                let end = rest.find(';').ok_or_else(|| {
                    malformed_error!("Unterminated class name in descriptor '{}'", self.input)
                })?;
                let name = &rest[..end];
                if name.is_empty() || name.contains(['.', '[', '(', ')']) {
                    return Err(malformed_error!(
                        "Invalid class name '{}' in descriptor '{}'",
                        name,
                        self.input
                    ));
                }
                self.pos += end + 1;
                FieldType::Object(name.to_string())
            }
            other => {
                return Err(malformed_error!(
                    "Unexpected '{}' at offset {} of descriptor '{}'",
                    char::from(other),
                    start,
                    self.input
                ))
            }
        };

        for _ in 0..dimensions {
            field = FieldType::Array(Box::new(field));
        }
        Ok(field)
    }
}
