//! JVM opcodes understood by the instruction model.
//!
//! Only opcodes that the rewriter inspects or the delegate emitter produces, plus the common
//! ones a method body is built from, have a named variant. Everything else travels through
//! [`crate::model::Instruction::Opaque`] untouched.

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// A JVM opcode with its encoded byte value as discriminant.
///
/// # Examples
///
/// ```rust
/// use lambdascope::model::Opcode;
///
/// assert_eq!(Opcode::Invokestatic as u8, 0xb8);
/// assert_eq!(Opcode::from_byte(0xba), Some(Opcode::Invokedynamic));
/// assert_eq!(Opcode::IfIcmpeq.to_string(), "if_icmpeq");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, EnumIter, EnumCount)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum Opcode {
    /// Do nothing
    Nop = 0x00,
    /// Push `null`
    AconstNull = 0x01,
    /// Push int constant -1
    #[strum(serialize = "iconst_m1")]
    IconstM1 = 0x02,
    /// Push int constant 0
    #[strum(serialize = "iconst_0")]
    Iconst0 = 0x03,
    /// Push int constant 1
    #[strum(serialize = "iconst_1")]
    Iconst1 = 0x04,
    /// Push int constant 2
    #[strum(serialize = "iconst_2")]
    Iconst2 = 0x05,
    /// Push int constant 3
    #[strum(serialize = "iconst_3")]
    Iconst3 = 0x06,
    /// Push int constant 4
    #[strum(serialize = "iconst_4")]
    Iconst4 = 0x07,
    /// Push int constant 5
    #[strum(serialize = "iconst_5")]
    Iconst5 = 0x08,
    /// Push long constant 0
    #[strum(serialize = "lconst_0")]
    Lconst0 = 0x09,
    /// Push long constant 1
    #[strum(serialize = "lconst_1")]
    Lconst1 = 0x0a,
    /// Push float constant 0
    #[strum(serialize = "fconst_0")]
    Fconst0 = 0x0b,
    /// Push double constant 0
    #[strum(serialize = "dconst_0")]
    Dconst0 = 0x0e,
    /// Push byte
    Bipush = 0x10,
    /// Push short
    Sipush = 0x11,
    /// Push item from the constant pool
    Ldc = 0x12,
    /// Load int from local
    Iload = 0x15,
    /// Load long from local
    Lload = 0x16,
    /// Load float from local
    Fload = 0x17,
    /// Load double from local
    Dload = 0x18,
    /// Load reference from local
    Aload = 0x19,
    /// Load int from array
    Iaload = 0x2e,
    /// Load reference from array
    Aaload = 0x32,
    /// Store int into local
    Istore = 0x36,
    /// Store long into local
    Lstore = 0x37,
    /// Store float into local
    Fstore = 0x38,
    /// Store double into local
    Dstore = 0x39,
    /// Store reference into local
    Astore = 0x3a,
    /// Store reference into array
    Aastore = 0x53,
    /// Pop the top operand stack value
    Pop = 0x57,
    /// Pop the top one or two operand stack values
    Pop2 = 0x58,
    /// Duplicate the top operand stack value
    Dup = 0x59,
    /// Duplicate the top value and insert it two values down
    #[strum(serialize = "dup_x1")]
    DupX1 = 0x5a,
    /// Swap the top two operand stack values
    Swap = 0x5f,
    /// Add int
    Iadd = 0x60,
    /// Add long
    Ladd = 0x61,
    /// Subtract int
    Isub = 0x64,
    /// Multiply int
    Imul = 0x68,
    /// Increment local variable by constant
    Iinc = 0x84,
    /// Branch if int is zero
    Ifeq = 0x99,
    /// Branch if int is non-zero
    Ifne = 0x9a,
    /// Branch if ints are equal
    IfIcmpeq = 0x9f,
    /// Branch if ints are not equal
    IfIcmpne = 0xa0,
    /// Branch if references are equal
    IfAcmpeq = 0xa5,
    /// Branch if references are not equal
    IfAcmpne = 0xa6,
    /// Branch always
    Goto = 0xa7,
    /// Return int
    Ireturn = 0xac,
    /// Return long
    Lreturn = 0xad,
    /// Return float
    Freturn = 0xae,
    /// Return double
    Dreturn = 0xaf,
    /// Return reference
    Areturn = 0xb0,
    /// Return void
    Return = 0xb1,
    /// Get static field
    Getstatic = 0xb2,
    /// Set static field
    Putstatic = 0xb3,
    /// Get instance field
    Getfield = 0xb4,
    /// Set instance field
    Putfield = 0xb5,
    /// Invoke instance method, dispatch on the receiver's class
    Invokevirtual = 0xb6,
    /// Invoke constructor, private or superclass method
    Invokespecial = 0xb7,
    /// Invoke class (static) method
    Invokestatic = 0xb8,
    /// Invoke interface method
    Invokeinterface = 0xb9,
    /// Invoke a dynamically computed call site
    Invokedynamic = 0xba,
    /// Create new object
    New = 0xbb,
    /// Create new array of primitives
    Newarray = 0xbc,
    /// Create new array of references
    Anewarray = 0xbd,
    /// Get length of array
    Arraylength = 0xbe,
    /// Throw exception or error
    Athrow = 0xbf,
    /// Check whether object is of given type
    Checkcast = 0xc0,
    /// Determine if object is of given type
    Instanceof = 0xc1,
    /// Enter monitor for object
    Monitorenter = 0xc2,
    /// Exit monitor for object
    Monitorexit = 0xc3,
    /// Branch if reference is null
    Ifnull = 0xc6,
    /// Branch if reference is not null
    Ifnonnull = 0xc7,
}

impl Opcode {
    /// Look up the named opcode for an encoded byte
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::iter().find(|op| *op as u8 == byte)
    }

    /// Returns true for the five method invocation opcodes
    #[must_use]
    pub fn is_invoke(&self) -> bool {
        matches!(
            self,
            Self::Invokevirtual
                | Self::Invokespecial
                | Self::Invokestatic
                | Self::Invokeinterface
                | Self::Invokedynamic
        )
    }

    /// Returns true for the six return opcodes
    #[must_use]
    pub fn is_return(&self) -> bool {
        matches!(
            self,
            Self::Ireturn
                | Self::Lreturn
                | Self::Freturn
                | Self::Dreturn
                | Self::Areturn
                | Self::Return
        )
    }
}
