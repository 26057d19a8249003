//! Access flags shared by classes and methods.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Class and method access flags as stored in the class file
    pub struct AccessFlags: u16 {
        /// Accessible from anywhere
        const PUBLIC = 0x0001;
        /// Accessible only within the declaring class
        const PRIVATE = 0x0002;
        /// Accessible within the package and from subclasses
        const PROTECTED = 0x0004;
        /// Declared static
        const STATIC = 0x0008;
        /// Declared final
        const FINAL = 0x0010;
        /// Synchronized method, or `ACC_SUPER` on a class
        const SYNCHRONIZED = 0x0020;
        /// Compiler-generated bridge method
        const BRIDGE = 0x0040;
        /// Declared with a variable number of arguments
        const VARARGS = 0x0080;
        /// Implemented in native code
        const NATIVE = 0x0100;
        /// The class is an interface
        const INTERFACE = 0x0200;
        /// Declared abstract
        const ABSTRACT = 0x0400;
        /// Floating point mode is FP-strict
        const STRICT = 0x0800;
        /// Compiler-generated, not present in source
        const SYNTHETIC = 0x1000;
        /// The class is an annotation type
        const ANNOTATION = 0x2000;
        /// The class is an enum
        const ENUM = 0x4000;
    }
}

impl AccessFlags {
    /// Build flags from the raw `access_flags` value, keeping unknown bits
    #[must_use]
    pub fn from_raw(flags: u16) -> Self {
        Self::from_bits_retain(flags)
    }

    /// Returns true if the private bit is set
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.contains(Self::PRIVATE)
    }

    /// Returns true if the protected bit is set
    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.contains(Self::PROTECTED)
    }

    /// Returns true if the interface bit is set
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.contains(Self::INTERFACE)
    }
}

impl Default for AccessFlags {
    fn default() -> Self {
        Self::empty()
    }
}
