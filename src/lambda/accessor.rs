//! Synthetic accessors for lambda implementation methods the lambda class cannot reach.
//!
//! An accessor is a static, synthetic method added to the class being rewritten. It takes the
//! same arguments as the call the lambda class would make and forwards them to the real
//! implementation:
//!
//! | implementation kind | accessor descriptor |
//! |---|---|
//! | static | unchanged |
//! | constructor | same parameters, returns the constructed type |
//! | instance | receiver (the class being rewritten) prepended as first parameter |

use crate::{
    index::MethodIndex,
    lambda::{naming::accessor_name, visibility::needs_accessor, ModuleContext},
    model::{FieldType, MethodDescriptor, MethodRef, ReferenceKind},
    Result,
};

/// Accessors created for one class, in creation order.
///
/// Entries are only ever appended, and every call that needs an accessor gets a new one, even
/// when an earlier entry already forwards to the same implementation. The accessor numbering
/// therefore matches the order of lambda call sites in the class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessorTable {
    entries: Vec<(MethodRef, MethodRef)>,
}

impl AccessorTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        AccessorTable {
            entries: Vec::new(),
        }
    }

    /// The method the lambda class should call to reach `implementation`.
    ///
    /// Returns `implementation` itself when it is visible; otherwise registers and returns a
    /// new accessor named `access$lambda$<k>`, where `k` is the number of accessors created
    /// so far.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotAnalyzed`] if the visibility of an owned method cannot be
    /// determined.
    pub fn resolve(
        &mut self,
        implementation: &MethodRef,
        context: &ModuleContext,
        index: &dyn MethodIndex,
    ) -> Result<MethodRef> {
        if !needs_accessor(implementation, context, index)? {
            return Ok(implementation.clone());
        }

        let accessor = MethodRef::new(
            ReferenceKind::Static,
            context.name.clone(),
            accessor_name(self.entries.len()),
            accessor_descriptor(implementation, context),
        );
        log::debug!("{} needs accessor {}", implementation, accessor.name);

        self.entries.push((accessor.clone(), implementation.clone()));
        Ok(accessor)
    }

    /// Number of accessors
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no accessor has been created
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(accessor, implementation)` pairs in creation order
    pub fn iter(&self) -> impl Iterator<Item = (&MethodRef, &MethodRef)> {
        self.entries
            .iter()
            .map(|(accessor, implementation)| (accessor, implementation))
    }

    /// Remove and return all entries, leaving the table empty
    pub fn take(&mut self) -> Vec<(MethodRef, MethodRef)> {
        std::mem::take(&mut self.entries)
    }
}

/// Descriptor of the accessor forwarding to `implementation`
#[must_use]
pub fn accessor_descriptor(implementation: &MethodRef, context: &ModuleContext) -> MethodDescriptor {
    match implementation.kind {
        ReferenceKind::Static => implementation.descriptor.clone(),
        ReferenceKind::Constructor => implementation
            .descriptor
            .with_return_type(FieldType::object(implementation.owner.clone())),
        ReferenceKind::Virtual | ReferenceKind::Special | ReferenceKind::Interface => {
            implementation
                .descriptor
                .with_leading_parameter(FieldType::object(context.name.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        index::ClassIndex,
        model::{AccessFlags, MethodInfo, MethodSignature},
    };

    const CLASS: &str = "app/Main";

    fn index() -> ClassIndex {
        let private = |name: &str, desc: &str| MethodInfo {
            signature: MethodSignature::new(name, MethodDescriptor::parse(desc).unwrap()),
            access: AccessFlags::PRIVATE,
        };
        let index = ClassIndex::new();
        index.insert_methods(
            CLASS,
            vec![
                private("<init>", "(I)V"),
                private("bar", "()V"),
                private("baz", "(J)Ljava/lang/String;"),
                private("lambda$main$0", "(Ljava/lang/String;)I"),
                MethodInfo {
                    signature: MethodSignature::new("open", MethodDescriptor::parse("()V").unwrap()),
                    access: AccessFlags::PUBLIC,
                },
            ],
        );
        index
    }

    fn context() -> ModuleContext {
        ModuleContext::new(AccessFlags::PUBLIC, CLASS)
    }

    fn handle(kind: ReferenceKind, name: &str, desc: &str) -> MethodRef {
        MethodRef::parse(kind, CLASS, name, desc).unwrap()
    }

    #[test]
    fn test_visible_method_is_returned_unchanged() {
        let mut table = AccessorTable::new();
        let open = handle(ReferenceKind::Virtual, "open", "()V");
        assert_eq!(table.resolve(&open, &context(), &index()).unwrap(), open);
        assert!(table.is_empty());
    }

    #[test]
    fn test_static_accessor_keeps_descriptor() {
        let mut table = AccessorTable::new();
        let implementation = handle(ReferenceKind::Static, "lambda$main$0", "(Ljava/lang/String;)I");
        let accessor = table.resolve(&implementation, &context(), &index()).unwrap();

        assert_eq!(accessor.name, "access$lambda$0");
        assert_eq!(accessor.owner, CLASS);
        assert_eq!(accessor.kind, ReferenceKind::Static);
        assert_eq!(accessor.descriptor, implementation.descriptor);
    }

    #[test]
    fn test_constructor_accessor_returns_owner() {
        let mut table = AccessorTable::new();
        let implementation = handle(ReferenceKind::Constructor, "<init>", "(I)V");
        let accessor = table.resolve(&implementation, &context(), &index()).unwrap();

        assert_eq!(accessor.descriptor.to_string(), "(I)Lapp/Main;");
        assert_eq!(accessor.descriptor.params(), implementation.descriptor.params());
    }

    #[test]
    fn test_instance_accessor_takes_receiver_first() {
        let mut table = AccessorTable::new();
        let implementation = handle(ReferenceKind::Special, "baz", "(J)Ljava/lang/String;");
        let accessor = table.resolve(&implementation, &context(), &index()).unwrap();

        assert_eq!(
            accessor.descriptor.to_string(),
            "(Lapp/Main;J)Ljava/lang/String;"
        );
    }

    #[test]
    fn test_instance_receiver_is_current_class_not_owner() {
        // A protected method of a superclass in another package is called on `this`
        let index = index();
        index.insert_methods(
            "lib/Base",
            vec![MethodInfo {
                signature: MethodSignature::new("hook", MethodDescriptor::parse("()V").unwrap()),
                access: AccessFlags::PROTECTED,
            }],
        );
        let implementation =
            MethodRef::parse(ReferenceKind::Virtual, "lib/Base", "hook", "()V").unwrap();

        let mut table = AccessorTable::new();
        let accessor = table.resolve(&implementation, &context(), &index).unwrap();
        assert_eq!(accessor.descriptor.to_string(), "(Lapp/Main;)V");
        assert_eq!(accessor.owner, CLASS);
    }

    #[test]
    fn test_indices_increase_per_accessor() {
        let mut table = AccessorTable::new();
        let index = index();
        let names: Vec<String> = ["bar", "baz", "bar"]
            .iter()
            .map(|name| {
                let desc = if *name == "bar" { "()V" } else { "(J)Ljava/lang/String;" };
                let implementation = handle(ReferenceKind::Special, name, desc);
                table.resolve(&implementation, &context(), &index).unwrap().name
            })
            .collect();

        assert_eq!(
            names,
            ["access$lambda$0", "access$lambda$1", "access$lambda$2"]
        );
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_same_implementation_gets_separate_entries() {
        let mut table = AccessorTable::new();
        let implementation = handle(ReferenceKind::Special, "bar", "()V");
        let first = table.resolve(&implementation, &context(), &index()).unwrap();
        let second = table.resolve(&implementation, &context(), &index()).unwrap();

        assert_ne!(first, second);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].1, &implementation);
        assert_eq!(entries[1].1, &implementation);
    }

    #[test]
    fn test_take_empties_table() {
        let mut table = AccessorTable::new();
        let implementation = handle(ReferenceKind::Special, "bar", "()V");
        table.resolve(&implementation, &context(), &index()).unwrap();

        let entries = table.take();
        assert_eq!(entries.len(), 1);
        assert!(table.is_empty());
    }
}
