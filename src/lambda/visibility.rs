//! Decides whether a lambda implementation method is reachable from the generated lambda class.
//!
//! The generated class lives in the same package as the class containing the call site, but it
//! is a different class, so it cannot see private members of its host, and it cannot call
//! protected members inherited from a superclass in another package.

use crate::{
    index::MethodIndex,
    lambda::{context::package_of, ModuleContext},
    model::MethodRef,
    Error, Result,
};

/// Returns true if `implementation` must be reached through a synthetic accessor.
///
/// # Errors
///
/// Returns [`Error::NotAnalyzed`] if `implementation` belongs to the class being rewritten but
/// the index does not know it.
pub fn needs_accessor(
    implementation: &MethodRef,
    context: &ModuleContext,
    index: &dyn MethodIndex,
) -> Result<bool> {
    let visible = if implementation.owner == context.name {
        is_owned_method_visible(implementation, context, index)?
    } else {
        is_foreign_method_visible(implementation, context, index)
    };
    Ok(!visible)
}

/// A method of another class
fn is_foreign_method_visible(
    implementation: &MethodRef,
    context: &ModuleContext,
    index: &dyn MethodIndex,
) -> bool {
    // Everything but private is visible within a package, and a lambda body is never a
    // private method of a different class.
    if package_of(&implementation.owner) == context.package() {
        return true;
    }

    // Unknown owners are outside the input (platform or library classes)
    index
        .find(&implementation.owner, &implementation.signature())
        .map_or(true, |method| !method.access.is_protected())
}

/// A method of the class being rewritten
fn is_owned_method_visible(
    implementation: &MethodRef,
    context: &ModuleContext,
    index: &dyn MethodIndex,
) -> Result<bool> {
    // Interface lambda bodies are moved to a companion class
    if context.is_interface() {
        return Ok(true);
    }

    match index.find(&context.name, &implementation.signature()) {
        Some(method) => Ok(!method.access.is_private()),
        None => Err(Error::NotAnalyzed(implementation.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        index::ClassIndex,
        model::{AccessFlags, MethodDescriptor, MethodInfo, MethodSignature, ReferenceKind},
    };

    fn info(name: &str, desc: &str, access: AccessFlags) -> MethodInfo {
        MethodInfo {
            signature: MethodSignature::new(name, MethodDescriptor::parse(desc).unwrap()),
            access,
        }
    }

    fn index() -> ClassIndex {
        let index = ClassIndex::new();
        index.insert_methods(
            "app/Main",
            vec![
                info("lambda$run$0", "()V", AccessFlags::PRIVATE | AccessFlags::STATIC),
                info("helper", "(I)I", AccessFlags::PUBLIC),
                info("pkg", "()V", AccessFlags::empty()),
            ],
        );
        index.insert_methods(
            "app/Sibling",
            vec![info("secret", "()V", AccessFlags::PRIVATE)],
        );
        index.insert_methods(
            "lib/Base",
            vec![
                info("hook", "()V", AccessFlags::PROTECTED),
                info("open", "()V", AccessFlags::PUBLIC),
            ],
        );
        index
    }

    fn class_context() -> ModuleContext {
        ModuleContext::new(AccessFlags::PUBLIC | AccessFlags::SYNCHRONIZED, "app/Main")
    }

    fn handle(kind: ReferenceKind, owner: &str, name: &str, desc: &str) -> MethodRef {
        MethodRef::parse(kind, owner, name, desc).unwrap()
    }

    #[test]
    fn test_owned_private_needs_accessor() {
        let implementation = handle(ReferenceKind::Static, "app/Main", "lambda$run$0", "()V");
        assert!(needs_accessor(&implementation, &class_context(), &index()).unwrap());
    }

    #[test]
    fn test_owned_non_private_is_visible() {
        let index = index();
        let public = handle(ReferenceKind::Virtual, "app/Main", "helper", "(I)I");
        let package = handle(ReferenceKind::Virtual, "app/Main", "pkg", "()V");
        assert!(!needs_accessor(&public, &class_context(), &index).unwrap());
        assert!(!needs_accessor(&package, &class_context(), &index).unwrap());
    }

    #[test]
    fn test_owned_by_interface_is_always_visible() {
        let context = ModuleContext::new(
            AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
            "app/Main",
        );
        let private = handle(ReferenceKind::Static, "app/Main", "lambda$run$0", "()V");
        let unknown = handle(ReferenceKind::Static, "app/Main", "nowhere", "()V");
        assert!(!needs_accessor(&private, &context, &index()).unwrap());
        assert!(!needs_accessor(&unknown, &context, &index()).unwrap());
    }

    #[test]
    fn test_owned_missing_from_index_is_fatal() {
        let implementation = handle(ReferenceKind::Static, "app/Main", "lambda$gone$9", "()V");
        match needs_accessor(&implementation, &class_context(), &index()) {
            Err(Error::NotAnalyzed(method)) => assert_eq!(method, implementation),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_same_package_is_visible() {
        // Even a private sibling method counts as visible within the package
        let implementation = handle(ReferenceKind::Virtual, "app/Sibling", "secret", "()V");
        assert!(!needs_accessor(&implementation, &class_context(), &index()).unwrap());
    }

    #[test]
    fn test_foreign_protected_needs_accessor() {
        let implementation = handle(ReferenceKind::Virtual, "lib/Base", "hook", "()V");
        assert!(needs_accessor(&implementation, &class_context(), &index()).unwrap());
    }

    #[test]
    fn test_foreign_public_is_visible() {
        let implementation = handle(ReferenceKind::Virtual, "lib/Base", "open", "()V");
        assert!(!needs_accessor(&implementation, &class_context(), &index()).unwrap());
    }

    #[test]
    fn test_foreign_unknown_is_visible() {
        let platform = handle(
            ReferenceKind::Virtual,
            "java/lang/String",
            "length",
            "()I",
        );
        let unknown_member = handle(ReferenceKind::Virtual, "lib/Base", "missing", "()V");
        assert!(!needs_accessor(&platform, &class_context(), &index()).unwrap());
        assert!(!needs_accessor(&unknown_member, &class_context(), &index()).unwrap());
    }

    #[test]
    fn test_default_package() {
        let context = ModuleContext::new(AccessFlags::PUBLIC, "Main");
        let index = ClassIndex::new();
        index.insert_methods("Other", vec![info("hook", "()V", AccessFlags::PROTECTED)]);
        let implementation = handle(ReferenceKind::Virtual, "Other", "hook", "()V");
        assert!(!needs_accessor(&implementation, &context, &index).unwrap());
    }
}
