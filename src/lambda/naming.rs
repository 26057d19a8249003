//! Names the compiler and runtime use for lambda plumbing.

use crate::model::{AccessFlags, MethodHeader};

/// Owner of the bootstrap methods that link lambda call sites
pub const LAMBDA_METAFACTORY: &str = "java/lang/invoke/LambdaMetafactory";

/// Prefix of synthetic accessor method names
pub const ACCESSOR_PREFIX: &str = "access$lambda$";

/// Name of the compiler-generated lambda deserialization hook
pub const DESERIALIZATION_HOOK_NAME: &str = "$deserializeLambda$";

/// Descriptor of the compiler-generated lambda deserialization hook
pub const DESERIALIZATION_HOOK_DESC: &str =
    "(Ljava/lang/invoke/SerializedLambda;)Ljava/lang/Object;";

/// Name of the `k`-th accessor of a class
#[must_use]
pub fn accessor_name(k: usize) -> String {
    format!("{ACCESSOR_PREFIX}{k}")
}

/// Returns true if `method` is the synthetic `$deserializeLambda$` hook
#[must_use]
pub fn is_deserialization_hook(method: &MethodHeader) -> bool {
    method.name == DESERIALIZATION_HOOK_NAME
        && method.access.contains(AccessFlags::SYNTHETIC)
        && method.descriptor.to_string() == DESERIALIZATION_HOOK_DESC
}
