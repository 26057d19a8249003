//! Shared fixtures for unit tests.

use std::sync::Mutex;

use crate::{
    index::ClassIndex,
    lambda::{
        FactoryMethod, Reifier, ReifyRequest, DESERIALIZATION_HOOK_DESC, DESERIALIZATION_HOOK_NAME,
        LAMBDA_METAFACTORY,
    },
    model::{
        AccessFlags, BootstrapArg, CallSite, Instruction, Method, MethodDescriptor, MethodHeader,
        MethodRef, Module, ModuleHeader, Opcode, ReferenceKind,
    },
    Error, Result,
};

pub const METAFACTORY_DESC: &str = "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodType;Ljava/lang/invoke/MethodHandle;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;";

/// Build a method from its parts
pub fn method(access: AccessFlags, name: &str, desc: &str, code: Vec<Instruction>) -> Method {
    Method {
        header: MethodHeader::new(access, name, MethodDescriptor::parse(desc).unwrap()),
        code,
    }
}

/// A `LambdaMetafactory.metafactory` call site for `implementation`
pub fn lambda_site(name: &str, invoked_desc: &str, implementation: &MethodRef) -> Instruction {
    let bootstrap = MethodRef::parse(
        ReferenceKind::Static,
        LAMBDA_METAFACTORY,
        "metafactory",
        METAFACTORY_DESC,
    )
    .unwrap();

    Instruction::InvokeDynamic(CallSite {
        name: name.to_string(),
        descriptor: MethodDescriptor::parse(invoked_desc).unwrap(),
        bootstrap,
        bootstrap_args: vec![
            BootstrapArg::MethodType(implementation.descriptor.clone()),
            BootstrapArg::Handle(implementation.clone()),
            BootstrapArg::MethodType(implementation.descriptor.clone()),
        ],
    })
}

/// A small program of three classes.
///
/// `app/Main` has two lambda call sites: one on its private instance method
/// `lambda$run$1()V`, one on the public `lib/Util.helper()Ljava/lang/Object;`. It also
/// carries a deserialization hook and an unused private static `lambda$run$0()V`.
///
/// `app/Unindexed` exists as a module but is left out of the index.
pub struct Fixture {
    pub modules: Vec<Module>,
    pub index: ClassIndex,
}

impl Fixture {
    pub fn sample() -> Self {
        let modules = vec![main_module(), util_module(), unindexed_module()];
        let index = ClassIndex::from_modules(&modules[..2]);
        Fixture { modules, index }
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.name() == name)
    }
}

fn main_module() -> Module {
    let instance_body =
        MethodRef::parse(ReferenceKind::Special, "app/Main", "lambda$run$1", "()V").unwrap();
    let helper = MethodRef::parse(
        ReferenceKind::Static,
        "lib/Util",
        "helper",
        "()Ljava/lang/Object;",
    )
    .unwrap();

    let mut module = Module::new(ModuleHeader::new(52 << 16, AccessFlags::PUBLIC, "app/Main"));
    module.methods = vec![
        method(
            AccessFlags::PUBLIC,
            "<init>",
            "()V",
            vec![
                Instruction::Var {
                    opcode: Opcode::Aload,
                    index: 0,
                },
                Instruction::Method {
                    opcode: Opcode::Invokespecial,
                    owner: "java/lang/Object".to_string(),
                    name: "<init>".to_string(),
                    descriptor: MethodDescriptor::parse("()V").unwrap(),
                    interface: false,
                },
                Instruction::Simple(Opcode::Return),
            ],
        ),
        method(
            AccessFlags::PUBLIC,
            "run",
            "()V",
            vec![
                Instruction::Var {
                    opcode: Opcode::Aload,
                    index: 0,
                },
                lambda_site("run", "(Lapp/Main;)Ljava/lang/Runnable;", &instance_body),
                Instruction::Simple(Opcode::Pop),
                lambda_site("get", "()Ljava/util/function/Supplier;", &helper),
                Instruction::Simple(Opcode::Pop),
                Instruction::Simple(Opcode::Return),
            ],
        ),
        method(
            AccessFlags::PRIVATE | AccessFlags::STATIC | AccessFlags::SYNTHETIC,
            "lambda$run$0",
            "()V",
            vec![Instruction::Simple(Opcode::Return)],
        ),
        method(
            AccessFlags::PRIVATE | AccessFlags::SYNTHETIC,
            "lambda$run$1",
            "()V",
            vec![Instruction::Simple(Opcode::Return)],
        ),
        method(
            AccessFlags::PRIVATE | AccessFlags::STATIC | AccessFlags::SYNTHETIC,
            DESERIALIZATION_HOOK_NAME,
            DESERIALIZATION_HOOK_DESC,
            vec![
                Instruction::Simple(Opcode::AconstNull),
                Instruction::Simple(Opcode::Areturn),
            ],
        ),
    ];
    module
}

fn util_module() -> Module {
    let mut module = Module::new(ModuleHeader::new(
        52 << 16,
        AccessFlags::PUBLIC | AccessFlags::FINAL,
        "lib/Util",
    ));
    module.methods = vec![method(
        AccessFlags::PUBLIC | AccessFlags::STATIC,
        "helper",
        "()Ljava/lang/Object;",
        vec![
            Instruction::Simple(Opcode::AconstNull),
            Instruction::Simple(Opcode::Areturn),
        ],
    )];
    module
}

fn unindexed_module() -> Module {
    Module::new(ModuleHeader::new(52 << 16, AccessFlags::PUBLIC, "app/Unindexed"))
}

/// What a [`RecordingReifier`] saw for one call site
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub implementation: MethodRef,
    pub accessor: MethodRef,
    pub invoker: String,
    pub invoked_name: String,
    pub invoked_type: MethodDescriptor,
}

/// A [`Reifier`] that records its requests and names factories `<invoker>$$Lambda$<n>`
#[derive(Debug, Default)]
pub struct RecordingReifier {
    requests: Mutex<Vec<RecordedRequest>>,
    failure: Option<String>,
}

impl RecordingReifier {
    pub fn failing(message: &str) -> Self {
        RecordingReifier {
            requests: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Reifier for RecordingReifier {
    fn reify(&self, request: &ReifyRequest<'_>) -> Result<FactoryMethod> {
        if let Some(message) = &self.failure {
            return Err(Error::Reification(message.clone()));
        }

        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            implementation: request.implementation.clone(),
            accessor: request.accessor.clone(),
            invoker: request.invoker.internal_name().to_string(),
            invoked_name: request.invoked_name.to_string(),
            invoked_type: request.invoked_type.clone(),
        });

        Ok(FactoryMethod {
            owner: format!(
                "{}$$Lambda${}",
                request.invoker.internal_name(),
                requests.len()
            ),
            name: "lambdaFactory$".to_string(),
            descriptor: request.invoked_type.clone(),
        })
    }
}
