//! In-memory class representation and the validating writer sink.

use std::collections::HashSet;

use crate::{
    model::{Instruction, MethodHeader, MethodSignature, ModuleHeader, ModuleSink},
    Result,
};

/// A method with its body
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    /// Access flags, name, descriptor and declared exceptions
    pub header: MethodHeader,
    /// The body; empty for abstract and native methods
    pub code: Vec<Instruction>,
}

/// A complete class.
///
/// # Examples
///
/// ```rust
/// use lambdascope::model::{AccessFlags, Module, ModuleHeader, ModuleWriter};
///
/// let module = Module::new(ModuleHeader::new(52 << 16, AccessFlags::PUBLIC, "a/B"));
///
/// let mut writer = ModuleWriter::new();
/// module.accept(&mut writer)?;
/// assert_eq!(writer.finish()?, module);
/// # Ok::<(), lambdascope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    /// Class-level header
    pub header: ModuleHeader,
    /// Methods in declaration order
    pub methods: Vec<Method>,
}

impl Module {
    /// A class without methods
    #[must_use]
    pub fn new(header: ModuleHeader) -> Self {
        Module {
            header,
            methods: Vec::new(),
        }
    }

    /// Internal name of the class
    #[must_use]
    pub fn name(&self) -> &str {
        &self.header.name
    }

    /// Find a method by name and descriptor
    #[must_use]
    pub fn method(&self, signature: &MethodSignature) -> Option<&Method> {
        self.methods
            .iter()
            .find(|m| m.header.name == signature.name && m.header.descriptor == signature.descriptor)
    }

    /// Find the first method with the given name
    #[must_use]
    pub fn method_named(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.header.name == name)
    }

    /// Stream this class into `sink`
    ///
    /// Methods the sink drops have their bodies skipped.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by the sink.
    pub fn accept<S: ModuleSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.visit_header(&self.header)?;
        for method in &self.methods {
            if !sink.visit_method(&method.header)? {
                continue;
            }
            for instruction in &method.code {
                sink.visit_instruction(instruction.clone())?;
            }
            sink.visit_method_end()?;
        }
        sink.visit_end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    Initial,
    InClass,
    InMethod,
    Finished,
}

/// Sink that rebuilds a [`Module`] from streamed events.
///
/// The writer is the last stage of every rewrite chain and refuses any event sequence
/// that would not form a valid class: events out of order, instructions outside a method,
/// or two methods sharing a name and descriptor.
#[derive(Debug)]
pub struct ModuleWriter {
    state: WriterState,
    header: Option<ModuleHeader>,
    methods: Vec<Method>,
    current: Option<Method>,
    declared: HashSet<MethodSignature>,
}

impl ModuleWriter {
    /// Create an empty writer
    #[must_use]
    pub fn new() -> Self {
        ModuleWriter {
            state: WriterState::Initial,
            header: None,
            methods: Vec::new(),
            current: None,
            declared: HashSet::new(),
        }
    }

    /// Take the completed class
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the class end has not been visited.
    pub fn finish(self) -> Result<Module> {
        match (self.state, self.header) {
            (WriterState::Finished, Some(header)) => Ok(Module {
                header,
                methods: self.methods,
            }),
            _ => Err(malformed_error!("Class stream ended before visit_end")),
        }
    }

    fn expect_state(&self, state: WriterState, event: &str) -> Result<()> {
        if self.state != state {
            return Err(malformed_error!(
                "Unexpected {} while in state {:?}",
                event,
                self.state
            ));
        }
        Ok(())
    }
}

impl Default for ModuleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleSink for ModuleWriter {
    fn visit_header(&mut self, header: &ModuleHeader) -> Result<()> {
        self.expect_state(WriterState::Initial, "class header")?;
        self.header = Some(header.clone());
        self.state = WriterState::InClass;
        Ok(())
    }

    fn visit_method(&mut self, method: &MethodHeader) -> Result<bool> {
        self.expect_state(WriterState::InClass, "method header")?;
        if !self.declared.insert(method.method_signature()) {
            return Err(malformed_error!(
                "Duplicate method {}{}",
                method.name,
                method.descriptor
            ));
        }
        self.current = Some(Method {
            header: method.clone(),
            code: Vec::new(),
        });
        self.state = WriterState::InMethod;
        Ok(true)
    }

    fn visit_instruction(&mut self, instruction: Instruction) -> Result<()> {
        self.expect_state(WriterState::InMethod, "instruction")?;
        if let Some(current) = self.current.as_mut() {
            current.code.push(instruction);
        }
        Ok(())
    }

    fn visit_method_end(&mut self) -> Result<()> {
        self.expect_state(WriterState::InMethod, "method end")?;
        if let Some(current) = self.current.take() {
            self.methods.push(current);
        }
        self.state = WriterState::InClass;
        Ok(())
    }

    fn visit_end(&mut self) -> Result<()> {
        self.expect_state(WriterState::InClass, "class end")?;
        self.state = WriterState::Finished;
        Ok(())
    }
}
