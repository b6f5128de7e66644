//! The evaluator facade: one program, its variables, and its memory.

use core::ptr::NonNull;
use std::io;

use super::{Error, EvaluatorOptions};
use crate::catalog::{Catalog, catalog};
use crate::compiler::{self, CompileError, CompiledProgram, VariableSet};
use crate::decompiler::{self, DecompileError};
use crate::memory::{CodeWord, DataAddress, DataMemory, UNASSIGNED};
use crate::status::Status;
use crate::types::{Numeric, TypeTag, Value};
use crate::variables::{VarRef, VariableDescriptor, VariableStorage, VariableTable};
use crate::vm::{self, ExecutionMode, Program, Stack};
use crate::String;

/// Compiles and runs one RPN program.
///
/// The lifecycle is fixed:
///
/// 1. [`extract_variables`](Self::extract_variables) lists the inputs and
///    outputs named by the program.
/// 2. The caller sets input types (outputs may be left `Void` to infer them)
///    and may bind variables to its own memory.
/// 3. [`compile`](Self::compile) type-checks and emits code, sizing the
///    stack once.
/// 4. [`execute`](Self::execute) runs the code as often as needed. It does
///    not allocate.
///
/// # Example
///
/// ```
/// use rteval_core::api::RuntimeEvaluator;
/// use rteval_core::types::TypeTag;
/// use rteval_core::vm::ExecutionMode;
///
/// let mut evaluator = RuntimeEvaluator::new("READ x\nREAD x\nMUL\nWRITE y");
/// evaluator.extract_variables().unwrap();
/// assert!(evaluator.set_input_variable_type("x".into(), TypeTag::Float64));
/// evaluator.compile().unwrap();
///
/// assert!(evaluator.set_input_value("x".into(), 3.0f64));
/// let status = evaluator.execute(ExecutionMode::Safe, None);
/// assert!(status.is_ok());
/// assert_eq!(evaluator.output_value::<f64>("y".into()), Some(9.0));
/// ```
pub struct RuntimeEvaluator {
    source: String,
    options: EvaluatorOptions,
    catalog: &'static Catalog,
    vars: VariableSet,
    program: Option<CompiledProgram>,
    stack: Stack,
}

impl RuntimeEvaluator {
    /// Create an evaluator over the standard catalog with default options.
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_options(source, EvaluatorOptions::default())
    }

    pub fn with_options(source: impl Into<String>, options: EvaluatorOptions) -> Self {
        Self::with_catalog(source, options, catalog())
    }

    /// Create an evaluator that selects operators from `catalog` instead of
    /// the standard one.
    pub fn with_catalog(
        source: impl Into<String>,
        options: EvaluatorOptions,
        catalog: &'static Catalog,
    ) -> Self {
        Self {
            source: source.into(),
            options,
            catalog,
            vars: VariableSet::default(),
            program: None,
            stack: Stack::default(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    pub fn variables(&self) -> &VariableSet {
        &self.vars
    }

    /// Whether the last [`compile`](Self::compile) succeeded and nothing has
    /// invalidated it since.
    pub fn is_compiled(&self) -> bool {
        self.program.is_some()
    }

    // ------------------------------------------------------------------
    // Passes
    // ------------------------------------------------------------------

    /// First pass. Replaces the variable tables and drops any compiled code,
    /// so types and bindings must be set again afterwards.
    pub fn extract_variables(&mut self) -> Result<(), CompileError> {
        self.program = None;
        self.vars = compiler::extract_variables(&self.source)?;
        Ok(())
    }

    /// Second pass. On failure the evaluator is left without code and
    /// [`execute`](Self::execute) reports `NOT_COMPLETED`.
    pub fn compile(&mut self) -> Result<(), CompileError> {
        self.program = None;
        let program = compiler::compile(
            &self.source,
            &mut self.vars,
            self.catalog,
            &self.options.compilation,
        )?;
        self.stack = Stack::new(program.stack_words);
        self.program = Some(program);
        Ok(())
    }

    /// Runs the compiled program once. `sink` receives the trace in
    /// [`ExecutionMode::Debug`] and is ignored otherwise.
    pub fn execute(&mut self, mode: ExecutionMode, sink: Option<&mut dyn io::Write>) -> Status {
        let Some(CompiledProgram { code, data, .. }) = self.program.as_mut() else {
            tracing::warn!("execute called without a compiled program");
            return Status::NOT_COMPLETED;
        };
        let program = Program {
            code: code.as_slice(),
            catalog: self.catalog,
            symbols: self.vars.symbols(),
        };
        vm::execute(
            program,
            &mut self.stack,
            data,
            mode,
            self.options.execution.trace,
            sink,
        )
    }

    /// Runs with the configured execution options, tracing to stderr in
    /// debug mode, and turns a non-empty status into an error.
    pub fn run(&mut self) -> Result<(), Error> {
        let mode = self.options.execution.mode;
        let status = match mode {
            ExecutionMode::Debug => {
                let mut stderr = io::stderr().lock();
                self.execute(mode, Some(&mut stderr))
            }
            _ => self.execute(mode, None),
        };
        if status.is_ok() {
            Ok(())
        } else {
            Err(Error::Execution(status))
        }
    }

    /// Lists the compiled code as RPN text; see [`decompiler::decompile`].
    pub fn decompile(&self, show_types: bool) -> Result<String, DecompileError> {
        let program = self.program.as_ref().ok_or(DecompileError::NotCompiled)?;
        decompiler::decompile(
            &program.code,
            self.catalog,
            self.vars.symbols(),
            &program.data,
            show_types,
        )
    }

    // ------------------------------------------------------------------
    // Variable setup
    // ------------------------------------------------------------------

    /// Sets the type of an input. Changing the type of a compiled program
    /// drops its code, since the data layout depends on it.
    ///
    /// Fails for unknown variables, constants and non-numeric types.
    pub fn set_input_variable_type(&mut self, var: VarRef<'_>, tag: TypeTag) -> bool {
        let changed = set_type(&mut self.vars.inputs, var, tag);
        self.settle(changed, "input type changed")
    }

    /// Sets the type of an output; `Void` asks the compiler to infer it.
    pub fn set_output_variable_type(&mut self, var: VarRef<'_>, tag: TypeTag) -> bool {
        let changed = set_type(&mut self.vars.outputs, var, tag);
        self.settle(changed, "output type changed")
    }

    /// Binds an input to caller memory.
    ///
    /// For a variable already compiled as external the new pointer is used
    /// by the next execution. Otherwise the compiled code is dropped and the
    /// binding takes effect at the next compile.
    ///
    /// # Safety
    ///
    /// `pointer` must be valid for reads and writes of the variable's type,
    /// and stay so for as long as programs referencing it are executed.
    pub unsafe fn set_input_variable_memory(&mut self, var: VarRef<'_>, pointer: NonNull<u8>) -> bool {
        match bind_memory(&mut self.vars.inputs, self.program.as_mut(), var, pointer) {
            Some(stale) => {
                self.settle(stale, "input bound to external memory");
                true
            }
            None => false,
        }
    }

    /// Binds an output to caller memory, like
    /// [`set_input_variable_memory`](Self::set_input_variable_memory).
    ///
    /// # Safety
    ///
    /// Same contract as [`set_input_variable_memory`](Self::set_input_variable_memory).
    pub unsafe fn set_output_variable_memory(
        &mut self,
        var: VarRef<'_>,
        pointer: NonNull<u8>,
    ) -> bool {
        match bind_memory(&mut self.vars.outputs, self.program.as_mut(), var, pointer) {
            Some(stale) => {
                self.settle(stale, "output bound to external memory");
                true
            }
            None => false,
        }
    }

    /// Where an input lives: the caller pointer for external variables,
    /// otherwise its slot in data memory, valid until the next compile.
    pub fn get_input_variable_memory(&mut self, var: VarRef<'_>) -> Option<NonNull<u8>> {
        let descriptor = self.vars.inputs.resolve(var)?;
        memory_of(descriptor, self.program.as_mut().map(|p| &mut p.data))
    }

    pub fn get_output_variable_memory(&mut self, var: VarRef<'_>) -> Option<NonNull<u8>> {
        let descriptor = self.vars.outputs.resolve(var)?;
        memory_of(descriptor, self.program.as_mut().map(|p| &mut p.data))
    }

    // ------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------

    /// Reads an input as `T`. `None` if the variable is unknown, not placed
    /// yet, or not of type `T`.
    pub fn input_value<T: Numeric>(&self, var: VarRef<'_>) -> Option<T> {
        let descriptor = self.vars.inputs.resolve(var)?;
        typed(self.load(descriptor)?)
    }

    pub fn output_value<T: Numeric>(&self, var: VarRef<'_>) -> Option<T> {
        let descriptor = self.vars.outputs.resolve(var)?;
        typed(self.load(descriptor)?)
    }

    /// Stores `value` into an input of type `T`.
    pub fn set_input_value<T: Numeric>(&mut self, var: VarRef<'_>, value: T) -> bool {
        self.set_input_variable_value(var, value.into_value())
    }

    /// Stores a dynamically typed value into an input of the same type.
    pub fn set_input_variable_value(&mut self, var: VarRef<'_>, value: Value) -> bool {
        let Some(descriptor) = self.vars.inputs.resolve(var) else {
            return false;
        };
        if descriptor.is_constant() || descriptor.type_tag != value.type_tag() {
            return false;
        }
        store(descriptor, self.program.as_mut().map(|p| &mut p.data), value)
    }

    /// Reads a variable by reference, looking at the outputs first.
    pub fn variable_value(&self, var: VarRef<'_>) -> Option<Value> {
        let descriptor = self
            .vars
            .outputs
            .resolve(var)
            .filter(|v| v.location != UNASSIGNED)
            .or_else(|| self.vars.inputs.resolve(var))?;
        self.load(descriptor)
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn browse_input_variable(&self, index: usize) -> Option<&VariableDescriptor> {
        self.vars.inputs.get(index)
    }

    pub fn browse_output_variable(&self, index: usize) -> Option<&VariableDescriptor> {
        self.vars.outputs.get(index)
    }

    /// The variable or constant placed at `address`.
    pub fn find_variable(&self, address: DataAddress) -> Option<&VariableDescriptor> {
        self.vars.symbols().find(address)
    }

    /// First data address after the constants.
    pub fn start_of_variables(&self) -> DataAddress {
        self.vars.start_of_variables
    }

    /// Compiled code, empty when not compiled.
    pub fn code(&self) -> &[CodeWord] {
        self.program.as_ref().map_or(&[], |p| p.code.as_slice())
    }

    pub fn data(&self) -> Option<&DataMemory> {
        self.program.as_ref().map(|p| &p.data)
    }

    /// Words the evaluation stack was sized to.
    pub fn stack_words(&self) -> usize {
        self.stack.capacity()
    }

    #[cfg(test)]
    pub(crate) fn truncate_stack(&mut self, words: usize) {
        self.stack.truncate(words);
    }

    fn load(&self, descriptor: &VariableDescriptor) -> Option<Value> {
        let data = &self.program.as_ref()?.data;
        match descriptor.storage() {
            VariableStorage::Unassigned => None,
            VariableStorage::Internal { address } => data.read_value(descriptor.type_tag, address),
            VariableStorage::External { pointer, .. } => {
                let mut bytes = [0u8; 8];
                // SAFETY: `set_*_variable_memory` requires the pointer to be
                // valid for the variable's type.
                unsafe {
                    core::ptr::copy_nonoverlapping(
                        pointer.as_ptr(),
                        bytes.as_mut_ptr(),
                        descriptor.type_tag.byte_size(),
                    );
                }
                Value::from_bytes(descriptor.type_tag, bytes)
            }
        }
    }

    /// Drops the compiled code after a successful change to the tables.
    fn settle(&mut self, changed: bool, what: &str) -> bool {
        if changed && self.program.take().is_some() {
            tracing::info!("{}; recompile before executing", what);
        }
        changed
    }
}

impl core::fmt::Debug for RuntimeEvaluator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RuntimeEvaluator")
            .field("source", &self.source)
            .field("vars", &self.vars)
            .field("compiled", &self.program.is_some())
            .field("stack_words", &self.stack.capacity())
            .finish()
    }
}

/// Returns whether the table changed; unknown variables, constants and
/// non-numeric inputs are refused.
fn set_type(table: &mut VariableTable, var: VarRef<'_>, tag: TypeTag) -> bool {
    let Some(descriptor) = table.resolve_mut(var) else {
        return false;
    };
    if descriptor.is_constant() {
        return false;
    }
    if !tag.is_numeric() && tag != TypeTag::Void {
        return false;
    }
    descriptor.type_tag = tag;
    descriptor.type_inferred = false;
    true
}

/// Returns `Some(true)` when the compiled code must be dropped, `Some(false)`
/// when the pointer was swapped in place, `None` when refused.
fn bind_memory(
    table: &mut VariableTable,
    program: Option<&mut CompiledProgram>,
    var: VarRef<'_>,
    pointer: NonNull<u8>,
) -> Option<bool> {
    let descriptor = table.resolve_mut(var)?;
    if descriptor.is_constant() {
        return None;
    }
    let was_external = descriptor.external.is_some();
    descriptor.external = Some(pointer);
    match (program, descriptor.storage()) {
        (Some(program), VariableStorage::External { slot, .. }) if was_external => {
            program.data.write_pointer(slot, pointer.as_ptr());
            Some(false)
        }
        _ => Some(true),
    }
}

fn memory_of(descriptor: &VariableDescriptor, data: Option<&mut DataMemory>) -> Option<NonNull<u8>> {
    match descriptor.storage() {
        VariableStorage::External { pointer, .. } => Some(pointer),
        VariableStorage::Internal { address } => data?.word_ptr(address),
        VariableStorage::Unassigned => descriptor.external,
    }
}

fn store(descriptor: &VariableDescriptor, data: Option<&mut DataMemory>, value: Value) -> bool {
    match descriptor.storage() {
        VariableStorage::Unassigned => false,
        VariableStorage::Internal { address } => match data {
            Some(data) => data.write_value(address, value),
            None => false,
        },
        VariableStorage::External { pointer, .. } => {
            let bytes = value.to_bytes();
            // SAFETY: see `RuntimeEvaluator::load`.
            unsafe {
                core::ptr::copy_nonoverlapping(
                    bytes.as_ptr(),
                    pointer.as_ptr(),
                    descriptor.type_tag.byte_size(),
                );
            }
            true
        }
    }
}

fn typed<T: Numeric>(value: Value) -> Option<T> {
    (value.type_tag() == T::TAG).then(|| T::from_bytes(value.to_bytes()))
}
