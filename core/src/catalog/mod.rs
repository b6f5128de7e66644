//! Operator catalog.
//!
//! Every executable operator is a [`OperatorDescriptor`]: a name as written in
//! RPN source, the operand and result types, and a monomorphic function that
//! runs against a [`Machine`]. The catalog is an ordered table and lookups are
//! first-fit in registration order, so when two signatures can both match a
//! type stack the one registered first wins. [`Catalog::standard`] is the one
//! place that decides that order.

mod arith_ops;
mod compare_ops;
mod logic_ops;
mod math_ops;
mod memory_ops;
mod standard;

#[cfg(test)]
mod catalog_test;

use hashbrown::HashMap;
use lazy_static::lazy_static;
use smallvec::SmallVec;

use crate::compiler::TypeStack;
use crate::memory::CodeWord;
use crate::types::TypeTag;
use crate::vm::Machine;
use crate::Vec;

/// Index of a descriptor in the catalog, as stored in code memory.
pub type Opcode = CodeWord;

/// Implementation of one operator for one concrete type signature.
pub type OperatorFn = fn(&mut Machine<'_>);

/// Maximum number of operators the catalog accepts.
pub const MAX_OPERATORS: usize = 16384;

/// Operator names the compiler substitutes for `READ`/`WRITE` on variables
/// bound to caller-owned memory. They are rejected in source text.
pub const REMOTE_READ: &str = "RREAD";
pub const REMOTE_WRITE: &str = "RWRITE";

/// An immutable catalog entry.
#[derive(Clone)]
pub struct OperatorDescriptor {
    pub name: &'static str,
    pub inputs: usize,
    pub outputs: usize,
    /// Operand types first (`types[0]` is the top of the stack), then result
    /// types. `WRITE`-family entries declare no outputs and carry the
    /// destination type after the source.
    pub types: SmallVec<[TypeTag; 3]>,
    pub function: OperatorFn,
}

impl OperatorDescriptor {
    pub fn new(
        name: &'static str,
        inputs: &[TypeTag],
        outputs: &[TypeTag],
        function: OperatorFn,
    ) -> Self {
        let mut types = SmallVec::new();
        types.extend_from_slice(inputs);
        types.extend_from_slice(outputs);
        Self {
            name,
            inputs: inputs.len(),
            outputs: outputs.len(),
            types,
            function,
        }
    }

    /// A `WRITE`-family descriptor: one input, no outputs, and the
    /// destination type matched against the variable being written.
    pub fn store(
        name: &'static str,
        source: TypeTag,
        destination: TypeTag,
        function: OperatorFn,
    ) -> Self {
        Self {
            name,
            inputs: 1,
            outputs: 0,
            types: SmallVec::from_slice(&[source, destination]),
            function,
        }
    }

    pub fn input_types(&self) -> &[TypeTag] {
        &self.types[..self.inputs.min(self.types.len())]
    }

    /// Types following the inputs: the results, or the destination of a
    /// `WRITE`.
    pub fn output_types(&self) -> &[TypeTag] {
        &self.types[self.inputs.min(self.types.len())..]
    }

    /// Whether this descriptor accepts the current type stack.
    fn matches(&self, stack: &TypeStack, match_output: bool) -> bool {
        let mut depth = 0;
        if match_output {
            match self.types.get(self.inputs) {
                Some(&expected) if stack.peek(0) == Some(expected) => depth = 1,
                _ => return false,
            }
        }
        self.input_types()
            .iter()
            .enumerate()
            .all(|(i, &expected)| stack.peek(depth + i) == Some(expected))
    }

    /// Applies the descriptor's effect to the simulated stacks.
    fn commit(
        &self,
        stack: &mut TypeStack,
        match_output: bool,
        data_stack_size: &mut usize,
    ) -> bool {
        if match_output {
            stack.pop();
        }
        for _ in 0..self.inputs {
            match stack.pop() {
                Some(tag) => *data_stack_size = data_stack_size.saturating_sub(tag.word_size()),
                None => return false,
            }
        }
        for &tag in self.output_types().iter().take(self.outputs) {
            if stack.push(tag).is_err() {
                return false;
            }
            *data_stack_size += tag.word_size();
        }
        true
    }
}

impl core::fmt::Debug for OperatorDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OperatorDescriptor")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("operator catalog is full ({capacity} entries), cannot register {name}")]
    Full { name: &'static str, capacity: usize },
    #[error("operator {name} declares no types")]
    Untyped { name: &'static str },
}

/// Ordered table of operators with a by-name index.
#[derive(Default)]
pub struct Catalog {
    descriptors: Vec<OperatorDescriptor>,
    functions: Vec<OperatorFn>,
    by_name: HashMap<&'static str, Vec<Opcode>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a descriptor and returns its opcode.
    pub fn register(&mut self, descriptor: OperatorDescriptor) -> Result<Opcode, CatalogError> {
        if descriptor.types.is_empty() {
            return Err(CatalogError::Untyped {
                name: descriptor.name,
            });
        }
        let capacity = MAX_OPERATORS.min(Opcode::MAX as usize);
        if self.descriptors.len() >= capacity {
            return Err(CatalogError::Full {
                name: descriptor.name,
                capacity,
            });
        }
        let opcode = self.descriptors.len() as Opcode;
        self.by_name.entry(descriptor.name).or_default().push(opcode);
        self.functions.push(descriptor.function);
        self.descriptors.push(descriptor);
        Ok(opcode)
    }

    pub(crate) fn add(
        &mut self,
        name: &'static str,
        inputs: &[TypeTag],
        outputs: &[TypeTag],
        function: OperatorFn,
    ) -> Result<Opcode, CatalogError> {
        self.register(OperatorDescriptor::new(name, inputs, outputs, function))
    }

    /// Finds the first operator named `name` that accepts the type stack and
    /// commits its effect.
    ///
    /// With `match_output`, the top of the stack holds the destination type
    /// already pushed by the caller and must equal the descriptor's first
    /// type after its inputs. On success the destination and the inputs are
    /// popped, the results are pushed, and `data_stack_size` follows the
    /// word sizes involved. On failure nothing is modified.
    pub fn find_match(
        &self,
        name: &str,
        stack: &mut TypeStack,
        match_output: bool,
        data_stack_size: &mut usize,
    ) -> Option<Opcode> {
        let candidates = self.by_name.get(name)?;
        let opcode = candidates.iter().copied().find(|&opcode| {
            self.descriptors[opcode as usize].matches(stack, match_output)
        })?;
        let descriptor = &self.descriptors[opcode as usize];
        let mut size = *data_stack_size;
        let mut scratch = stack.clone();
        if !descriptor.commit(&mut scratch, match_output, &mut size) {
            return None;
        }
        *stack = scratch;
        *data_stack_size = size;
        Some(opcode)
    }

    /// Opcodes registered under `name`, in registration order.
    pub fn opcodes(&self, name: &str) -> &[Opcode] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn descriptor(&self, opcode: Opcode) -> Option<&OperatorDescriptor> {
        self.descriptors.get(opcode as usize)
    }

    #[inline]
    pub fn function(&self, opcode: Opcode) -> Option<OperatorFn> {
        self.functions.get(opcode as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Opcode, &OperatorDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (i as Opcode, d))
    }
}

impl core::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Catalog")
            .field("len", &self.descriptors.len())
            .finish()
    }
}

lazy_static! {
    static ref STANDARD: Catalog = match Catalog::standard() {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!(%err, "failed to build the operator catalog");
            Catalog::new()
        }
    };
}

/// The process-wide standard catalog, built on first use.
pub fn catalog() -> &'static Catalog {
    &STANDARD
}

/// Calls `$register::<$($fixed,)* T>($catalog)?` once per numeric type, in
/// table order.
macro_rules! for_each_numeric {
    ($catalog:expr, $register:ident $(, $fixed:ty)*) => {
        $register::<$($fixed,)* f64>($catalog)?;
        $register::<$($fixed,)* f32>($catalog)?;
        $register::<$($fixed,)* u64>($catalog)?;
        $register::<$($fixed,)* i64>($catalog)?;
        $register::<$($fixed,)* u32>($catalog)?;
        $register::<$($fixed,)* i32>($catalog)?;
        $register::<$($fixed,)* u16>($catalog)?;
        $register::<$($fixed,)* i16>($catalog)?;
        $register::<$($fixed,)* u8>($catalog)?;
        $register::<$($fixed,)* i8>($catalog)?;
    };
}
pub(crate) use for_each_numeric;
