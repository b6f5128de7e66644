//! Input and output variable tables.

use core::ptr::NonNull;

use ecow::EcoString;

use crate::Vec;
use crate::memory::{DataAddress, UNASSIGNED};
use crate::types::TypeTag;

/// Prefix of the synthetic inputs that hold `CONST` literals.
pub const CONSTANT_PREFIX: &str = "Constant@";

/// Where a variable lives once compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableStorage {
    Unassigned,
    /// Value stored in data memory at `address`.
    Internal { address: DataAddress },
    /// Value stored in caller memory; `slot` holds the pointer.
    External { slot: DataAddress, pointer: NonNull<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDescriptor {
    pub name: EcoString,
    /// `Void` until supplied by the caller or inferred from a `WRITE`.
    pub type_tag: TypeTag,
    /// Word address in data memory, or [`UNASSIGNED`].
    pub location: DataAddress,
    pub external: Option<NonNull<u8>>,
    /// Set on outputs once a `WRITE` has been compiled.
    pub used: bool,
    /// The type was taken from the stack by the last compile rather than set
    /// by the caller.
    pub type_inferred: bool,
}

impl VariableDescriptor {
    pub fn new(name: impl Into<EcoString>, type_tag: TypeTag, location: DataAddress) -> Self {
        Self {
            name: name.into(),
            type_tag,
            location,
            external: None,
            used: false,
            type_inferred: false,
        }
    }

    pub fn storage(&self) -> VariableStorage {
        match (self.location, self.external) {
            (UNASSIGNED, _) => VariableStorage::Unassigned,
            (slot, Some(pointer)) => VariableStorage::External { slot, pointer },
            (address, None) => VariableStorage::Internal { address },
        }
    }

    pub fn is_constant(&self) -> bool {
        self.name.starts_with(CONSTANT_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    #[error("variable {name} already exists")]
    Duplicate { name: EcoString },
}

/// Selects a variable by name or by position in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRef<'a> {
    Name(&'a str),
    Index(usize),
}

impl<'a> From<&'a str> for VarRef<'a> {
    fn from(name: &'a str) -> Self {
        VarRef::Name(name)
    }
}

impl From<usize> for VarRef<'_> {
    fn from(index: usize) -> Self {
        VarRef::Index(index)
    }
}

/// Ordered list of variables with unique names.
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    entries: Vec<VariableDescriptor>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a variable and returns its index.
    pub fn add(
        &mut self,
        name: impl Into<EcoString>,
        type_tag: TypeTag,
        location: DataAddress,
    ) -> Result<usize, VariableError> {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(VariableError::Duplicate { name });
        }
        self.entries
            .push(VariableDescriptor::new(name, type_tag, location));
        Ok(self.entries.len() - 1)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|v| v.name.as_str() == name)
    }

    pub fn find(&self, name: &str) -> Option<&VariableDescriptor> {
        self.entries.iter().find(|v| v.name.as_str() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut VariableDescriptor> {
        self.entries.iter_mut().find(|v| v.name.as_str() == name)
    }

    pub fn get(&self, index: usize) -> Option<&VariableDescriptor> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut VariableDescriptor> {
        self.entries.get_mut(index)
    }

    pub fn resolve(&self, var: VarRef<'_>) -> Option<&VariableDescriptor> {
        match var {
            VarRef::Name(name) => self.find(name),
            VarRef::Index(index) => self.get(index),
        }
    }

    pub fn resolve_mut(&mut self, var: VarRef<'_>) -> Option<&mut VariableDescriptor> {
        match var {
            VarRef::Name(name) => self.find_mut(name),
            VarRef::Index(index) => self.get_mut(index),
        }
    }

    /// The variable placed at `address`, if any.
    pub fn find_by_address(&self, address: DataAddress) -> Option<&VariableDescriptor> {
        if address == UNASSIGNED {
            return None;
        }
        self.entries.iter().find(|v| v.location == address)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableDescriptor> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut VariableDescriptor> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Read-only view of both tables, used to name addresses in listings.
#[derive(Debug, Clone, Copy)]
pub struct Symbols<'a> {
    pub inputs: &'a VariableTable,
    pub outputs: &'a VariableTable,
    pub start_of_variables: DataAddress,
}

impl<'a> Symbols<'a> {
    /// Looks `address` up among the outputs, then the inputs.
    pub fn find(&self, address: DataAddress) -> Option<&'a VariableDescriptor> {
        self.outputs
            .find_by_address(address)
            .or_else(|| self.inputs.find_by_address(address))
    }

    pub fn is_constant(&self, address: DataAddress) -> bool {
        address < self.start_of_variables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut table = VariableTable::new();
        assert_eq!(table.add("x", TypeTag::Void, UNASSIGNED), Ok(0));
        assert_eq!(table.add("y", TypeTag::Float64, UNASSIGNED), Ok(1));
        assert_eq!(
            table.add("x", TypeTag::Int8, 4),
            Err(VariableError::Duplicate { name: "x".into() })
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_resolve_by_name_and_index() {
        let mut table = VariableTable::new();
        table.add("a", TypeTag::Int32, 0).unwrap();
        table.add("b", TypeTag::UInt8, 1).unwrap();
        assert_eq!(table.resolve("b".into()).unwrap().location, 1);
        assert_eq!(table.resolve(0usize.into()).unwrap().name.as_str(), "a");
        assert!(table.resolve(VarRef::Index(2)).is_none());
    }

    #[test]
    fn test_storage_view() {
        let mut v = VariableDescriptor::new("x", TypeTag::Float64, UNASSIGNED);
        assert_eq!(v.storage(), VariableStorage::Unassigned);
        v.location = 3;
        assert_eq!(v.storage(), VariableStorage::Internal { address: 3 });
        let mut target = 0.0f64;
        let pointer = NonNull::from(&mut target).cast::<u8>();
        v.external = Some(pointer);
        assert_eq!(
            v.storage(),
            VariableStorage::External {
                slot: 3,
                pointer
            }
        );
    }

    #[test]
    fn test_symbols_prefer_outputs() {
        let mut inputs = VariableTable::new();
        let mut outputs = VariableTable::new();
        inputs.add("Constant@0", TypeTag::Int64, 0).unwrap();
        inputs.add("x", TypeTag::Int64, 2).unwrap();
        outputs.add("x", TypeTag::Int64, 2).unwrap();
        let symbols = Symbols {
            inputs: &inputs,
            outputs: &outputs,
            start_of_variables: 2,
        };
        assert!(symbols.is_constant(0));
        assert!(!symbols.is_constant(2));
        assert!(symbols.find(0).unwrap().is_constant());
        assert!(core::ptr::eq(symbols.find(2).unwrap(), outputs.get(0).unwrap()));
    }
}
