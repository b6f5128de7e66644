//! Code and data memory regions.
//!
//! Both regions are word addressed. Code memory holds 16-bit words (an opcode
//! optionally followed by one address operand). Data memory holds 32-bit words:
//! constants first, then input variables, then output variables. A value
//! narrower than a word still occupies a whole word.
//!
//! Accesses outside a region never panic: reads yield zero and writes are
//! dropped. The compiler only emits in-range addresses, so this only matters
//! when a program is driven with corrupted state.

use crate::types::{Numeric, TypeTag, Value};
use crate::Vec;

/// One code memory element: an opcode or an address operand.
pub type CodeWord = u16;

/// Program code: opcodes, each optionally followed by an address operand.
/// Immutable once compiled.
pub type CodeMemory = Vec<CodeWord>;

/// One data memory (and stack) element.
pub type DataWord = u32;

/// Word index into data memory.
pub type DataAddress = u16;

/// Location of a variable that has not been placed yet.
pub const UNASSIGNED: DataAddress = DataAddress::MAX;

pub const WORD_BYTES: usize = core::mem::size_of::<DataWord>();

/// Words taken by an external pointer stored in data memory.
pub const POINTER_WORDS: usize = words_for_bytes(core::mem::size_of::<usize>());

/// Number of whole words needed to hold `bytes` bytes.
pub const fn words_for_bytes(bytes: usize) -> usize {
    bytes.div_ceil(WORD_BYTES)
}

/// Gathers up to two words into the padded byte form used by [`Numeric`].
#[inline]
pub(crate) fn words_to_bytes(words: &[DataWord]) -> [u8; 8] {
    let mut bytes = [0u8; 8];
    for (chunk, word) in bytes.chunks_exact_mut(WORD_BYTES).zip(words) {
        chunk.copy_from_slice(&word.to_ne_bytes());
    }
    bytes
}

#[inline]
pub(crate) fn bytes_to_words(bytes: [u8; 8], words: &mut [DataWord]) {
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(WORD_BYTES)) {
        let mut raw = [0u8; WORD_BYTES];
        raw.copy_from_slice(chunk);
        *word = DataWord::from_ne_bytes(raw);
    }
}

/// Flat, word-addressed variable memory.
#[derive(Debug, Clone, Default)]
pub struct DataMemory {
    words: Vec<DataWord>,
}

impl DataMemory {
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_slice(&self) -> &[DataWord] {
        &self.words
    }

    #[inline]
    pub fn read<T: Numeric>(&self, address: DataAddress) -> T {
        let start = address as usize;
        match self.words.get(start..start + T::WORDS) {
            Some(words) => T::from_bytes(words_to_bytes(words)),
            None => T::default(),
        }
    }

    #[inline]
    pub fn write<T: Numeric>(&mut self, address: DataAddress, value: T) {
        let start = address as usize;
        if let Some(words) = self.words.get_mut(start..start + T::WORDS) {
            bytes_to_words(value.to_bytes(), words);
        }
    }

    pub fn read_value(&self, tag: TypeTag, address: DataAddress) -> Option<Value> {
        let start = address as usize;
        let words = self.words.get(start..start + tag.word_size())?;
        Value::from_bytes(tag, words_to_bytes(words))
    }

    /// Stores `value` at `address`; returns `false` if it does not fit.
    pub fn write_value(&mut self, address: DataAddress, value: Value) -> bool {
        let start = address as usize;
        let size = value.type_tag().word_size();
        match self.words.get_mut(start..start + size) {
            Some(words) => {
                bytes_to_words(value.to_bytes(), words);
                true
            }
            None => false,
        }
    }

    /// Raw pointer to the word at `address`, for callers that poke internal
    /// variables directly.
    pub fn word_ptr(&mut self, address: DataAddress) -> Option<core::ptr::NonNull<u8>> {
        self.words
            .get_mut(address as usize)
            .map(|word| core::ptr::NonNull::from(word).cast::<u8>())
    }

    /// Stores an external pointer in the slot of an external variable.
    pub fn write_pointer(&mut self, address: DataAddress, pointer: *mut u8) {
        let raw = pointer.expose_provenance().to_ne_bytes();
        let start = address as usize;
        if let Some(words) = self.words.get_mut(start..start + POINTER_WORDS) {
            bytes_to_words(pad_pointer(raw), words);
        }
    }

    /// Reads back a pointer stored by [`DataMemory::write_pointer`].
    pub fn read_pointer(&self, address: DataAddress) -> *mut u8 {
        let start = address as usize;
        let Some(words) = self.words.get(start..start + POINTER_WORDS) else {
            return core::ptr::null_mut();
        };
        let bytes = words_to_bytes(words);
        let mut raw = [0u8; core::mem::size_of::<usize>()];
        raw.copy_from_slice(&bytes[..core::mem::size_of::<usize>()]);
        core::ptr::with_exposed_provenance_mut(usize::from_ne_bytes(raw))
    }
}

fn pad_pointer(raw: [u8; core::mem::size_of::<usize>()]) -> [u8; 8] {
    let mut bytes = [0u8; 8];
    bytes[..raw.len()].copy_from_slice(&raw);
    bytes
}

static_assertions::const_assert!(core::mem::size_of::<usize>() <= 8);
static_assertions::const_assert!(POINTER_WORDS <= 2);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_rounding() {
        assert_eq!(words_for_bytes(0), 0);
        assert_eq!(words_for_bytes(1), 1);
        assert_eq!(words_for_bytes(4), 1);
        assert_eq!(words_for_bytes(8), 2);
    }

    #[test]
    fn test_read_write_roundtrip_per_type() {
        let mut memory = DataMemory::new(6);
        memory.write::<f64>(0, 3.25);
        memory.write::<u8>(2, 200);
        memory.write::<i64>(3, -7);
        memory.write::<f32>(5, 0.5);
        assert_eq!(memory.read::<f64>(0), 3.25);
        assert_eq!(memory.read::<u8>(2), 200);
        assert_eq!(memory.read::<i64>(3), -7);
        assert_eq!(memory.read::<f32>(5), 0.5);
    }

    #[test]
    fn test_out_of_range_access_is_harmless() {
        let mut memory = DataMemory::new(1);
        memory.write::<f64>(0, 1.0);
        assert_eq!(memory.read::<f64>(0), 0.0);
        assert_eq!(memory.read::<u32>(7), 0);
        assert!(memory.read_value(TypeTag::Int8, 3).is_none());
    }

    #[test]
    fn test_pointer_slot() {
        let mut target = 5.0f64;
        let mut memory = DataMemory::new(POINTER_WORDS);
        let pointer = (&mut target as *mut f64).cast::<u8>();
        memory.write_pointer(0, pointer);
        assert_eq!(memory.read_pointer(0), pointer);
    }
}
