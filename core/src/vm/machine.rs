use crate::memory::{CodeWord, DataAddress, DataMemory};
use crate::status::Status;
use crate::types::Numeric;
use crate::vm::Stack;

/// Execution context handed to every operator function.
///
/// Operators pull their address operand with [`Machine::next_word`], move
/// values through the stack, and report questionable results with
/// [`Machine::raise`]. They never stop the program themselves.
pub struct Machine<'a> {
    code: &'a [CodeWord],
    cursor: usize,
    stack: &'a mut Stack,
    data: &'a mut DataMemory,
    status: Status,
}

impl<'a> Machine<'a> {
    pub fn new(code: &'a [CodeWord], stack: &'a mut Stack, data: &'a mut DataMemory) -> Self {
        Self {
            code,
            cursor: 0,
            stack,
            data,
            status: Status::empty(),
        }
    }

    /// Reads the next code word and advances the cursor.
    ///
    /// Reading past the end yields 0 and leaves the cursor past the end.
    #[inline]
    pub fn next_word(&mut self) -> CodeWord {
        let word = self.code.get(self.cursor).copied().unwrap_or(0);
        self.cursor += 1;
        word
    }

    #[inline]
    pub fn pop<T: Numeric>(&mut self) -> T {
        self.stack.pop()
    }

    #[inline]
    pub fn push<T: Numeric>(&mut self, value: T) {
        self.stack.push(value)
    }

    #[inline]
    pub fn peek<T: Numeric>(&self, words_below: usize) -> T {
        self.stack.peek(words_below)
    }

    #[inline]
    pub fn read<T: Numeric>(&self, address: DataAddress) -> T {
        self.data.read(address)
    }

    #[inline]
    pub fn write<T: Numeric>(&mut self, address: DataAddress, value: T) {
        self.data.write(address, value)
    }

    /// Reads through the caller-owned pointer stored at `address`.
    #[inline]
    pub fn read_external<T: Numeric>(&mut self, address: DataAddress) -> T {
        let pointer = self.data.read_pointer(address);
        if pointer.is_null() {
            self.raise(Status::FATAL_ERROR);
            return T::default();
        }
        // SAFETY: the pointer was bound through `set_*_variable_memory`, whose
        // contract requires it to stay valid for a `T` while programs run.
        unsafe { pointer.cast::<T>().read_unaligned() }
    }

    /// Writes through the caller-owned pointer stored at `address`.
    #[inline]
    pub fn write_external<T: Numeric>(&mut self, address: DataAddress, value: T) {
        let pointer = self.data.read_pointer(address);
        if pointer.is_null() {
            self.raise(Status::FATAL_ERROR);
            return;
        }
        // SAFETY: see `read_external`.
        unsafe { pointer.cast::<T>().write_unaligned(value) }
    }

    /// Accumulates `status` into the run status.
    #[inline]
    pub fn raise(&mut self, status: Status) {
        self.status |= status;
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor >= self.code.len()
    }

    pub fn code(&self) -> &'a [CodeWord] {
        self.code
    }

    pub fn stack(&self) -> &Stack {
        self.stack
    }

    pub fn data(&self) -> &DataMemory {
        self.data
    }
}
