use crate::Vec;
use crate::memory::{DataWord, bytes_to_words, words_to_bytes};
use crate::types::{Numeric, TypeTag, Value};

/// The evaluation stack: a fixed word buffer with a running offset.
///
/// The buffer is sized once, by the compiler, to the deepest point the
/// program can reach. Values take `T::WORDS` words each, so a `uint8` still
/// takes a full word.
///
/// The offset is signed and is allowed to leave `[0, capacity]`. Accesses
/// that would fall outside the buffer read zero and write nothing, which lets
/// the safe executor notice the violation after the instruction instead of
/// corrupting memory.
///
/// # Examples
///
/// ```ignore
/// use rteval_core::vm::Stack;
///
/// let mut stack = Stack::new(3);
/// stack.push(1.5f64);
/// stack.push(7u8);
/// assert_eq!(stack.pop::<u8>(), 7);
/// assert_eq!(stack.pop::<f64>(), 1.5);
/// assert_eq!(stack.offset(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Stack {
    /// The underlying storage.
    words: Vec<DataWord>,
    /// Offset of the first free word.
    top: isize,
}

impl Stack {
    /// Creates a zeroed stack of `capacity` words.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use rteval_core::vm::Stack;
    ///
    /// let stack = Stack::new(4);
    /// assert_eq!(stack.capacity(), 4);
    /// assert_eq!(stack.offset(), 0);
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity],
            top: 0,
        }
    }

    /// Pushes a value, advancing the offset by `T::WORDS`.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use rteval_core::vm::Stack;
    ///
    /// let mut stack = Stack::new(2);
    /// stack.push(42i64);
    /// assert_eq!(stack.offset(), 2);
    /// ```
    #[inline]
    pub fn push<T: Numeric>(&mut self, value: T) {
        if let Some(words) = self.slot_mut(self.top, T::WORDS) {
            bytes_to_words(value.to_bytes(), words);
        }
        self.top += T::WORDS as isize;
    }

    /// Retreats the offset by `T::WORDS` and reads the value found there.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use rteval_core::vm::Stack;
    ///
    /// let mut stack = Stack::new(1);
    /// stack.push(-3i32);
    /// assert_eq!(stack.pop::<i32>(), -3);
    /// ```
    #[inline]
    pub fn pop<T: Numeric>(&mut self) -> T {
        self.top -= T::WORDS as isize;
        self.read_at(self.top)
    }

    /// Reads the `T` that ends `words_below` words under the top, without
    /// moving the offset.
    ///
    /// `peek::<T>(0)` is the value a `pop::<T>()` would return.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use rteval_core::vm::Stack;
    ///
    /// let mut stack = Stack::new(3);
    /// stack.push(2.0f64);
    /// stack.push(9u16);
    /// assert_eq!(stack.peek::<u16>(0), 9);
    /// assert_eq!(stack.peek::<f64>(1), 2.0);
    /// ```
    #[inline]
    pub fn peek<T: Numeric>(&self, words_below: usize) -> T {
        self.read_at(self.top - (words_below + T::WORDS) as isize)
    }

    /// [`Stack::peek`] for a type only known at runtime.
    pub fn peek_value(&self, tag: TypeTag, words_below: usize) -> Option<Value> {
        crate::with_numeric_type!(
            tag,
            T => Some(self.peek::<T>(words_below).into_value()),
            void => None
        )
    }

    /// Number of words the buffer holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len()
    }

    /// Current offset in words from the base.
    #[inline]
    pub fn offset(&self) -> isize {
        self.top
    }

    /// Whether the offset is inside `[0, capacity]`.
    #[inline]
    pub fn in_bounds(&self) -> bool {
        self.top >= 0 && self.top as usize <= self.words.len()
    }

    /// Moves the offset back to the base. Contents are left in place.
    #[inline]
    pub fn reset(&mut self) {
        self.top = 0;
    }

    pub fn as_slice(&self) -> &[DataWord] {
        &self.words
    }

    /// Shrinks the buffer to `capacity` words.
    pub(crate) fn truncate(&mut self, capacity: usize) {
        self.words.truncate(capacity);
    }

    fn read_at<T: Numeric>(&self, start: isize) -> T {
        if start < 0 {
            return T::default();
        }
        let start = start as usize;
        match self.words.get(start..start + T::WORDS) {
            Some(words) => T::from_bytes(words_to_bytes(words)),
            None => T::default(),
        }
    }

    fn slot_mut(&mut self, start: isize, len: usize) -> Option<&mut [DataWord]> {
        if start < 0 {
            return None;
        }
        let start = start as usize;
        self.words.get_mut(start..start + len)
    }
}
