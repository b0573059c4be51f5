//! Growable bitmap of 64-bit words.
//!
//! Used to track which slots of an entity table or component list are in
//! use. The map only grows when a bit past the end is set, and
//! [`BitMap::compact`] drops trailing words that became empty.

/// Number of bits held by one word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// A dense, growable set of slot indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitMap {
    words: Vec<u64>,
}

impl BitMap {
    /// Create an empty bitmap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated words.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Number of bits addressable without growing.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// The raw word at `index`, or `0` past the end.
    #[must_use]
    pub fn word(&self, index: usize) -> u64 {
        self.words.get(index).copied().unwrap_or(0)
    }

    /// Returns the bit at `index`. Bits past the end read as unset.
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        self.word(index / WORD_BITS) & (1 << (index % WORD_BITS)) != 0
    }

    /// Set or clear the bit at `index`, growing the map when setting past
    /// the end.
    pub fn set(&mut self, index: usize, value: bool) {
        let word = index / WORD_BITS;
        let mask = 1u64 << (index % WORD_BITS);
        if value {
            if word >= self.words.len() {
                self.words.resize(word + 1, 0);
            }
            self.words[word] |= mask;
        } else if let Some(slot) = self.words.get_mut(word) {
            *slot &= !mask;
        }
    }

    /// Index of the lowest unset bit. When every allocated bit is set this
    /// is [`BitMap::capacity`], the first bit of the next word.
    #[must_use]
    pub fn find_first_unset(&self) -> usize {
        self.words
            .iter()
            .enumerate()
            .find(|&(_, &word)| word != u64::MAX)
            .map_or(self.capacity(), |(i, &word)| {
                i * WORD_BITS + (!word).trailing_zeros() as usize
            })
    }

    /// Append one empty word. Returns the number of bits added.
    pub fn expand(&mut self) -> usize {
        self.words.push(0);
        WORD_BITS
    }

    /// Drop trailing empty words. Returns the number of bits removed.
    pub fn compact(&mut self) -> usize {
        let mut removed = 0;
        while self.words.last() == Some(&0) {
            self.words.pop();
            removed += WORD_BITS;
        }
        removed
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate the indices of set bits in ascending order.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }
}
