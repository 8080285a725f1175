//! # Dictionary Snapshot
//!
//! In-memory copy of the key-value entries stored on a tag.
//!
//! ## Persisted Format
//!
//! Every key and every value is written followed by one `\n`, key first:
//!
//! ```text
//! name\nAda\nage\n36\n
//! ```
//!
//! There is no escaping: a `\n` inside a key or value splits it on the next
//! load. Text after the last terminator is ignored; a key without a value
//! loads with an empty value.

/// Terminator written after every key and value.
pub const LINE_TERMINATOR: u8 = b'\n';

/// One key-value pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Unique key.
    pub key: String,
    /// Associated value.
    pub value: String,
}

impl Entry {
    fn encoded_len(&self) -> usize {
        self.key.len() + self.value.len() + 2
    }
}

/// Ordered, unique-key entry list.
#[derive(Clone, Debug)]
pub struct DictionarySnapshot {
    entries: Vec<Entry>,
    growth_pairs: usize,
}

impl DictionarySnapshot {
    /// Create an empty snapshot with room for `initial_pairs` entries,
    /// growing by `growth_pairs` whenever full.
    pub fn new(initial_pairs: usize, growth_pairs: usize) -> Self {
        Self {
            entries: Vec::with_capacity(initial_pairs),
            growth_pairs: growth_pairs.max(1),
        }
    }

    /// Replace the contents with entries parsed from the persisted format.
    pub fn load_from(&mut self, bytes: &[u8]) {
        self.entries.clear();

        let mut pending_key: Option<String> = None;
        // the slice after the last terminator is an unterminated fragment
        let terminated = bytes.iter().filter(|b| **b == LINE_TERMINATOR).count();
        let fields = bytes.split(|b| *b == LINE_TERMINATOR).take(terminated);

        for field in fields {
            let text = String::from_utf8_lossy(field).into_owned();
            match pending_key.take() {
                None => pending_key = Some(text),
                Some(key) => self.push(Entry { key, value: text }),
            }
        }
        if let Some(key) = pending_key {
            self.push(Entry {
                key,
                value: String::new(),
            });
        }
    }

    /// Encode in the persisted format.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        for entry in &self.entries {
            out.extend_from_slice(entry.key.as_bytes());
            out.push(LINE_TERMINATOR);
            out.extend_from_slice(entry.value.as_bytes());
            out.push(LINE_TERMINATOR);
        }
        out
    }

    /// Size of [`serialize`](Self::serialize)'s output.
    pub fn serialized_len(&self) -> usize {
        self.entries.iter().map(Entry::encoded_len).sum()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `key`, first match in insertion order.
    pub fn find(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|i| self.entries[i].value.as_str())
    }

    /// Key of the `index`-th entry.
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.key.as_str())
    }

    /// Overwrite the value of an existing key in place, or append a new entry.
    ///
    /// Returns `true` when a new entry was appended.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match self.find(key) {
            Some(i) => {
                self.entries[i].value = value.to_owned();
                false
            }
            None => {
                self.push(Entry {
                    key: key.to_owned(),
                    value: value.to_owned(),
                });
                true
            }
        }
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.find(key).map(|i| self.entries.remove(i))
    }

    /// Forget all entries; the allocation is kept for the next load.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    fn push(&mut self, entry: Entry) {
        if self.entries.len() == self.entries.capacity() {
            self.entries.reserve_exact(self.growth_pairs);
        }
        self.entries.push(entry);
    }
}

impl Default for DictionarySnapshot {
    fn default() -> Self {
        Self::new(15, 15)
    }
}
