use std::collections::BTreeMap;

/// Id-keyed collection with a monotonic id counter.
///
/// Ids start at 1, are handed out in increasing order and are never reused.
/// Entries cannot be removed.
pub struct CrudStore<T> {
    entries: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Default for CrudStore<T> {
    fn default() -> Self {
        Self { entries: Default::default(), next_id: 1 }
    }
}

impl<T> CrudStore<T> {
    pub fn get(&self, id: u64) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Allocates the next id and stores whatever `build` makes of it.
    pub fn create(&mut self, build: impl FnOnce(u64) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.entry(id).or_insert(build(id))
    }

    /// Stores an entry under a caller-chosen id and moves the counter past it.
    /// Returns `false`, leaving the store untouched, if the id is taken.
    pub fn insert_with_id(&mut self, id: u64, entry: T) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, entry);
        self.next_id = self.next_id.max(id.saturating_add(1));
        true
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
