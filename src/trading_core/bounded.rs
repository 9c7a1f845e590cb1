//! Fixed-capacity zone collections
//!
//! Candidates past capacity are dropped, never evicting older entries.

/// Maximum gaps or zones tracked per side per session
pub const MAX_ZONES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct BoundedZones<T, const N: usize> {
    items: Vec<T>,
}

impl<T, const N: usize> BoundedZones<T, N> {
    pub fn new() -> Self {
        Self {
            items: Vec::with_capacity(N),
        }
    }

    /// Append if there is room. Returns false when the item was dropped.
    pub fn try_push(&mut self, item: T) -> bool {
        if self.items.len() >= N {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove every item matching `filled`, keeping the order of the rest.
    /// Returns how many were removed.
    pub fn remove_where<F>(&mut self, mut filled: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|item| !filled(item));
        before - self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T, const N: usize> Default for BoundedZones<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
