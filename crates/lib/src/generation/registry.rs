//! Priority-ordered factory lists.

use std::fmt;
use std::rc::Rc;

/// Items kept in ascending priority order.
///
/// Ordering is fixed at insertion; items with equal priority keep their
/// registration order. Lookups scan from the lowest priority value up.
pub struct PriorityList<T: ?Sized> {
    entries: Vec<(i32, Rc<T>)>,
}

impl<T: ?Sized> PriorityList<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert after every entry with a priority less than or equal to
    /// `priority`.
    pub fn insert(&mut self, priority: i32, item: Rc<T>) {
        let at = self.entries.partition_point(|(p, _)| *p <= priority);
        self.entries.insert(at, (priority, item));
    }

    /// Items in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<T>> {
        self.entries.iter().map(|(_, item)| item)
    }

    /// Priorities in lookup order.
    pub fn priorities(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first `Some` produced by `f`, stopping at the first error.
    pub fn find_map<R, E>(
        &self,
        mut f: impl FnMut(&T) -> Result<Option<R>, E>,
    ) -> Result<Option<R>, E> {
        for (_, item) in &self.entries {
            if let Some(found) = f(&**item)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}

impl<T: ?Sized> Default for PriorityList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for PriorityList<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for PriorityList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.priorities()).finish()
    }
}
