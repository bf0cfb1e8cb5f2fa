use indexmap::IndexMap;

use super::item::Item;
use crate::tracker::TreeIndex;

/// Error type for structural tree edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("duplicate item id: {0}")]
    DuplicateId(String),
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("unknown parent: {0}")]
    UnknownParent(String),
    #[error("index {index} out of range for {len} siblings")]
    IndexOutOfRange { index: usize, len: usize },
}

/// An ordered forest of items keyed by id.
///
/// Parents are always inserted before their children and moves are checked
/// against the moved item's subtree (see `ops::reorder`), so the forest stays
/// acyclic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTree {
    items: IndexMap<String, Item>,
    roots: Vec<String>,
}

impl ItemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new item as the last child of `parent` (or the last root).
    pub fn push(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        parent: Option<&str>,
    ) -> Result<&mut Item, TreeError> {
        let id = id.into();
        if self.items.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }
        match parent {
            None => self.roots.push(id.clone()),
            Some(p) => self
                .items
                .get_mut(p)
                .ok_or_else(|| TreeError::UnknownParent(p.to_string()))?
                .children
                .push(id.clone()),
        }
        let item = Item::new(id.clone(), title, parent.map(str::to_string));
        let (slot, _) = self.items.insert_full(id, item);
        Ok(&mut self.items[slot])
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Every item with its depth, in display order (parents before children).
    pub fn depth_first(&self) -> Vec<(usize, &Item)> {
        let mut out = Vec::with_capacity(self.items.len());
        self.walk(&self.roots, 0, &mut out);
        out
    }

    fn walk<'a>(&'a self, ids: &[String], depth: usize, out: &mut Vec<(usize, &'a Item)>) {
        for id in ids {
            if let Some(item) = self.items.get(id) {
                out.push((depth, item));
                self.walk(&item.children, depth + 1, out);
            }
        }
    }

    /// Remove `id` from its sibling list, returning its former slot. The item
    /// and its subtree stay in the map, unattached until `attach` is called.
    pub(crate) fn detach(&mut self, id: &str) -> Result<(Option<String>, usize), TreeError> {
        let parent = self
            .items
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))?
            .parent_id
            .clone();
        let siblings = self.siblings_mut(parent.as_deref())?;
        let index = siblings
            .iter()
            .position(|s| s == id)
            .ok_or_else(|| TreeError::NotFound(id.to_string()))?;
        siblings.remove(index);
        Ok((parent, index))
    }

    /// Insert a detached item into `parent`'s children at `index`.
    pub(crate) fn attach(
        &mut self,
        id: &str,
        parent: Option<&str>,
        index: usize,
    ) -> Result<(), TreeError> {
        if !self.items.contains_key(id) {
            return Err(TreeError::NotFound(id.to_string()));
        }
        let siblings = self.siblings_mut(parent)?;
        if index > siblings.len() {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: siblings.len(),
            });
        }
        siblings.insert(index, id.to_string());
        if let Some(item) = self.items.get_mut(id) {
            item.parent_id = parent.map(str::to_string);
        }
        Ok(())
    }

    fn siblings_mut(&mut self, parent: Option<&str>) -> Result<&mut Vec<String>, TreeError> {
        match parent {
            None => Ok(&mut self.roots),
            Some(p) => self
                .items
                .get_mut(p)
                .map(|item| &mut item.children)
                .ok_or_else(|| TreeError::UnknownParent(p.to_string())),
        }
    }
}

impl TreeIndex for ItemTree {
    fn parent_of(&self, id: &str) -> Option<Option<&str>> {
        self.items.get(id).map(|item| item.parent_id.as_deref())
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        let item = self.items.get(id)?;
        self.children_of(item.parent_id.as_deref())
            .iter()
            .position(|s| s == id)
    }

    fn children_of(&self, parent: Option<&str>) -> &[String] {
        match parent {
            None => &self.roots,
            Some(p) => self
                .items
                .get(p)
                .map(|item| item.children.as_slice())
                .unwrap_or(&[]),
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }
}
