use std::collections::HashSet;

/// Read-only view of an ordered item forest.
///
/// The tracker consults this for every validity check and position lookup and
/// never mutates it; reordering happens in the caller once a `MoveIntent` has
/// been emitted.
pub trait TreeIndex {
    /// Parent of `id`: `Some(None)` for a root item, `None` if `id` is unknown.
    fn parent_of(&self, id: &str) -> Option<Option<&str>>;

    /// Zero-based position of `id` among its siblings.
    fn index_of(&self, id: &str) -> Option<usize>;

    /// Children of `parent` in order (`None` is the root list). Unknown
    /// parents have no children.
    fn children_of(&self, parent: Option<&str>) -> &[String];

    fn contains(&self, id: &str) -> bool {
        self.parent_of(id).is_some()
    }

    /// Whether `candidate` sits strictly below `ancestor`, found by walking
    /// `candidate`'s parent chain up to the root. A repeated id ends the walk.
    fn is_descendant(&self, candidate: &str, ancestor: &str) -> bool {
        let mut seen = HashSet::new();
        let mut cursor = self.parent_of(candidate).flatten();
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            cursor = self.parent_of(id).flatten();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Index with a deliberate cycle (X <-> Y) to exercise the walk guard.
    struct Cyclic {
        parents: HashMap<String, String>,
    }

    impl TreeIndex for Cyclic {
        fn parent_of(&self, id: &str) -> Option<Option<&str>> {
            self.parents.get(id).map(|p| Some(p.as_str()))
        }

        fn index_of(&self, _id: &str) -> Option<usize> {
            Some(0)
        }

        fn children_of(&self, _parent: Option<&str>) -> &[String] {
            &[]
        }
    }

    #[test]
    fn cyclic_parent_chain_terminates() {
        let index = Cyclic {
            parents: HashMap::from([
                ("X".to_string(), "Y".to_string()),
                ("Y".to_string(), "X".to_string()),
            ]),
        };
        assert!(index.is_descendant("X", "Y"));
        assert!(!index.is_descendant("X", "Z"));
    }
}
