//! Parent/child resolution and traversal order for bone lists.
//!
//! Bone lists are not required to list parents before children, so every
//! consumer that walks the hierarchy goes through [`Hierarchy::order`].

use hashbrown::HashMap;

use crate::error::SkeletonError;

#[derive(Debug, Clone)]
pub struct Hierarchy {
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    order: Vec<usize>,
}

impl Hierarchy {
    /// Build from parent indices. `names` is used for error messages only.
    pub fn from_parent_indices(
        names: &[&str],
        parents: Vec<Option<usize>>,
    ) -> Result<Self, SkeletonError> {
        let count = parents.len();
        let mut children = vec![Vec::new(); count];
        let mut roots = Vec::new();

        for (i, parent) in parents.iter().enumerate() {
            match *parent {
                None => roots.push(i),
                Some(p) if p >= count => {
                    return Err(SkeletonError::ParentIndexOutOfRange {
                        bone: names[i].to_string(),
                        index: p,
                        count,
                    });
                }
                Some(p) => children[p].push(i),
            }
        }

        // Depth-first from every root, children in list order. Anything not
        // reached hangs off a cycle.
        let mut order = Vec::with_capacity(count);
        let mut visited = vec![false; count];
        for &root in &roots {
            let mut stack = vec![root];
            while let Some(bone) = stack.pop() {
                if visited[bone] {
                    continue;
                }
                visited[bone] = true;
                order.push(bone);
                stack.extend(children[bone].iter().rev());
            }
        }

        if let Some(bone) = visited.iter().position(|v| !v) {
            return Err(SkeletonError::Cycle(names[bone].to_string()));
        }

        Ok(Self {
            parents,
            children,
            roots,
            order,
        })
    }

    /// Build from parent names, rejecting duplicate names and unknown parents.
    pub fn from_parent_names(
        names: &[&str],
        parents: &[Option<&str>],
    ) -> Result<Self, SkeletonError> {
        let mut index_of = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index_of.insert(*name, i).is_some() {
                return Err(SkeletonError::DuplicateBone(name.to_string()));
            }
        }

        let parent_indices = names
            .iter()
            .zip(parents)
            .map(|(name, parent)| match parent {
                None => Ok(None),
                Some(parent) => index_of.get(parent).copied().map(Some).ok_or_else(|| {
                    SkeletonError::MissingParent {
                        bone: name.to_string(),
                        parent: parent.to_string(),
                    }
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_parent_indices(names, parent_indices)
    }

    pub fn parent(&self, bone: usize) -> Option<usize> {
        self.parents[bone]
    }

    pub fn children(&self, bone: usize) -> &[usize] {
        &self.children[bone]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Every bone exactly once, each parent before its children.
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}
