//! Disjoint-set partition of pixel ids
//!
//! Every root owns the exact list of its member ids. Union is by size:
//! the larger region absorbs the smaller, and on a tie the second
//! argument survives. Lookups compress paths, which only shortens the
//! parent chain and never moves membership.

use crate::error::{RegionError, RegionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    /// A live region of the given size
    Root(usize),
    /// An absorbed id pointing towards its region
    Parent(usize),
}

/// Union-find store over `0..len` with explicit membership lists.
#[derive(Debug, Clone)]
pub struct Partition {
    links: Vec<Link>,
    members: Vec<Vec<usize>>,
    live: usize,
}

impl Partition {
    /// Create `len` singleton regions.
    pub fn new(len: usize) -> Self {
        Self {
            links: vec![Link::Root(1); len],
            members: (0..len).map(|id| vec![id]).collect(),
            live: len,
        }
    }

    /// Number of ids in the store.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Number of regions not yet absorbed.
    pub fn live_region_count(&self) -> usize {
        self.live
    }

    fn check(&self, id: usize) -> RegionResult<()> {
        if id >= self.links.len() {
            return Err(RegionError::OutOfRange {
                id,
                len: self.links.len(),
            });
        }
        Ok(())
    }

    /// Whether `id` is the root of a live region. Out-of-range ids are not.
    pub fn is_root(&self, id: usize) -> bool {
        matches!(self.links.get(id), Some(Link::Root(_)))
    }

    /// Size of the region rooted at `root`.
    pub fn size(&self, root: usize) -> RegionResult<usize> {
        self.check(root)?;
        match self.links[root] {
            Link::Root(size) => Ok(size),
            Link::Parent(_) => Err(RegionError::NotARoot { id: root }),
        }
    }

    /// Root of the region containing `id`, compressing the path behind it.
    ///
    /// # Arguments
    ///
    /// * `id` - Any id in `0..len()`
    ///
    /// # Returns
    ///
    /// The live root whose region holds `id`, or [`RegionError::OutOfRange`].
    pub fn find(&mut self, id: usize) -> RegionResult<usize> {
        let root = self.root_of(id)?;

        let mut current = id;
        while let Link::Parent(next) = self.links[current] {
            self.links[current] = Link::Parent(root);
            current = next;
        }

        Ok(root)
    }

    /// Root of the region containing `id`, without touching the store.
    pub fn root_of(&self, id: usize) -> RegionResult<usize> {
        self.check(id)?;
        let mut current = id;
        while let Link::Parent(next) = self.links[current] {
            current = next;
        }
        Ok(current)
    }

    /// Merge two live regions and return the surviving root.
    ///
    /// The larger region survives; on equal sizes `root2` absorbs `root1`.
    ///
    /// # Errors
    ///
    /// [`RegionError::OutOfRange`] for ids outside the store,
    /// [`RegionError::SelfUnion`] when both ids are equal and
    /// [`RegionError::NotARoot`] when either id has been absorbed.
    pub fn union(&mut self, root1: usize, root2: usize) -> RegionResult<usize> {
        self.check(root1)?;
        self.check(root2)?;
        if root1 == root2 {
            return Err(RegionError::SelfUnion { id: root1 });
        }
        let size1 = self.size(root1)?;
        let size2 = self.size(root2)?;

        let (survivor, absorbed) = if size1 > size2 {
            (root1, root2)
        } else {
            (root2, root1)
        };

        self.links[survivor] = Link::Root(size1 + size2);
        self.links[absorbed] = Link::Parent(survivor);
        let moved = std::mem::take(&mut self.members[absorbed]);
        self.members[survivor].extend(moved);
        self.live -= 1;

        Ok(survivor)
    }

    /// Member ids of the region rooted at `root`.
    ///
    /// An absorbed id owns no members, so its list is empty.
    pub fn members(&self, root: usize) -> RegionResult<&[usize]> {
        self.check(root)?;
        Ok(&self.members[root])
    }

    /// Live roots in ascending id order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(id, link)| matches!(link, Link::Root(_)).then_some(id))
    }
}
