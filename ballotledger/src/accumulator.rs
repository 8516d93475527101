use crate::*;
use std::collections::VecDeque;

/// Deepest supported tree: 2^20 = 1,048,576 voters
pub const MAX_DEPTH: usize = 20;

/// Largest voter capacity an election can declare
pub const MAX_CAPACITY: u32 = 1 << MAX_DEPTH;

/// Pick a tree depth for the declared voter ceiling.
///
/// Depths are bucketed so that proofs stay short for small elections.
/// Returns `None` for a zero capacity or one beyond [`MAX_CAPACITY`].
pub fn depth_for_capacity(capacity: u32) -> Option<usize> {
    match capacity {
        0 => None,
        1..=1024 => Some(10),
        1025..=4096 => Some(12),
        4097..=16384 => Some(14),
        c if c <= MAX_CAPACITY => Some(MAX_DEPTH),
        _ => None,
    }
}

/// Hashes of empty subtrees, indexed by level. `zero_hashes(d)[d]` is the
/// root of an empty tree of depth `d`.
pub fn zero_hashes(depth: usize) -> Vec<Hash32> {
    let mut zeros = Vec::with_capacity(depth + 1);
    zeros.push(Hash32::default());
    for level in 0..depth {
        let below = zeros[level];
        zeros.push(hash_pair(&below, &below));
    }
    zeros
}

/// Root of an empty tree of the given depth
pub fn empty_root(depth: usize) -> Hash32 {
    zero_hashes(depth)[depth]
}

/// Sibling path from a leaf up to the root
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MembershipProof {
    pub leaf_index: u32,
    pub siblings: Vec<Hash32>,
}

/// Check that `leaf` sits at `leaf_index` in the tree committed to by `root`.
///
/// Bit `i` of the index says whether the running hash is the right (1) or
/// left (0) child at level `i`. An index with bits above the proof length is
/// rejected, otherwise two indices would verify for the same path.
pub fn verify_membership(leaf: &Hash32, proof: &[Hash32], leaf_index: u32, root: &Hash32) -> bool {
    let index_fits = proof.len() >= 32 || leaf_index >> proof.len() == 0;
    if !index_fits {
        return false;
    }

    let mut computed = *leaf;
    let mut index = leaf_index;
    for sibling in proof {
        computed = if index % 2 == 0 {
            hash_pair(&computed, sibling)
        } else {
            hash_pair(sibling, &computed)
        };
        index /= 2;
    }

    computed == *root
}

/// Append-only fixed-depth Merkle accumulator of admitted voters.
///
/// Nodes live in one flat array per level; positions that were never
/// written read as the empty-subtree hash for that level. Only the root and
/// the leaf count are meant for public display.
#[derive(Clone, Debug)]
pub struct Accumulator {
    depth: usize,
    capacity: u32,
    levels: Vec<Vec<Hash32>>,
    zeros: Vec<Hash32>,
    recent_roots: VecDeque<Hash32>,
    root_history_size: usize,
}

impl Accumulator {
    /// Create an empty accumulator sized for `capacity` leaves
    pub fn new(capacity: u32, root_history_size: usize) -> Result<Self, ValidationError> {
        let depth =
            depth_for_capacity(capacity).ok_or(ValidationError::InvalidCapacity(MAX_CAPACITY))?;

        Ok(Accumulator {
            depth,
            capacity,
            levels: vec![Vec::new(); depth + 1],
            zeros: zero_hashes(depth),
            recent_roots: VecDeque::new(),
            root_history_size,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of admitted leaves
    pub fn len(&self) -> u32 {
        self.levels[0].len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Current root
    pub fn root(&self) -> Hash32 {
        self.node(self.depth, 0)
    }

    /// Whether `root` is the current root or one of the recently replaced ones
    pub fn is_known_root(&self, root: &Hash32) -> bool {
        *root == self.root() || self.recent_roots.contains(root)
    }

    /// Append a leaf at the next free index.
    ///
    /// Returns the leaf index and the new root.
    pub fn append(&mut self, leaf: Hash32) -> Result<(u32, Hash32), ValidationError> {
        if self.is_full() {
            return Err(ValidationError::CapacityExceeded(self.capacity));
        }

        let leaf_index = self.len();
        let mut node = leaf;
        let mut position = leaf_index as usize;

        for level in 0..self.depth {
            self.set_node(level, position, node);
            node = if position % 2 == 0 {
                hash_pair(&node, &self.node(level, position + 1))
            } else {
                hash_pair(&self.node(level, position - 1), &node)
            };
            position /= 2;
        }
        self.set_node(self.depth, 0, node);

        if self.root_history_size > 0 {
            if self.recent_roots.len() == self.root_history_size {
                self.recent_roots.pop_front();
            }
            self.recent_roots.push_back(node);
        }

        Ok((leaf_index, node))
    }

    /// Build the membership proof for an admitted leaf against the current root
    pub fn proof(&self, leaf_index: u32) -> Option<MembershipProof> {
        if leaf_index >= self.len() {
            return None;
        }

        let mut position = leaf_index as usize;
        let mut siblings = Vec::with_capacity(self.depth);
        for level in 0..self.depth {
            siblings.push(self.node(level, position ^ 1));
            position /= 2;
        }

        Some(MembershipProof {
            leaf_index,
            siblings,
        })
    }

    /// Verify a proof for `leaf` against the current root or a remembered one.
    ///
    /// The proof must have exactly `depth` siblings and point at an admitted index.
    pub fn verify(&self, leaf: &Hash32, proof: &MembershipProof) -> bool {
        if proof.siblings.len() != self.depth || proof.leaf_index >= self.len() {
            return false;
        }

        let current = self.root();
        if verify_membership(leaf, &proof.siblings, proof.leaf_index, &current) {
            return true;
        }
        self.recent_roots
            .iter()
            .any(|root| verify_membership(leaf, &proof.siblings, proof.leaf_index, root))
    }

    fn node(&self, level: usize, position: usize) -> Hash32 {
        self.levels[level]
            .get(position)
            .copied()
            .unwrap_or(self.zeros[level])
    }

    fn set_node(&mut self, level: usize, position: usize, node: Hash32) {
        let nodes = &mut self.levels[level];
        if position == nodes.len() {
            nodes.push(node);
        } else {
            nodes[position] = node;
        }
    }
}
