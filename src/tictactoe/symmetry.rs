//! D4 symmetry group operations for board canonicalization

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::State;

/// Index permutations in fixed enumeration order.
///
/// A transformed state is read through the permutation:
/// `transformed[i] = original[PERMUTATIONS[t][i]]`.
const PERMUTATIONS: [[usize; 9]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8], // identity
    [6, 3, 0, 7, 4, 1, 8, 5, 2], // rotate 90
    [8, 7, 6, 5, 4, 3, 2, 1, 0], // rotate 180
    [2, 5, 8, 1, 4, 7, 0, 3, 6], // rotate 270
    [2, 1, 0, 5, 4, 3, 8, 7, 6], // mirror across the vertical axis
    [6, 7, 8, 3, 4, 5, 0, 1, 2], // mirror across the horizontal axis
    [0, 3, 6, 1, 4, 7, 2, 5, 8], // main diagonal
    [8, 5, 2, 7, 4, 1, 6, 3, 0], // anti diagonal
];

const fn invert(perm: &[usize; 9]) -> [usize; 9] {
    let mut inverse = [0; 9];
    let mut i = 0;
    while i < 9 {
        inverse[perm[i]] = i;
        i += 1;
    }
    inverse
}

const INVERSES: [[usize; 9]; 8] = [
    invert(&PERMUTATIONS[0]),
    invert(&PERMUTATIONS[1]),
    invert(&PERMUTATIONS[2]),
    invert(&PERMUTATIONS[3]),
    invert(&PERMUTATIONS[4]),
    invert(&PERMUTATIONS[5]),
    invert(&PERMUTATIONS[6]),
    invert(&PERMUTATIONS[7]),
];

/// D4 symmetry transformation (dihedral group of the square)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct D4Transform(u8);

impl D4Transform {
    pub const COUNT: usize = 8;

    /// Create identity transform
    pub fn identity() -> Self {
        D4Transform(0)
    }

    /// Transform by enumeration index (0-7)
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then_some(D4Transform(index as u8))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// All 8 transforms in enumeration order
    pub fn all() -> impl Iterator<Item = D4Transform> {
        (0..Self::COUNT as u8).map(D4Transform)
    }

    pub fn permutation(&self) -> &'static [usize; 9] {
        &PERMUTATIONS[self.index()]
    }

    /// Apply transform to nine cells: `out[i] = cells[perm[i]]`
    pub fn apply_to_cells<T: Copy>(&self, cells: &[T; 9]) -> [T; 9] {
        let perm = self.permutation();
        std::array::from_fn(|i| cells[perm[i]])
    }

    /// Where an original-orientation action lands in the transformed board
    pub fn action_to_canonical(&self, action: usize) -> usize {
        INVERSES[self.index()][action]
    }

    /// Which original-orientation cell a transformed-board action refers to
    pub fn action_from_canonical(&self, action: usize) -> usize {
        PERMUTATIONS[self.index()][action]
    }
}

impl fmt::Display for D4Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            0 => "identity",
            1 => "rot90",
            2 => "rot180",
            3 => "rot270",
            4 => "mirror-vertical",
            5 => "mirror-horizontal",
            6 => "diagonal",
            _ => "anti-diagonal",
        };
        f.write_str(name)
    }
}

/// Cached result of canonicalization for repeated action mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalContext {
    /// The canonical state
    pub state: State,
    /// The transform that maps the original state to the canonical state
    pub transform: D4Transform,
}

impl CanonicalContext {
    /// Map a move from original coordinates to canonical coordinates
    pub fn map_move_to_canonical(&self, original_move: usize) -> usize {
        self.transform.action_to_canonical(original_move)
    }

    /// Map a move from canonical coordinates back to original coordinates
    pub fn map_canonical_to_original(&self, canonical_move: usize) -> usize {
        self.transform.action_from_canonical(canonical_move)
    }
}

impl State {
    /// Apply a D4 transform to the state
    pub fn transform(&self, t: D4Transform) -> Self {
        State::from_raw(t.apply_to_cells(self.values()))
    }

    /// Lexicographically minimal image and the first transform producing it.
    pub fn canonical_context(&self) -> CanonicalContext {
        let mut best_state = *self;
        let mut best_transform = D4Transform::identity();

        for transform in D4Transform::all().skip(1) {
            let transformed = self.transform(transform);
            if transformed < best_state {
                best_state = transformed;
                best_transform = transform;
            }
        }

        CanonicalContext {
            state: best_state,
            transform: best_transform,
        }
    }

    /// Get the canonical (lexicographically minimal) form under D4 symmetry
    pub fn canonical(&self) -> Self {
        self.canonical_context().state
    }
}

/// Canonical representative of `state` and the transform that reaches it.
pub fn canonicalize(state: &State) -> (State, D4Transform) {
    let ctx = state.canonical_context();
    (ctx.state, ctx.transform)
}
