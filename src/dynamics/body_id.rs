use std::fmt;

/// The handle of a rigid body inside of a [`Physics`](crate::dynamics::Physics) instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyId(u64);

impl BodyId {
    /// The raw value of this handle.
    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues unique [`BodyId`]s.
///
/// Each simulation owns its allocator: identifiers are unique within one
/// allocator only.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// An allocator whose first identifier is `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new identifier, never returned before by this allocator.
    pub fn allocate(&mut self) -> BodyId {
        let id = BodyId(self.next);
        self.next += 1;
        id
    }

    /// The number of identifiers issued so far.
    #[inline]
    pub fn num_allocated(&self) -> u64 {
        self.next
    }
}
