//! ID types for particle systems.

use serde::{Deserialize, Serialize};

/// Stable handle for one particle-system instance.
///
/// Handles are allocated by whoever owns the systems (see
/// [`SystemIdAllocator`]); there is no process-wide counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SystemId(u64);

impl SystemId {
    /// Creates a system ID from a raw value.
    #[must_use]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Null/invalid system ID.
    pub const NULL: Self = Self(0);

    /// Checks if this is a valid (non-null) system ID.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for SystemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "system#{}", self.0)
    }
}

/// Hands out monotonically increasing [`SystemId`]s, starting at 1.
#[derive(Debug, Clone)]
pub struct SystemIdAllocator {
    next: u64,
}

impl Default for SystemIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl SystemIdAllocator {
    /// Creates a new allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next unused ID.
    pub fn allocate(&mut self) -> SystemId {
        let id = SystemId(self.next);
        self.next += 1;
        id
    }
}

/// Identifies the source image a particle system draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(u32);

impl ImageId {
    /// Creates an image ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Identifies a compiled shader owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShaderId(u32);

impl ShaderId {
    /// Creates a shader ID from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}
