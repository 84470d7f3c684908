use core::fmt;
use core::num::NonZeroU32;

/// Handle of a process unit (compressor, choke, recirculation loop, ...)
/// inside one process system.
///
/// Ids are handed out in insertion order by the system builder, nested
/// loops included, and stay valid for the life of the system. The niche
/// keeps `Option<UnitId>` at four bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(NonZeroU32);

impl UnitId {
    /// Id of the `index`-th unit added to a builder (0-based).
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Id of the unit added after this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.index())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}
