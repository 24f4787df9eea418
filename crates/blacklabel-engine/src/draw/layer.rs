/// Paint layer of the page. Higher layers paint on top.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Scrims over the 3D backdrop.
    pub const BACKDROP: ZIndex = ZIndex(-10);
    /// Nav bar and buttons.
    pub const CHROME: ZIndex = ZIndex(0);
    pub const COPY: ZIndex = ZIndex(10);
}

/// Paint order of one item: layer first, then insertion order. Field order
/// matters for the derived `Ord`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    pub order: u32,
}
