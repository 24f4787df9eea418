use super::{DrawCmd, SortKey, ZIndex};

/// A single draw item: sort key + command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Recorded draw stream for a frame.
///
/// `push()` is O(1); paint-order iteration reuses an internal index buffer.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items, keeping capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey { z, order },
            cmd,
        });

        self.sorted_dirty = true;
    }

    /// Iterates items back-to-front without cloning commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.sorted_indices.clear();
            self.sorted_indices.extend(0..self.items.len());
            let items = &self.items;
            self.sorted_indices.sort_by_key(|&i| items[i].key);
            self.sorted_dirty = false;
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;

    fn z_of(list: &mut DrawList) -> Vec<(i32, u32)> {
        list.iter_in_paint_order().map(|i| (i.key.z.0, i.key.order)).collect()
    }

    #[test]
    fn paint_order_sorts_by_z_then_insertion() {
        let mut list = DrawList::new();
        let r = Rect::new(0.0, 0.0, 1.0, 1.0);
        list.push_rect(ZIndex::COPY, r, Color::WHITE);
        list.push_rect(ZIndex::BACKDROP, r, Color::BLACK);
        list.push_rect(ZIndex::COPY, r, Color::WHITE);

        assert_eq!(z_of(&mut list), vec![(-10, 1), (10, 0), (10, 2)]);
    }

    #[test]
    fn clear_resets_order() {
        let mut list = DrawList::new();
        list.push_rect(ZIndex::CHROME, Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.clear();
        assert!(list.is_empty());
        list.push_rect(ZIndex::CHROME, Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        assert_eq!(z_of(&mut list), vec![(0, 0)]);
    }
}
