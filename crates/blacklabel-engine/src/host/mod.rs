//! Host environment services.
//!
//! The page runs inside a small single-threaded host that mirrors what a
//! browser offers an embedded animation:
//! - [`FrameScheduler`]: cancellable "call me on the next refresh" requests
//! - [`ResizeSignal`]: viewport resize subscriptions
//! - [`Container`]: a laid-out box that owns an ordered list of rendering
//!   surfaces
//!
//! The host is shared as [`HostHandle`]. Callers must not hold a borrow across
//! a dispatch into a component, since components borrow it themselves.

mod container;
mod resize;
mod scheduler;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::coords::{Rect, Viewport};
use crate::gfx::RendererId;

pub use container::{Container, ContainerId};
pub use resize::{ListenerId, ResizeSignal};
pub use scheduler::{FrameRequestId, FrameScheduler};

/// Shared, single-threaded host handle.
pub type HostHandle = Rc<RefCell<Host>>;

#[derive(Debug, Default)]
pub struct Host {
    viewport: Viewport,
    pub frames: FrameScheduler,
    pub resize: ResizeSignal,
    containers: HashMap<ContainerId, Container>,
    next_container: u64,
}

impl Host {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport, ..Self::default() }
    }

    /// Convenience constructor for the shared handle.
    pub fn shared(viewport: Viewport) -> HostHandle {
        Rc::new(RefCell::new(Self::new(viewport)))
    }

    /// Current viewport in logical pixels.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Records a new viewport and returns every listener to notify.
    ///
    /// Every call notifies, even when the size did not change.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Vec<ListenerId> {
        self.viewport = viewport;
        self.resize.listeners()
    }

    /// Registers a container laid out at `rect`.
    pub fn insert_container(&mut self, rect: Rect) -> ContainerId {
        self.next_container += 1;
        let id = ContainerId(self.next_container);
        self.containers.insert(id, Container::new(rect));
        id
    }

    pub fn remove_container(&mut self, id: ContainerId) -> Option<Container> {
        self.containers.remove(&id)
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn container_mut(&mut self, id: ContainerId) -> Option<&mut Container> {
        self.containers.get_mut(&id)
    }

    /// Rect of the container currently holding `surface`, if any.
    pub fn surface_region(&self, surface: RendererId) -> Option<Rect> {
        self.containers
            .values()
            .find(|c| c.children().contains(&surface))
            .map(|c| c.rect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_viewport_notifies_every_listener_every_time() {
        let mut host = Host::new(Viewport::new(800.0, 600.0));
        let a = host.resize.subscribe();
        let b = host.resize.subscribe();

        assert_eq!(host.set_viewport(Viewport::new(1024.0, 768.0)), vec![a, b]);
        // Same size again still notifies.
        assert_eq!(host.set_viewport(Viewport::new(1024.0, 768.0)), vec![a, b]);
        assert_eq!(host.viewport(), Viewport::new(1024.0, 768.0));
    }

    #[test]
    fn unsubscribed_listener_is_not_notified() {
        let mut host = Host::new(Viewport::new(800.0, 600.0));
        let a = host.resize.subscribe();
        let b = host.resize.subscribe();
        host.resize.unsubscribe(a);

        assert_eq!(host.set_viewport(Viewport::new(640.0, 480.0)), vec![b]);
    }

    #[test]
    fn containers_are_addressable_until_removed() {
        let mut host = Host::default();
        let id = host.insert_container(Rect::new(0.0, 0.0, 1024.0, 768.0));
        assert_eq!(
            host.container(id).map(|c| c.measured_size()),
            Some(Viewport::new(1024.0, 768.0))
        );

        assert!(host.remove_container(id).is_some());
        assert!(host.container(id).is_none());
        assert!(host.container_mut(id).is_none());
    }

    #[test]
    fn surface_region_follows_the_hosting_container() {
        let mut host = Host::default();
        let rect = Rect::new(0.0, 64.0, 1024.0, 614.4);
        let id = host.insert_container(rect);
        let surface = RendererId(7);
        assert_eq!(host.surface_region(surface), None);

        host.container_mut(id).unwrap().append_child(surface);
        assert_eq!(host.surface_region(surface), Some(rect));
    }

    #[test]
    fn container_ids_are_not_reused() {
        let mut host = Host::default();
        let a = host.insert_container(Rect::default());
        host.remove_container(a);
        let b = host.insert_container(Rect::default());
        assert_ne!(a, b);
    }
}
