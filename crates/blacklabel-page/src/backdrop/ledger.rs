use blacklabel_engine::gfx::{Engine, Resource};

/// Every disposable resource a mount created, in creation order.
///
/// Releasing drains the ledger, so a second release disposes nothing.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    held: Vec<Resource>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, resource: impl Into<Resource>) {
        self.held.push(resource.into());
    }

    pub fn resources(&self) -> &[Resource] {
        &self.held
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Disposes everything in reverse creation order and returns how many
    /// disposals succeeded. Failures are logged; the entry is dropped either
    /// way.
    pub fn release_all(&mut self, engine: &mut dyn Engine) -> usize {
        let mut released = 0;
        while let Some(resource) = self.held.pop() {
            match engine.dispose(resource) {
                Ok(()) => released += 1,
                Err(err) => log::warn!("could not dispose {resource}: {err}"),
            }
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blacklabel_engine::gfx::{Geometry, HeadlessEngine, StandardMaterial};

    #[test]
    fn releases_in_reverse_order_once() {
        let mut engine = HeadlessEngine::new();
        let mut ledger = ResourceLedger::new();
        let g = engine.create_geometry(Geometry::Plane { width: 1.0, height: 1.0 }).unwrap();
        let m = engine.create_material(StandardMaterial::default()).unwrap();
        ledger.record(g);
        ledger.record(m);

        assert_eq!(ledger.release_all(&mut engine), 2);
        assert_eq!(engine.disposed(), &[Resource::from(m), Resource::from(g)]);
        assert!(ledger.is_empty());

        assert_eq!(ledger.release_all(&mut engine), 0);
        assert_eq!(engine.disposed_count(), 2);
    }

    #[test]
    fn failed_disposal_is_not_counted() {
        let mut engine = HeadlessEngine::new();
        let g = engine.create_geometry(Geometry::Plane { width: 1.0, height: 1.0 }).unwrap();
        engine.dispose(g.into()).unwrap();

        let mut ledger = ResourceLedger::new();
        ledger.record(g);
        assert_eq!(ledger.release_all(&mut engine), 0);
        assert!(ledger.is_empty());
    }
}
