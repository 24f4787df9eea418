/// Handle for one resize subscription.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ListenerId(u64);

/// Viewport resize subscriptions.
///
/// No debouncing: the host reports every change to every listener.
#[derive(Debug, Default)]
pub struct ResizeSignal {
    next_id: u64,
    listeners: Vec<ListenerId>,
}

impl ResizeSignal {
    pub fn subscribe(&mut self) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push(id);
        id
    }

    /// Removes a subscription. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|&l| l != id);
        self.listeners.len() != before
    }

    pub fn is_subscribed(&self, id: ListenerId) -> bool {
        self.listeners.contains(&id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Snapshot of current listeners in subscription order.
    pub fn listeners(&self) -> Vec<ListenerId> {
        self.listeners.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_and_unsubscribe() {
        let mut r = ResizeSignal::default();
        let a = r.subscribe();
        assert!(r.is_subscribed(a));
        assert_eq!(r.listener_count(), 1);

        assert!(r.unsubscribe(a));
        assert!(!r.is_subscribed(a));
        assert_eq!(r.listener_count(), 0);
    }

    #[test]
    fn unsubscribe_twice_is_harmless() {
        let mut r = ResizeSignal::default();
        let a = r.subscribe();
        assert!(r.unsubscribe(a));
        assert!(!r.unsubscribe(a));
    }
}
