/// Handle for one pending animation-frame request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FrameRequestId(u64);

/// One-shot "next display refresh" requests.
///
/// The runtime drains due requests once per redraw with [`take_due`] and
/// dispatches them; anything requested during dispatch waits for the next
/// refresh. Ids are never reused, so a stale id can never cancel a newer
/// request.
///
/// [`take_due`]: FrameScheduler::take_due
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Vec<FrameRequestId>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a callback for the next refresh.
    pub fn request_frame(&mut self) -> FrameRequestId {
        self.next_id += 1;
        let id = FrameRequestId(self.next_id);
        self.pending.push(id);
        id
    }

    /// Cancels a pending request.
    ///
    /// Returns `false` for ids that already fired, were already cancelled or
    /// never existed. Never fails.
    pub fn cancel_frame(&mut self, id: FrameRequestId) -> bool {
        match self.pending.iter().position(|&p| p == id) {
            Some(i) => {
                self.pending.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: FrameRequestId) -> bool {
        self.pending.contains(&id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drains the requests due this refresh, in request order.
    pub fn take_due(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.pending)
    }
}
