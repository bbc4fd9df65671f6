use tokio::sync::broadcast;
use uuid::Uuid;

const DEFAULT_CAPACITY: usize = 64;

/// A row-level change published after a successful store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    TaskInserted(Uuid),
    TaskUpdated(Uuid),
    TaskDeleted(Uuid),
    NoteInserted { task_id: Uuid, note_id: Uuid },
    NoteDeleted(Uuid),
}

/// Fan-out of [`StoreChange`] events to any number of subscribers.
///
/// Slow subscribers may miss events and observe
/// [`broadcast::error::RecvError::Lagged`] instead; that only ever means
/// "something changed".
#[derive(Clone, Debug)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<StoreChange>,
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.sender.subscribe()
    }

    #[tracing::instrument(skip(self))]
    pub fn publish(&self, change: StoreChange) {
        match self.sender.send(change) {
            Ok(receivers) => tracing::debug!("Change delivered to {} subscriber(s)", receivers),
            Err(_) => tracing::trace!("No subscribers for change"),
        }
    }
}
