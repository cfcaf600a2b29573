//! Auth change notification channel.
//!
//! Replaces the ambient window events of the original web client with an
//! explicit publish/subscribe handle owned by the session manager. Views
//! subscribe on mount and drop the receiver on unmount; the cross-tab
//! storage notification becomes an ordinary event published by whatever
//! shell watches the shared credential file.

use tokio::sync::broadcast;

/// Authentication-related notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// Credentials changed in this process (login, logout).
    Changed,
    /// The shared credential storage changed externally.
    StorageChanged,
}

/// Broadcast handle for auth events.
///
/// Cloning shares the underlying channel. Publishing with no live
/// subscribers is not an error; lagged subscribers skip missed events and
/// keep receiving.
#[derive(Clone)]
pub struct AuthEvents {
    sender: broadcast::Sender<AuthEvent>,
}

impl AuthEvents {
    const CAPACITY: usize = 16;

    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(Self::CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: AuthEvent) {
        // Err means no receivers, which is fine.
        let _ = self.sender.send(event);
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}
