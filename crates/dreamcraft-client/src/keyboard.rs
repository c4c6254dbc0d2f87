//! Page-wide keyboard events.

use tokio::sync::broadcast;

/// A key press delivered to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Hub that fans key presses out to whoever is listening.
///
/// A listener is a [`broadcast::Receiver`]; dropping it unbinds the
/// listener. Presses with no listener are discarded.
#[derive(Debug, Clone)]
pub struct KeyboardHub {
    sender: broadcast::Sender<Key>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(32);
        Self { sender }
    }

    /// Deliver a key press to every current listener.
    pub fn press(&self, key: Key) {
        // No receivers just means nothing is bound right now.
        let _ = self.sender.send(key);
    }

    /// Bind a new listener.
    pub fn subscribe(&self) -> broadcast::Receiver<Key> {
        self.sender.subscribe()
    }

    /// Number of bound listeners.
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for KeyboardHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_keys() {
        let hub = KeyboardHub::new();
        let mut rx = hub.subscribe();

        hub.press(Key::Escape);

        match rx.try_recv() {
            Ok(Key::Escape) => {}
            other => panic!("Expected Escape, got {other:?}"),
        }
    }

    #[test]
    fn dropping_listener_unbinds_it() {
        let hub = KeyboardHub::new();
        let rx = hub.subscribe();
        assert_eq!(hub.listener_count(), 1);

        drop(rx);

        assert_eq!(hub.listener_count(), 0);
        hub.press(Key::ArrowLeft);
    }

    #[test]
    fn maps_dom_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_name("Escape"), Key::Escape);
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
    }
}
