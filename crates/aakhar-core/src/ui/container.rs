use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

#[derive(Debug, Default)]
struct Shared {
    session: u64,
    html: String,
}

/// The shared content area every view renders into.
///
/// Each navigation starts a new session. Writes through a handle from an
/// older session are dropped, so a slow fetch finishing after the user has
/// moved on cannot overwrite the page they are looking at.
#[derive(Debug, Default)]
pub struct Container {
    shared: Arc<Mutex<Shared>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the container and invalidate every outstanding handle.
    pub fn begin_session(&self) -> ContainerHandle {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.session += 1;
        shared.html.clear();
        ContainerHandle {
            shared: Arc::clone(&self.shared),
            session: shared.session,
        }
    }

    pub fn html(&self) -> String {
        self.shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .html
            .clone()
    }

    pub fn session(&self) -> u64 {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner).session
    }
}

#[derive(Debug, Clone)]
pub struct ContainerHandle {
    shared: Arc<Mutex<Shared>>,
    session: u64,
}

impl ContainerHandle {
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn is_current(&self) -> bool {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner).session == self.session
    }

    /// Replace the container contents. Returns false, writing nothing, when
    /// this handle's session has ended.
    pub fn render(&self, html: impl Into<String>) -> bool {
        let mut shared = self.shared.lock().unwrap_or_else(PoisonError::into_inner);
        if shared.session != self.session {
            debug!(
                stale = self.session,
                current = shared.session,
                "Discarding render from a previous navigation"
            );
            return false;
        }
        shared.html = html.into();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_clears_and_invalidates() {
        let container = Container::new();
        let first = container.begin_session();
        assert!(first.render("<p>first</p>"));
        assert_eq!(container.html(), "<p>first</p>");

        let second = container.begin_session();
        assert_eq!(container.html(), "");
        assert!(!first.is_current());
        assert!(second.is_current());

        assert!(!first.render("<p>late</p>"));
        assert_eq!(container.html(), "");
        assert_eq!(container.session(), 2);
    }
}
