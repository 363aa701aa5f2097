//! Bridge between the host's "app is installable" signal and the install
//! control on the About page.

use std::sync::{Mutex, PoisonError};

use futures::future::BoxFuture;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
    /// Nothing was captured: already installed, or the host cannot install.
    Unavailable,
}

impl InstallOutcome {
    pub fn notice(&self) -> &'static str {
        match self {
            InstallOutcome::Accepted => "Aakhar was added to your home screen.",
            InstallOutcome::Dismissed => "Install dismissed. You can add Aakhar later from this page.",
            InstallOutcome::Unavailable => {
                "This app is either already installed or your host does not support this feature."
            }
        }
    }
}

/// A captured install prompt. Showing it resolves to the user's choice.
pub type DeferredPrompt = Box<dyn FnOnce() -> BoxFuture<'static, InstallOutcome> + Send>;

#[derive(Default)]
pub struct InstallBridge {
    deferred: Mutex<Option<DeferredPrompt>>,
}

impl InstallBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the prompt for later, replacing any earlier one.
    pub fn capture(&self, prompt: DeferredPrompt) {
        *self.deferred.lock().unwrap_or_else(PoisonError::into_inner) = Some(prompt);
        info!("Install prompt captured, app is installable");
    }

    pub fn is_available(&self) -> bool {
        self.deferred
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Show the captured prompt once. A prompt can only be used one time, so
    /// it is cleared whatever the user chooses.
    pub async fn trigger(&self) -> InstallOutcome {
        let prompt = self
            .deferred
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(prompt) = prompt else {
            info!("Install prompt not available (already installed or not supported)");
            return InstallOutcome::Unavailable;
        };

        let outcome = prompt().await;
        match outcome {
            InstallOutcome::Accepted => info!("User accepted the install prompt"),
            _ => info!("User dismissed the install prompt"),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures::FutureExt;

    use super::*;

    fn prompt(outcome: InstallOutcome, shown: Arc<AtomicUsize>) -> DeferredPrompt {
        Box::new(move || {
            shown.fetch_add(1, Ordering::SeqCst);
            async move { outcome }.boxed()
        })
    }

    #[tokio::test]
    async fn test_trigger_without_capture_is_unavailable() {
        let bridge = InstallBridge::new();
        assert!(!bridge.is_available());
        assert_eq!(bridge.trigger().await, InstallOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_prompt_is_used_once() {
        let bridge = InstallBridge::new();
        let shown = Arc::new(AtomicUsize::new(0));
        bridge.capture(prompt(InstallOutcome::Accepted, shown.clone()));
        assert!(bridge.is_available());

        assert_eq!(bridge.trigger().await, InstallOutcome::Accepted);
        assert_eq!(bridge.trigger().await, InstallOutcome::Unavailable);
        assert_eq!(shown.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dismissed_prompt_is_cleared() {
        let bridge = InstallBridge::new();
        bridge.capture(prompt(InstallOutcome::Dismissed, Arc::new(AtomicUsize::new(0))));
        assert_eq!(bridge.trigger().await, InstallOutcome::Dismissed);
        assert!(!bridge.is_available());
    }
}
