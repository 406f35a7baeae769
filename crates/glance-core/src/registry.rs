// ABOUTME: Registry of navigation trees whose events feed the preview lifecycle
// ABOUTME: Each tree gets exactly one listener; double registration is a caller bug

use glance_events::{SubscriptionId, TreeListener};
use glance_logging::{debug, error, trace};
use glance_types::{ToggleClickCount, TreeId};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::capabilities::NavigationTree;
use crate::error::{PreviewError, Result};

struct Registration {
    tree: Arc<dyn NavigationTree>,
    /// None while the listener is being attached
    subscription: Option<SubscriptionId>,
}

/// Registered trees in registration order
#[derive(Default)]
pub struct TreeRegistry {
    registrations: Mutex<Vec<Registration>>,
}

impl TreeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `listener` to `tree` and apply its click-count threshold
    pub fn register(
        &self,
        tree: Arc<dyn NavigationTree>,
        listener: TreeListener,
        click_count: ToggleClickCount,
    ) -> Result<()> {
        let id = tree.id();
        {
            let mut registrations = self.registrations.lock();
            if registrations.iter().any(|r| r.tree.id() == id) {
                error!(tree = %id, "Tree handlers already registered");
                return Err(PreviewError::TreeAlreadyRegistered { tree: id });
            }
            registrations.push(Registration {
                tree: tree.clone(),
                subscription: None,
            });
        }

        tree.set_toggle_click_count(click_count);
        let subscription = tree.subscribe(listener);

        let attached = self
            .registrations
            .lock()
            .iter_mut()
            .find(|r| r.tree.id() == id)
            .map(|registration| registration.subscription = Some(subscription))
            .is_some();

        if !attached {
            // Unregistered while attaching
            tree.unsubscribe(subscription);
            trace!(tree = %id, "Tree unregistered during registration");
            return Ok(());
        }

        debug!(tree = %id, click_count = click_count.as_u32(), "Tree handlers registered");
        Ok(())
    }

    pub fn unregister(&self, id: TreeId) -> Result<()> {
        let registration = {
            let mut registrations = self.registrations.lock();
            let Some(index) = registrations.iter().position(|r| r.tree.id() == id) else {
                error!(tree = %id, "Can not unregister handlers of an unregistered tree");
                return Err(PreviewError::TreeNotRegistered { tree: id });
            };
            registrations.remove(index)
        };

        if let Some(subscription) = registration.subscription {
            registration.tree.unsubscribe(subscription);
        }
        debug!(tree = %id, "Tree handlers unregistered");
        Ok(())
    }

    /// Unregister every tree known at call time
    pub fn unregister_all(&self) {
        for id in self.ids() {
            if let Err(e) = self.unregister(id) {
                trace!(tree = %id, error = %e, "Tree already gone during unregister_all");
            }
        }
    }

    pub fn is_registered(&self, id: TreeId) -> bool {
        self.registrations.lock().iter().any(|r| r.tree.id() == id)
    }

    pub fn get(&self, id: TreeId) -> Option<Arc<dyn NavigationTree>> {
        self.registrations
            .lock()
            .iter()
            .find(|r| r.tree.id() == id)
            .map(|r| r.tree.clone())
    }

    pub fn trees(&self) -> Vec<Arc<dyn NavigationTree>> {
        self.registrations
            .lock()
            .iter()
            .map(|r| r.tree.clone())
            .collect()
    }

    pub fn ids(&self) -> Vec<TreeId> {
        self.registrations.lock().iter().map(|r| r.tree.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.lock().is_empty()
    }
}
