//! Synchronization boundary between the animators and a renderer
//!
//! Publishing never blocks and never queues: a boundary holds at most one
//! outstanding item, and a newer item replaces one the far side has not taken
//! yet. With nobody attached the item is dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::core::{PointSet, SceneSetup, VisResult};
use crate::renderer::Renderer;

/// What happened to a published item
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Handed over, nothing was pending
    Delivered,
    /// Handed over, replacing an item that was never taken
    Superseded,
    /// Nobody attached; the item is gone
    Dropped,
}

impl Delivery {
    pub fn was_handed_over(self) -> bool {
        !matches!(self, Delivery::Dropped)
    }
}

pub trait SyncBoundary<T> {
    fn publish(&mut self, item: T) -> VisResult<Delivery>;
}

// ============================================================================
// LatestSlot - single-item latest-wins mailbox
// ============================================================================

struct SlotState<T> {
    pending: Option<T>,
    attached: bool,
    /// Identifies the current receiver so a stale one cannot detach it
    generation: u64,
}

struct Shared<T> {
    state: Mutex<SlotState<T>>,
    #[cfg(feature = "cli")]
    notify: tokio::sync::Notify,
}

/// Producer side of a latest-wins mailbox. Clones share the same slot.
pub struct LatestSlot<T> {
    shared: Arc<Shared<T>>,
}

/// Consumer side; taking an item acknowledges it. Dropping detaches.
pub struct SlotReceiver<T> {
    shared: Arc<Shared<T>>,
    generation: u64,
}

impl<T> LatestSlot<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SlotState { pending: None, attached: false, generation: 0 }),
                #[cfg(feature = "cli")]
                notify: tokio::sync::Notify::new(),
            }),
        }
    }

    /// Attach the consumer. A previous receiver, if any, stops receiving.
    pub fn attach(&self) -> SlotReceiver<T> {
        let mut state = self.shared.state.lock();
        state.attached = true;
        state.pending = None;
        state.generation += 1;
        SlotReceiver {
            shared: self.shared.clone(),
            generation: state.generation,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.shared.state.lock().attached
    }

    pub fn has_pending(&self) -> bool {
        self.shared.state.lock().pending.is_some()
    }
}

impl<T> Clone for LatestSlot<T> {
    fn clone(&self) -> Self {
        Self { shared: self.shared.clone() }
    }
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SyncBoundary<T> for LatestSlot<T> {
    fn publish(&mut self, item: T) -> VisResult<Delivery> {
        let delivery = {
            let mut state = self.shared.state.lock();
            if !state.attached {
                return Ok(Delivery::Dropped);
            }
            match state.pending.replace(item) {
                Some(_) => Delivery::Superseded,
                None => Delivery::Delivered,
            }
        };
        #[cfg(feature = "cli")]
        self.shared.notify.notify_one();
        Ok(delivery)
    }
}

impl<T> SlotReceiver<T> {
    /// Take the newest item, if one is pending
    pub fn take(&self) -> Option<T> {
        let mut state = self.shared.state.lock();
        if state.generation != self.generation {
            return None;
        }
        state.pending.take()
    }

    /// Wait for the next item
    #[cfg(feature = "cli")]
    pub async fn recv(&self) -> T {
        loop {
            if let Some(item) = self.take() {
                return item;
            }
            self.shared.notify.notified().await;
        }
    }
}

impl<T> Drop for SlotReceiver<T> {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        if state.generation == self.generation {
            state.attached = false;
            state.pending = None;
            trace!("Slot receiver detached");
        }
    }
}

// ============================================================================
// RendererBoundary - in-process hand-off straight into a renderer
// ============================================================================

/// Applies published items synchronously to an attached renderer
pub struct RendererBoundary<R> {
    renderer: Option<R>,
}

impl<R: Renderer> RendererBoundary<R> {
    pub fn detached() -> Self {
        Self { renderer: None }
    }

    /// Attach a renderer and initialize it with the current scene
    pub fn attach(&mut self, mut renderer: R, scene: &PointSet, point_size: f32) -> VisResult<()> {
        renderer.initialize(scene.positions(), scene.colors(), point_size)?;
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Attach a renderer that will be initialized by a published scene setup
    pub fn attach_uninitialized(&mut self, renderer: R) {
        self.renderer = Some(renderer);
    }

    pub fn detach(&mut self) -> Option<R> {
        self.renderer.take()
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.renderer.as_mut()
    }
}

impl<R: Renderer> SyncBoundary<Arc<PointSet>> for RendererBoundary<R> {
    fn publish(&mut self, frame: Arc<PointSet>) -> VisResult<Delivery> {
        match self.renderer.as_mut() {
            Some(renderer) => {
                renderer.update_positions(frame.positions())?;
                Ok(Delivery::Delivered)
            }
            None => Ok(Delivery::Dropped),
        }
    }
}

impl<R: Renderer> SyncBoundary<Arc<SceneSetup>> for RendererBoundary<R> {
    fn publish(&mut self, setup: Arc<SceneSetup>) -> VisResult<Delivery> {
        match self.renderer.as_mut() {
            Some(renderer) => {
                renderer.initialize(&setup.positions, &setup.colors, setup.point_size)?;
                Ok(Delivery::Delivered)
            }
            None => Ok(Delivery::Dropped),
        }
    }
}
