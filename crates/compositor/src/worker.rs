//! Background render worker.
//!
//! Flattening is CPU-bound; for large canvases it must not block the
//! event thread. `flatten_async` clones the committed layer list, moves
//! the pixel pass onto a worker thread, and hands back a [`RenderHandle`]
//! the caller polls or blocks on.

use std::sync::Arc;
use std::thread;

use crossbeam::channel::{bounded, Receiver, TryRecvError};
use ph_common::{Layer, PixelBuffer};
use ph_effects::FilterCache;
use tracing::debug;

use crate::compositor::{Compositor, SourceMap};
use crate::error::CompositorError;
use crate::text::FontStore;

/// Handle to an in-flight background flatten.
pub struct RenderHandle {
    rx: Receiver<Result<PixelBuffer, CompositorError>>,
}

impl RenderHandle {
    /// Non-blocking poll. `None` while the worker is still rendering.
    pub fn try_result(&self) -> Option<Result<PixelBuffer, CompositorError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CompositorError::WorkerGone)),
        }
    }

    /// Block until the worker reports its result.
    pub fn wait(self) -> Result<PixelBuffer, CompositorError> {
        self.rx.recv().unwrap_or(Err(CompositorError::WorkerGone))
    }
}

/// Run a flatten on a worker thread.
///
/// Inputs are snapshots of committed state: the layer list is cloned by
/// the caller and sources/fonts are shared read-only via `Arc`, so the
/// event thread stays free while pixels grind.
pub fn flatten_async(
    compositor: Compositor,
    layers: Vec<Layer>,
    sources: Arc<SourceMap>,
    fonts: Arc<FontStore>,
    scale: u32,
) -> RenderHandle {
    let (tx, rx) = bounded(1);

    thread::spawn(move || {
        debug!(layer_count = layers.len(), scale, "Render worker started");
        let mut cache = FilterCache::new();
        let result = compositor.flatten(&layers, &sources, &fonts, &mut cache, scale);
        if tx.send(result).is_err() {
            debug!("Render result dropped, caller went away");
        }
    });

    RenderHandle { rx }
}
