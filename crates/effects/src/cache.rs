//! Memoized compile cache keyed by layer id and parameter hash.

use std::collections::HashMap;
use std::sync::Arc;

use ph_common::{Adjustment, LayerId};

use crate::compiled::CompiledFilter;
use crate::compiler::compile;

struct CacheEntry {
    params_hash: u64,
    filter: Arc<CompiledFilter>,
}

/// Caches compiled filters per adjustment layer, recompiling only when
/// that layer's parameters change.
#[derive(Default)]
pub struct FilterCache {
    entries: HashMap<LayerId, CacheEntry>,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the compiled filter for `layer_id`, compiling if the cache
    /// is cold or the adjustment's parameters changed since last time.
    pub fn get_or_compile(
        &mut self,
        layer_id: &LayerId,
        adjustment: &Adjustment,
    ) -> Arc<CompiledFilter> {
        let hash = adjustment.params_hash();
        if let Some(entry) = self.entries.get(layer_id) {
            if entry.params_hash == hash {
                return Arc::clone(&entry.filter);
            }
        }

        tracing::debug!(
            layer_id = %layer_id,
            kind = adjustment.kind_name(),
            "Compiling adjustment filter"
        );
        let filter = Arc::new(compile(adjustment));
        self.entries.insert(
            layer_id.clone(),
            CacheEntry {
                params_hash: hash,
                filter: Arc::clone(&filter),
            },
        );
        filter
    }

    /// Drop the cached filter for one layer (e.g. on layer removal).
    pub fn invalidate(&mut self, layer_id: &LayerId) {
        self.entries.remove(layer_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
