//! The graph planner ("fish factory", §4.4).
//!
//! The conversion graph is walked in the two phases §4.4 describes —
//! component reduction from `from_fmt` to the pivot, then target synthesis
//! from the pivot to `to_fmt` — rather than a generic Dijkstra search: the
//! registered model set is closed and every non-identity model has exactly
//! one edge into/out of the pivot (see [`crate::convert`]), so the shortest
//! path is always that two-hop walk. A direct `memcpy` shortcut is taken
//! when `from_fmt == to_fmt`.

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use crate::cache::FishKey;
use crate::convert;
use crate::error::{Error, Result};
use crate::executor::Lut;
use crate::registry::{FormatHandle, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    /// `from_fmt == to_fmt`: a single `memcpy` sized by bytes-per-pixel × n.
    Identity,
    /// Non-trivial chain, routed through the linear-RGBA-double pivot.
    Convert,
}

/// A cached conversion plan plus callable (§3 "Fish").
pub struct Fish {
    pub from: FormatHandle,
    pub to: FormatHandle,
    pub chain: Chain,
    pub(crate) pixels_processed: AtomicU64,
    pub(crate) lut: RwLock<Option<Arc<Lut>>>,
}

impl Fish {
    pub fn pixels_processed(&self) -> u64 {
        self.pixels_processed.load(std::sync::atomic::Ordering::Relaxed)
    }
}

type FishCache = Mutex<HashMap<(FormatHandle, FormatHandle), Arc<Fish>>>;

fn fish_cache() -> &'static FishCache {
    static CACHE: OnceLock<FishCache> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Verify the planner can route through the pivot for this format's model by
/// attempting the decode/encode dispatch in [`crate::convert`] with a probe
/// pixel; unregistered/unsupported models report [`Error::NoPath`] rather
/// than panicking at `process` time.
fn model_is_routable(registry: &Registry, format_handle: FormatHandle) -> bool {
    let format = registry.get_format(format_handle);
    // Palette-indexed formats (§4.7) never route through the pivot dispatch
    // in `convert` — the palette subsystem converts directly against the
    // attached color table instead, so there's nothing to probe here.
    if format.palette {
        return true;
    }
    let model = registry.get_model(format.model);
    let space = registry.get_space(format.space);
    let probe = vec![0.0; format.components.len()];
    convert::to_pivot(&model, &space, registry, &probe).is_ok()
        && convert::from_pivot(&model, &space, registry, [0.0, 0.0, 0.0, 1.0]).is_ok()
}

/// Probes a freshly-planned convert chain by pushing a handful of sample
/// values through `from`'s decode and `to`'s encode/decode, and warns (never
/// errors — a fish is still usable past its tolerance) when the round-trip
/// drifts past `Config::tolerance` (§6, §10).
fn warn_if_probe_exceeds_tolerance(registry: &Registry, from: FormatHandle, to: FormatHandle) {
    let tolerance = registry.config().tolerance;
    let from_format = registry.get_format(from);
    let from_model = registry.get_model(from_format.model);
    let from_space = registry.get_space(from_format.space);
    let to_format = registry.get_format(to);
    let to_model = registry.get_model(to_format.model);
    let to_space = registry.get_space(to_format.space);

    for value in [0.25_f64, 0.5, 0.75] {
        let probe = vec![value; from_format.components.len()];
        let Ok(pivot) = convert::to_pivot(&from_model, &from_space, registry, &probe) else {
            return;
        };
        let Ok(encoded) = convert::from_pivot(&to_model, &to_space, registry, pivot) else {
            return;
        };
        let Ok(round_tripped) = convert::to_pivot(&to_model, &to_space, registry, &encoded) else {
            return;
        };
        let error = pivot
            .iter()
            .zip(round_tripped.iter())
            .fold(0.0_f64, |max, (a, b)| max.max((a - b).abs()));
        if error > tolerance {
            log::warn!(
                "fish {} -> {}: probe round-trip error {error:.6} exceeds tolerance {tolerance:.6}",
                format_name(registry, from),
                format_name(registry, to),
            );
        }
    }
}

/// `fish(from, to)` (§6, §4.4): plan (or return the cached plan for) a
/// conversion between two formats.
pub fn fish(registry: &Registry, from: FormatHandle, to: FormatHandle) -> Result<Arc<Fish>> {
    let mut cache = fish_cache().lock().expect("fish cache lock poisoned");
    if let Some(existing) = cache.get(&(from, to)) {
        return Ok(Arc::clone(existing));
    }

    let config = registry.config();
    let key: FishKey = (format_name(registry, from), format_name(registry, to));

    let chain = if from == to {
        Chain::Identity
    } else if !config.inhibit_cache
        && matches!(registry.cache_backend().load(&key), Ok(Some(blob)) if blob.first() == Some(&1))
    {
        // A prior process already verified this pair routes; trust the
        // persisted marker and skip re-probing.
        Chain::Convert
    } else {
        if !model_is_routable(registry, from) || !model_is_routable(registry, to) {
            return Err(Error::NoPath {
                from: key.0,
                to: key.1,
            });
        }
        warn_if_probe_exceeds_tolerance(registry, from, to);
        Chain::Convert
    };

    let new_fish = Arc::new(Fish {
        from,
        to,
        chain,
        pixels_processed: AtomicU64::new(0),
        lut: RwLock::new(None),
    });
    cache.insert((from, to), Arc::clone(&new_fish));
    if !config.inhibit_cache {
        let marker = match chain {
            Chain::Identity => [0u8],
            Chain::Convert => [1u8],
        };
        if let Err(err) = registry.cache_backend().store(&key, &marker) {
            log::warn!("fish cache store failed for {} -> {}: {err}", key.0, key.1);
        }
    }
    log::debug!("fish planned: {} -> {} ({:?})", key.0, key.1, chain);
    Ok(new_fish)
}

/// `exit()` (§5, §6): flush every in-memory fish into the configured cache
/// backend. Returns the number of entries stored. Entries already persisted
/// by `fish()` as they were planned are stored again here (idempotent,
/// since the backend keys on `(from, to)` format names).
pub(crate) fn persist_fish_cache(registry: &Registry) -> usize {
    let cache = fish_cache().lock().expect("fish cache lock poisoned");
    let backend = registry.cache_backend();
    let mut stored = 0;
    for fish in cache.values() {
        let key: FishKey = (format_name(registry, fish.from), format_name(registry, fish.to));
        let marker = match fish.chain {
            Chain::Identity => [0u8],
            Chain::Convert => [1u8],
        };
        match backend.store(&key, &marker) {
            Ok(()) => stored += 1,
            Err(err) => log::warn!("exit: fish cache store failed for {} -> {}: {err}", key.0, key.1),
        }
    }
    stored
}

fn format_name(registry: &Registry, handle: FormatHandle) -> String {
    let format = registry.get_format(handle);
    registry.get_model(format.model).name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format;

    #[test]
    fn identity_format_pair_plans_memcpy_chain() {
        let registry = Registry::global();
        let f = format::format(registry, "RGBA float").unwrap();
        let plan = fish(registry, f, f).unwrap();
        assert_eq!(plan.chain, Chain::Identity);
    }

    #[test]
    fn repeated_requests_return_the_same_cached_fish() {
        let registry = Registry::global();
        let a = format::format(registry, "RGBA float").unwrap();
        let b = format::format(registry, "R'G'B'A u8").unwrap();
        let plan1 = fish(registry, a, b).unwrap();
        let plan2 = fish(registry, a, b).unwrap();
        assert!(Arc::ptr_eq(&plan1, &plan2));
    }

    #[test]
    fn unsupported_model_reports_no_path() {
        let registry = Registry::global();
        let rgba = format::format(registry, "RGBA float").unwrap();
        let opaque = format::format_n(registry, "u8", 5).unwrap();
        match fish(registry, rgba, opaque) {
            Err(Error::NoPath { .. }) => {}
            other => panic!("expected NoPath, got {:?}", other.map(|_| ())),
        }
    }
}
