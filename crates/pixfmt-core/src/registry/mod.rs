//! The typed, interned registry (§3, §4.1).
//!
//! Registration happens during [`Registry::global`]'s first call (the
//! process-wide `init`) or under the registry's mutation lock if user code
//! registers additional entries afterward. Once a handle is issued its
//! identity never changes; reads never need to take the lock.

mod builtin;
mod handle;
mod kinds;
pub(crate) mod spacebuild;
mod table;

pub use handle::Handle;
pub use kinds::{
    Component, ComponentFlags, ComponentHandle, ComponentKind, FormatComponent, FormatHandle,
    FormatKind, Model, ModelFamily, ModelHandle, ModelKind, NumericType, NumericTypeHandle,
    NumericTypeKind, PixelFormat, Sampling, SamplingHandle, SamplingKind, Space, SpaceClass,
    SpaceHandle, SpaceKind, Trc, TrcHandle, TrcKind,
};

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};
use table::Table;

use crate::cache::{FishCacheBackend, NullCache};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::palette::Palette;

/// The process-wide catalog of typed building blocks.
pub struct Registry {
    numeric_types: RwLock<Table<NumericType>>,
    components: RwLock<Table<Component>>,
    models: RwLock<Table<Model>>,
    samplings: RwLock<Table<Sampling>>,
    trcs: RwLock<Table<Trc>>,
    spaces: RwLock<Table<Space>>,
    formats: RwLock<Table<PixelFormat>>,
    config: RwLock<Config>,
    cache_backend: RwLock<Arc<dyn FishCacheBackend>>,
    /// Color tables attached to palette-indexed formats by `palette_set_palette`
    /// (§4.7, §6). Keyed by format rather than model, since a palette-index
    /// model is shared between its alpha and non-alpha format variants.
    palettes: RwLock<HashMap<FormatHandle, Arc<Palette>>>,
}

/// Generates `register_*`/`lookup_*`/`get_*`/`each_*` inherent methods for one
/// registry kind, keeping the five kinds' accessors mechanically identical.
macro_rules! kind_accessors {
    ($field:ident, $value:ty, $handle:ty, $register:ident, $lookup:ident, $get:ident, $each:ident) => {
        /// Insert-or-return-existing; structural equality, per §4.1.
        pub fn $register(&self, name: Option<&str>, attrs: $value) -> $handle {
            let mut table = self.$field.write().expect("registry lock poisoned");
            <$handle>::new(table.register(name, attrs))
        }

        pub fn $lookup(&self, name: &str) -> Option<$handle> {
            let table = self.$field.read().expect("registry lock poisoned");
            table.lookup_by_name(name).map(<$handle>::new)
        }

        pub fn $get(&self, handle: $handle) -> $value {
            let table = self.$field.read().expect("registry lock poisoned");
            table.get(handle.index()).clone()
        }

        pub fn $each(&self, mut visitor: impl FnMut($handle, &$value)) {
            let table = self.$field.read().expect("registry lock poisoned");
            table.each(|index, attrs| visitor(<$handle>::new(index), attrs));
        }
    };
}

impl Registry {
    fn empty() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        Self {
            numeric_types: RwLock::new(Table::default()),
            components: RwLock::new(Table::default()),
            models: RwLock::new(Table::default()),
            samplings: RwLock::new(Table::default()),
            trcs: RwLock::new(Table::default()),
            spaces: RwLock::new(Table::default()),
            formats: RwLock::new(Table::default()),
            config: RwLock::new(config),
            cache_backend: RwLock::new(Arc::new(NullCache)),
            palettes: RwLock::new(HashMap::new()),
        }
    }

    kind_accessors!(
        numeric_types,
        NumericType,
        NumericTypeHandle,
        register_numeric_type,
        lookup_numeric_type,
        get_numeric_type,
        each_numeric_type
    );
    kind_accessors!(
        components,
        Component,
        ComponentHandle,
        register_component,
        lookup_component,
        get_component,
        each_component
    );
    kind_accessors!(
        models,
        Model,
        ModelHandle,
        register_model,
        lookup_model,
        get_model,
        each_model
    );
    kind_accessors!(
        samplings,
        Sampling,
        SamplingHandle,
        register_sampling,
        lookup_sampling,
        get_sampling,
        each_sampling
    );
    kind_accessors!(trcs, Trc, TrcHandle, register_trc, lookup_trc, get_trc, each_trc);
    kind_accessors!(
        spaces,
        Space,
        SpaceHandle,
        register_space,
        lookup_space,
        get_space,
        each_space
    );
    kind_accessors!(
        formats,
        PixelFormat,
        FormatHandle,
        register_format,
        lookup_format,
        get_format,
        each_format
    );

    pub fn type_by_name(&self, name: &str) -> Result<NumericTypeHandle> {
        self.lookup_numeric_type(name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    pub fn model_by_name(&self, name: &str) -> Result<ModelHandle> {
        self.lookup_model(name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    pub fn space_by_name(&self, name: &str) -> Result<SpaceHandle> {
        self.lookup_space(name)
            .ok_or_else(|| Error::UnknownName(name.to_string()))
    }

    /// The global, process-wide registry, built on first access (§4.1, §5).
    ///
    /// Equivalent to [`Registry::init_with_config`]`(Config::from_env())`:
    /// whichever caller reaches the lazy init first decides the config for
    /// the lifetime of the process.
    pub fn global() -> &'static Registry {
        Self::shared(Config::from_env)
    }

    /// Explicit process-wide init with environment-derived config (§5, §6).
    ///
    /// Idempotent like [`Registry::global`]: if some earlier caller (direct
    /// or via `global()`) already initialized the registry, this returns that
    /// instance unchanged rather than re-reading the environment.
    pub fn init() -> &'static Registry {
        Self::shared(Config::from_env)
    }

    /// Explicit process-wide init with a caller-supplied config (§5, §6).
    ///
    /// Same one-shot-wins semantics as [`Registry::init`].
    pub fn init_with_config(config: Config) -> &'static Registry {
        Self::shared(|| config)
    }

    fn shared(config: impl FnOnce() -> Config) -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            let registry = Registry::with_config(config());
            builtin::populate(&registry);
            log::debug!(
                "registry initialized: {} types, {} components, {} models, {} spaces",
                registry.numeric_types.read().unwrap().len(),
                registry.components.read().unwrap().len(),
                registry.models.read().unwrap().len(),
                registry.spaces.read().unwrap().len(),
            );
            registry
        })
    }

    /// The config this registry was initialized with (§6, §10).
    pub fn config(&self) -> Config {
        self.config.read().expect("registry lock poisoned").clone()
    }

    /// Install a fish-cache backend (§4.8). Takes effect for subsequent
    /// `fish()` calls; does not retroactively touch already-planned fish.
    pub fn set_cache_backend(&self, backend: Arc<dyn FishCacheBackend>) {
        *self.cache_backend.write().expect("registry lock poisoned") = backend;
    }

    pub fn cache_backend(&self) -> Arc<dyn FishCacheBackend> {
        Arc::clone(&self.cache_backend.read().expect("registry lock poisoned"))
    }

    /// `palette_set_palette` (§6) attaches (or replaces) the color table for
    /// a palette-indexed format.
    pub fn set_palette(&self, format: FormatHandle, palette: Arc<Palette>) {
        self.palettes
            .write()
            .expect("registry lock poisoned")
            .insert(format, palette);
    }

    /// The color table attached to a palette-indexed format, if any has been
    /// set via [`Registry::set_palette`] yet.
    pub fn get_palette(&self, format: FormatHandle) -> Option<Arc<Palette>> {
        self.palettes.read().expect("registry lock poisoned").get(&format).cloned()
    }

    /// Process shutdown (§5, §6): flushes the fish cache through the
    /// configured backend unless `inhibit_cache` is set.
    pub fn exit(&self) {
        if self.config().inhibit_cache {
            log::debug!("exit: cache inhibited, skipping fish cache flush");
            return;
        }
        let stored = crate::planner::persist_fish_cache(self);
        log::debug!("exit: flushed {stored} fish cache entries");
    }
}
