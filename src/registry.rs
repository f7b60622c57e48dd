//! Lazily-initialized singleton registry with four access strategies.
//!
//! A [`SingletonRegistry`] owns at most one [`KeyValueStore`] and can hand it
//! out through four accessors that differ only in how they guard the first
//! construction:
//!
//! | Strategy | Accessor | Guarantees |
//! |----------|----------|------------|
//! | [`Strategy::Unsynchronized`] | [`unsynchronized`](SingletonRegistry::unsynchronized) | none; may construct several stores when raced |
//! | [`Strategy::MutexGuarded`] | [`mutex_guarded`](SingletonRegistry::mutex_guarded) | one store, every call takes the lock |
//! | [`Strategy::OnceGuarded`] | [`once_guarded`](SingletonRegistry::once_guarded) | one store, lock-free after initialization |
//! | [`Strategy::DoubleChecked`] | [`double_checked`](SingletonRegistry::double_checked) | one store, atomic flag fast path |
//!
//! All four accessors read and write the same instance slot. The three
//! thread-safe ones construct under the same lock, so mixing them still
//! produces a single store.
//!
//! ```text
//!   unsynchronized    check slot ─────────────────────────► construct
//!   mutex_guarded     lock ──► check slot ────────────────► construct
//!   once_guarded      once ──► lock ──► check slot ───────► construct
//!   double_checked    flag? ──► lock ──► flag? ──► check ─► construct
//!                                                               │
//!                                                               ▼
//!                                                   instance slot (AtomicPtr)
//! ```
//!
//! Stores are leaked on construction and live until the process exits.
//!
//! # Examples
//!
//! ```rust
//! use contesa::registry::{SingletonRegistry, Strategy};
//!
//! let registry = SingletonRegistry::new();
//! let a = registry.once_guarded();
//! let b = registry.get(Strategy::DoubleChecked);
//! assert!(std::ptr::eq(a, b));
//! assert_eq!(registry.constructions(), 1);
//! ```

use std::fmt::{self, Debug, Display};
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::store::KeyValueStore;

/// The concurrency discipline used to resolve the singleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Strategy {
    /// Check-then-construct with no protection. Racy by construction.
    Unsynchronized,
    /// Check-then-construct while holding an exclusive lock.
    MutexGuarded,
    /// Construction closure executed exactly once by a one-shot cell.
    OnceGuarded,
    /// Atomic flag fast path, lock-guarded re-check on the slow path.
    DoubleChecked,
}

impl Strategy {
    /// Every strategy, in the order the demo presents them.
    pub const ALL: [Strategy; 4] = [
        Strategy::Unsynchronized,
        Strategy::MutexGuarded,
        Strategy::OnceGuarded,
        Strategy::DoubleChecked,
    ];

    /// The strategies that never construct more than one store.
    pub const THREAD_SAFE: [Strategy; 3] = [
        Strategy::MutexGuarded,
        Strategy::OnceGuarded,
        Strategy::DoubleChecked,
    ];

    /// Returns a short, stable name for this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Unsynchronized => "unsynchronized",
            Strategy::MutexGuarded => "mutex_guarded",
            Strategy::OnceGuarded => "once_guarded",
            Strategy::DoubleChecked => "double_checked",
        }
    }

    /// Returns `true` if concurrent first access yields a single store.
    pub fn is_thread_safe(&self) -> bool {
        !matches!(self, Strategy::Unsynchronized)
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Holds the one [`KeyValueStore`] and the state each strategy needs to guard it.
pub struct SingletonRegistry {
    /// The shared instance slot. Null until the first construction.
    instance: AtomicPtr<KeyValueStore>,
    /// Serializes construction for every thread-safe strategy.
    lock: Mutex<()>,
    /// One-shot cell used by [`Strategy::OnceGuarded`].
    once: OnceCell<&'static KeyValueStore>,
    /// Initialized flag used by [`Strategy::DoubleChecked`].
    initialized: AtomicBool,
    constructions: AtomicUsize,
}

impl SingletonRegistry {
    /// Creates an empty registry. No store exists until an accessor is called.
    ///
    /// Being `const`, this can initialize a `static`:
    ///
    /// ```rust
    /// use contesa::registry::SingletonRegistry;
    ///
    /// static REGISTRY: SingletonRegistry = SingletonRegistry::new();
    /// assert!(REGISTRY.peek().is_none());
    /// ```
    pub const fn new() -> Self {
        SingletonRegistry {
            instance: AtomicPtr::new(ptr::null_mut()),
            lock: Mutex::new(()),
            once: OnceCell::new(),
            initialized: AtomicBool::new(false),
            constructions: AtomicUsize::new(0),
        }
    }

    /// Resolves the store using `strategy`.
    pub fn get(&self, strategy: Strategy) -> &'static KeyValueStore {
        match strategy {
            Strategy::Unsynchronized => self.unsynchronized(),
            Strategy::MutexGuarded => self.mutex_guarded(),
            Strategy::OnceGuarded => self.once_guarded(),
            Strategy::DoubleChecked => self.double_checked(),
        }
    }

    /// Returns the store, constructing it if the slot looks empty.
    ///
    /// # Warning
    ///
    /// There is no lock and no compare-and-swap between the check and the
    /// construction. Threads that race through the check each build their
    /// own store; the last one to publish wins the slot and the others keep
    /// references to orphans. Only safe when a single thread performs the
    /// first access.
    pub fn unsynchronized(&self) -> &'static KeyValueStore {
        match self.current() {
            Some(store) => store,
            None => self.construct(Strategy::Unsynchronized),
        }
    }

    /// Returns the store, holding the registry lock for the whole call.
    ///
    /// Correct under any concurrency, but every call contends on the lock
    /// even after initialization.
    pub fn mutex_guarded(&self) -> &'static KeyValueStore {
        let _guard = self.lock.lock();
        self.current_or_construct(Strategy::MutexGuarded)
    }

    /// Returns the store through a one-shot cell.
    ///
    /// The initialization closure runs at most once per registry no matter
    /// how many threads arrive together; late arrivals block until it
    /// completes. Once the cell is filled, calls are a single atomic load.
    /// This is the preferred strategy.
    pub fn once_guarded(&self) -> &'static KeyValueStore {
        *self.once.get_or_init(|| {
            let _guard = self.lock.lock();
            self.current_or_construct(Strategy::OnceGuarded)
        })
    }

    /// Returns the store using double-checked locking on an atomic flag.
    ///
    /// The fast path is an acquire load of the flag with no locking. On the
    /// slow path the flag is checked again under the lock, because threads
    /// that raced past the first check must not construct a second store.
    /// The flag is published with a release store after the instance is in
    /// place, so observing `true` implies observing the finished store.
    pub fn double_checked(&self) -> &'static KeyValueStore {
        if self.initialized.load(Ordering::Acquire) {
            if let Some(store) = self.current() {
                return store;
            }
        }

        let _guard = self.lock.lock();
        // the lock orders this load against the store below
        if self.initialized.load(Ordering::Relaxed) {
            if let Some(store) = self.current() {
                return store;
            }
        }
        let store = self.current_or_construct(Strategy::DoubleChecked);
        self.initialized.store(true, Ordering::Release);
        store
    }

    /// Returns the current store without initializing anything.
    pub fn peek(&self) -> Option<&'static KeyValueStore> {
        self.current()
    }

    /// Returns how many stores this registry has constructed.
    ///
    /// Anything above one means the unsynchronized strategy lost a race.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Acquire)
    }

    fn current(&self) -> Option<&'static KeyValueStore> {
        let raw = self.instance.load(Ordering::Acquire);
        // SAFETY: the slot only ever holds null or a pointer obtained from
        // `Box::leak`, which is never freed and never mutated through.
        unsafe { raw.as_ref() }
    }

    /// Callers must hold `self.lock`.
    fn current_or_construct(&self, strategy: Strategy) -> &'static KeyValueStore {
        match self.current() {
            Some(store) => store,
            None => self.construct(strategy),
        }
    }

    fn construct(&self, strategy: Strategy) -> &'static KeyValueStore {
        let store: &'static KeyValueStore = Box::leak(Box::new(KeyValueStore::new()));
        let count = self.constructions.fetch_add(1, Ordering::AcqRel) + 1;
        self.instance.store(
            store as *const KeyValueStore as *mut KeyValueStore,
            Ordering::Release,
        );
        if count > 1 {
            log::warn!(
                "{strategy}: constructed store #{} as construction {count}, previous instance orphaned",
                store.id()
            );
        } else {
            log::debug!("{strategy}: constructed store #{}", store.id());
        }
        store
    }
}

impl Default for SingletonRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SingletonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonRegistry")
            .field("instance", &self.current().map(KeyValueStore::id))
            .field("initialized", &self.initialized.load(Ordering::Relaxed))
            .field("constructions", &self.constructions())
            .finish()
    }
}

/// The process-wide registry behind [`instance`].
static GLOBAL: SingletonRegistry = SingletonRegistry::new();

/// Returns the process-wide registry.
pub fn global() -> &'static SingletonRegistry {
    &GLOBAL
}

/// Resolves the process-wide store using `strategy`.
///
/// ```rust
/// use contesa::registry::{instance, Strategy};
///
/// let store = instance(Strategy::OnceGuarded);
/// store.set("nome", "João");
/// assert_eq!(instance(Strategy::DoubleChecked).get("nome").as_deref(), Some("João"));
/// ```
pub fn instance(strategy: Strategy) -> &'static KeyValueStore {
    GLOBAL.get(strategy)
}
