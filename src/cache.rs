use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::Result;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Result of a cache lookup. On failure `data` is the empty value and
/// `failure` carries the message to show once.
#[derive(Debug)]
pub struct Loaded<V> {
    pub data: Rc<V>,
    pub failure: Option<String>,
}

/// Time-bounded memo of workbook loads. Entries expire after `ttl`; file
/// changes are not detected. Failed loads are never stored.
pub struct Cache<K, V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: HashMap<K, (Instant, Rc<V>)>,
}

impl<K, V> Cache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
    V: Default,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K, V, C> Cache<K, V, C>
where
    K: Eq + Hash + Clone,
    V: Default,
    C: Clock,
{
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    pub fn get_or_load<F>(&mut self, key: &K, load: F) -> Loaded<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let now = self.clock.now();
        if let Some((loaded_at, data)) = self.entries.get(key) {
            if now.saturating_duration_since(*loaded_at) < self.ttl {
                debug!("cache hit");
                return Loaded {
                    data: Rc::clone(data),
                    failure: None,
                };
            }
        }

        match load() {
            Ok(value) => {
                let data = Rc::new(value);
                self.entries.insert(key.clone(), (now, Rc::clone(&data)));
                Loaded {
                    data,
                    failure: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "load failed");
                self.entries.remove(key);
                Loaded {
                    data: Rc::new(V::default()),
                    failure: Some(e.to_string()),
                }
            }
        }
    }
}
