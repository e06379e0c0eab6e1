//! Process environment access for unit tests.

use std::env;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// Holds the process-wide env lock and clears `names` before handing it out.
/// Every test that reads or writes environment variables takes this guard.
pub(crate) fn isolated(names: &[&str]) -> MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    let lock = GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    for name in names {
        env::remove_var(name);
    }
    lock
}
