use std::sync::{LazyLock, Mutex};

/// Serializes env-var mutation across config tests. Every test that builds
/// an [`EnvVarGuard`] must hold this lock first.
pub(super) static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Scoped env-var override that restores the previous value on drop.
pub(super) struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl EnvVarGuard {
    pub(super) fn set(key: &'static str, value: &str) -> Self {
        let guard = Self::capture(key);
        // SAFETY: test-only mutation, serialized by ENV_LOCK which the
        // calling test holds for the guard's whole lifetime.
        unsafe {
            std::env::set_var(key, value);
        }
        guard
    }

    pub(super) fn unset(key: &'static str) -> Self {
        let guard = Self::capture(key);
        // SAFETY: as in `set`; drop restores the captured value.
        unsafe {
            std::env::remove_var(key);
        }
        guard
    }

    fn capture(key: &'static str) -> Self {
        Self {
            key,
            previous: std::env::var(key).ok(),
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: drop runs while the enclosing test still holds ENV_LOCK.
        unsafe {
            match self.previous.take() {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }
}
