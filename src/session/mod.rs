use crate::storage::{CredentialStore, Tier};
use leptos::logging::log;

/// Owns the bearer token and its two storage tiers.
///
/// Readers always go through the ephemeral tier; a durable token is copied
/// there once at startup by [`Session::promote_durable`].
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Session<S> {
    store: S,
}

impl<S: CredentialStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run once per application load, before the first route.
    pub fn promote_durable(&self) {
        if let Some(token) = self.store.get(Tier::Durable) {
            self.store.set(Tier::Ephemeral, &token);
            log!("session: restored remembered credential");
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(Tier::Ephemeral)
    }

    pub fn store_token(&self, token: &str, remember: bool) {
        self.store.set(Tier::Ephemeral, token);
        if remember {
            self.store.set(Tier::Durable, token);
        }
    }

    pub fn clear(&self) {
        self.store.remove(Tier::Ephemeral);
        self.store.remove(Tier::Durable);
        log!("session: credentials cleared");
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryCredentialStore;

    fn session() -> Session<MemoryCredentialStore> {
        Session::new(MemoryCredentialStore::default())
    }

    #[test]
    fn test_promote_copies_durable_into_ephemeral() {
        let s = session();
        s.store().set(Tier::Durable, "remembered");

        s.promote_durable();

        assert_eq!(s.store().get(Tier::Ephemeral).as_deref(), Some("remembered"));
        assert_eq!(s.token().as_deref(), Some("remembered"));
    }

    #[test]
    fn test_promote_without_durable_is_noop() {
        let s = session();
        s.store().set(Tier::Ephemeral, "tab-only");

        s.promote_durable();

        assert_eq!(s.token().as_deref(), Some("tab-only"));
        assert!(s.store().get(Tier::Durable).is_none());
    }

    #[test]
    fn test_store_token_without_remember_stays_ephemeral() {
        let s = session();
        s.store_token("t", false);
        assert_eq!(s.store().get(Tier::Ephemeral).as_deref(), Some("t"));
        assert!(s.store().get(Tier::Durable).is_none());
    }

    #[test]
    fn test_store_token_with_remember_writes_both_tiers() {
        let s = session();
        s.store_token("t", true);
        assert_eq!(s.store().get(Tier::Ephemeral).as_deref(), Some("t"));
        assert_eq!(s.store().get(Tier::Durable).as_deref(), Some("t"));
    }

    #[test]
    fn test_clear_removes_both_tiers() {
        for (eph, dur) in [(true, true), (true, false), (false, true), (false, false)] {
            let s = session();
            if eph {
                s.store().set(Tier::Ephemeral, "e");
            }
            if dur {
                s.store().set(Tier::Durable, "d");
            }

            s.clear();

            assert!(s.store().get(Tier::Ephemeral).is_none());
            assert!(s.store().get(Tier::Durable).is_none());
            assert!(s.token().is_none());
        }
    }
}
