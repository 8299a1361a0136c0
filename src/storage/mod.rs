use crate::config::TOKEN_KEY;

/// Where a credential lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Tier {
    /// Gone when the browsing context ends (`sessionStorage`).
    Ephemeral,
    /// Survives restarts (`localStorage`).
    Durable,
}

/// Backing store for the bearer token, keyed by [`TOKEN_KEY`] in each tier.
pub(crate) trait CredentialStore {
    fn get(&self, tier: Tier) -> Option<String>;
    fn set(&self, tier: Tier, token: &str);
    fn remove(&self, tier: Tier);
}

/// Browser web storage.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct WebCredentialStore;

impl WebCredentialStore {
    fn storage(tier: Tier) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match tier {
            Tier::Ephemeral => window.session_storage().ok().flatten(),
            Tier::Durable => window.local_storage().ok().flatten(),
        }
    }
}

impl CredentialStore for WebCredentialStore {
    fn get(&self, tier: Tier) -> Option<String> {
        Self::storage(tier).and_then(|s| s.get_item(TOKEN_KEY).ok().flatten())
    }

    fn set(&self, tier: Tier, token: &str) {
        if let Some(storage) = Self::storage(tier) {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }

    fn remove(&self, tier: Tier) {
        if let Some(storage) = Self::storage(tier) {
            let _ = storage.remove_item(TOKEN_KEY);
        }
    }
}


// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_web_store_tiers_are_independent() {
        let store = WebCredentialStore;
        store.remove(Tier::Ephemeral);
        store.remove(Tier::Durable);

        store.set(Tier::Durable, "t1");
        assert_eq!(store.get(Tier::Durable).as_deref(), Some("t1"));
        assert!(store.get(Tier::Ephemeral).is_none());

        store.remove(Tier::Durable);
        assert!(store.get(Tier::Durable).is_none());
    }
}
