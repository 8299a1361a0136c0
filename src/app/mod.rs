use crate::config::{EnvConfig, ShortcutConfig};
use crate::editor::editor_markdown;
use crate::pages::{page_for, EditorRef};
use crate::router::RouteQuery;
use crate::session::Session;
use crate::shortcuts::{shortcut_for, Shortcut};
use crate::state::runtime::NavigateFn;
use crate::state::{AppActions, AppState, Dispatcher, Msg};
use crate::storage::WebCredentialStore;
use crate::util::{key_input, set_document_title};
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;
use leptos_router::components::Router;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;
use std::sync::Arc;

#[component]
pub fn App() -> impl IntoView {
    // IMPORTANT:
    // - Leptos CSR requires the `csr` feature on `leptos`.
    // - router hooks require a <Router> context.
    view! {
        <Router>
            <Shell />
        </Router>
    }
}

/// Owns the app state and wires the browser to it: URL changes in, document
/// title and keyboard shortcuts out.
#[component]
fn Shell() -> impl IntoView {
    let session = Session::new(WebCredentialStore);
    session.promote_durable();

    let navigate = use_navigate();
    let navigate: NavigateFn = Arc::new(move |href: &str, replace: bool| {
        navigate(
            href,
            NavigateOptions {
                replace,
                ..Default::default()
            },
        )
    });

    let state = RwSignal::new(AppState::new());
    let app = Dispatcher::new(state, session, &EnvConfig::new(), navigate);
    provide_context(app);
    provide_context(AppActions {
        logout: Callback::new(move |_| app.dispatch(Msg::LogoutRequested)),
    });

    let editor_ref: NodeRef<html::Textarea> = NodeRef::new();
    provide_context(EditorRef(editor_ref));

    let location = use_location();
    Effect::new(move |_| {
        let path = location.pathname.get();
        let search = location.search.get();
        let query = location.query.with(RouteQuery::from_params);
        untrack(|| {
            app.dispatch(Msg::UrlChanged {
                path,
                search,
                query,
            })
        });
    });

    Effect::new(move |_| {
        let title = state.with(|s| s.document_title());
        set_document_title(&title);
    });

    let shortcuts = ShortcutConfig::default();
    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let input = key_input(&ev);
        match state.with_untracked(|s| shortcut_for(s, &input, shortcuts)) {
            Some(Shortcut::Edit) => {
                ev.prevent_default();
                app.dispatch(Msg::ToggleEditMode);
            }
            Some(Shortcut::Save) => {
                ev.prevent_default();
                if let Some(markdown) = editor_markdown(editor_ref) {
                    app.dispatch(Msg::SaveRequested { markdown });
                }
            }
            None => {}
        }
    });

    let view_kind = Memo::new(move |_| state.with(|s| s.view));

    view! {
        <div class="min-h-screen bg-background">
            <main class="mx-auto w-full max-w-[960px] px-4 py-8">
                {move || page_for(view_kind.get())}
            </main>
        </div>
    }
}
