use super::{update, AppState, Command, Msg};
use crate::api::ApiClient;
use crate::config::EnvConfig;
use crate::session::Session;
use crate::storage::WebCredentialStore;
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::sync::Arc;

/// `(href, replace)`; wraps the router's navigate.
pub(crate) type NavigateFn = Arc<dyn Fn(&str, bool) + Send + Sync>;

/// Feeds messages through [`update`] and executes the resulting commands.
///
/// Network responses come back as messages, so every state change still goes
/// through the one update function.
#[derive(Clone, Copy)]
pub(crate) struct Dispatcher {
    state: RwSignal<AppState>,
    session: Session<WebCredentialStore>,
    api_url: StoredValue<String>,
    navigate: StoredValue<NavigateFn>,
}

impl Dispatcher {
    pub fn new(
        state: RwSignal<AppState>,
        session: Session<WebCredentialStore>,
        config: &EnvConfig,
        navigate: NavigateFn,
    ) -> Self {
        Self {
            state,
            session,
            api_url: StoredValue::new(config.api_url.clone()),
            navigate: StoredValue::new(navigate),
        }
    }

    pub fn state(&self) -> RwSignal<AppState> {
        self.state
    }

    pub fn dispatch(&self, msg: Msg) {
        let mut commands = vec![];
        self.state.update(|s| commands = update(s, msg));
        for command in commands {
            self.run(command);
        }
    }

    fn api(&self) -> ApiClient {
        ApiClient::new(self.api_url.get_value(), self.session.token())
    }

    fn run(&self, command: Command) {
        let this = *self;
        match command {
            Command::Authenticate {
                username,
                password,
                remember,
            } => {
                let api = self.api();
                spawn_local(async move {
                    let result = api
                        .login(&username, &password)
                        .await
                        .map(|r| r.access_token);
                    this.dispatch(Msg::LoginFinished { remember, result });
                });
            }
            Command::FetchNotes { request } => {
                let api = self.api();
                spawn_local(async move {
                    let result = api.get_notes().await;
                    this.dispatch(Msg::NotesLoaded { request, result });
                });
            }
            Command::FetchSearch { request, term } => {
                let api = self.api();
                spawn_local(async move {
                    let result = api.search(&term).await;
                    this.dispatch(Msg::SearchLoaded { request, result });
                });
            }
            Command::FetchNote { request, filename } => {
                let api = self.api();
                spawn_local(async move {
                    let result = api.get_note(&filename).await;
                    this.dispatch(Msg::NoteLoaded { request, result });
                });
            }
            Command::CreateNote {
                request,
                filename,
                content,
            } => {
                log!("creating {filename}");
                let api = self.api();
                spawn_local(async move {
                    let result = api.create_note(&filename, &content).await;
                    this.dispatch(Msg::NoteSaved { request, result });
                });
            }
            Command::UpdateNote {
                request,
                filename,
                new_filename,
                new_content,
            } => {
                log!("saving {filename} as {new_filename}");
                let api = self.api();
                spawn_local(async move {
                    let result = api
                        .update_note(&filename, &new_filename, &new_content)
                        .await;
                    this.dispatch(Msg::NoteSaved { request, result });
                });
            }
            Command::DeleteNote { request, filename } => {
                log!("deleting {filename}");
                let api = self.api();
                spawn_local(async move {
                    let result = api.delete_note(&filename).await;
                    this.dispatch(Msg::NoteDeleted { request, result });
                });
            }
            Command::ConfirmDelete { filename, title } => {
                let prompt = format!("Are you sure you want to delete the note '{title}'?");
                if window().confirm_with_message(&prompt).unwrap_or(false) {
                    self.dispatch(Msg::DeleteConfirmed { filename });
                }
            }
            Command::StoreCredential { token, remember } => {
                self.session.store_token(&token, remember);
            }
            Command::ClearCredentials => self.session.clear(),
            Command::Navigate(href) => self.navigate.with_value(|nav| nav(&href, false)),
            Command::ReplaceUrl(href) => self.navigate.with_value(|nav| nav(&href, true)),
        }
    }
}

/// Actions any component can trigger without holding the dispatcher.
#[derive(Clone)]
pub(crate) struct AppActions {
    pub logout: Callback<()>,
}
