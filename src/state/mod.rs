pub(crate) mod runtime;
pub(crate) mod update;

use crate::api::ApiError;
use crate::config::APP_NAME;
use crate::models::{notes_by_last_modified_desc, Note, SearchResult};
use crate::router::Route;

pub(crate) use runtime::{AppActions, Dispatcher};
pub(crate) use update::{update, Command, Msg};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum View {
    Login,
    Home,
    Search,
    Note,
    NotFound,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct LoginForm {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
    pub pending: bool,
    /// `redirect` query param captured from the login route.
    pub redirect: Option<String>,
    /// Why the user was sent here, shown above the form.
    pub notice: Option<String>,
}

/// An edit whose save was rejected because the session expired. Held while
/// the user logs in again and restored afterwards.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct StashedEdit {
    pub note: Note,
    pub title: String,
    pub content: String,
}

/// Kinds of loads that can be superseded by a later one of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoadKind {
    Notes,
    Search,
    /// Note load, save and delete share one sequence: any newer note action
    /// makes older responses stale.
    Note,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RequestId(u64);

#[derive(Clone, Debug, Default)]
pub(crate) struct RequestTracker {
    notes: u64,
    search: u64,
    note: u64,
}

impl RequestTracker {
    fn slot(&mut self, kind: LoadKind) -> &mut u64 {
        match kind {
            LoadKind::Notes => &mut self.notes,
            LoadKind::Search => &mut self.search,
            LoadKind::Note => &mut self.note,
        }
    }

    pub fn issue(&mut self, kind: LoadKind) -> RequestId {
        let slot = self.slot(kind);
        *slot += 1;
        RequestId(*slot)
    }

    pub fn is_current(&self, kind: LoadKind, id: RequestId) -> bool {
        let current = match kind {
            LoadKind::Notes => self.notes,
            LoadKind::Search => self.search,
            LoadKind::Note => self.note,
        };
        current == id.0
    }
}

/// All client state. Mutated only by [`update`].
#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub view: View,
    /// Current path + query, used as the login redirect target.
    pub location: String,
    /// Route parsed from `location`.
    pub route: Route,
    /// Set when the address bar is rewritten after a save; the matching
    /// `UrlChanged` is absorbed instead of reloading the note.
    pub replaced_location: Option<String>,

    pub login: LoginForm,

    pub notes: Vec<Note>,
    pub notes_loading: bool,

    /// Navbar search box.
    pub search_input: String,
    /// Term the current results belong to.
    pub search_term: String,
    /// `None` while a search is in flight.
    pub search_results: Option<Vec<SearchResult>>,

    pub current_note: Option<Note>,
    pub note_loading: bool,
    pub title_input: String,
    pub edit_mode: bool,
    pub saving: bool,
    /// Markdown of a save that has not been confirmed by the server yet.
    pub unsaved_content: Option<String>,
    pub stashed_edit: Option<StashedEdit>,

    pub error: Option<ApiError>,

    pub(crate) requests: RequestTracker,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Home,
            location: "/".to_string(),
            route: Route::Home,
            replaced_location: None,
            login: LoginForm::default(),
            notes: vec![],
            notes_loading: false,
            search_input: String::new(),
            search_term: String::new(),
            search_results: None,
            current_note: None,
            note_loading: false,
            title_input: String::new(),
            edit_mode: false,
            saving: false,
            unsaved_content: None,
            stashed_edit: None,
            error: None,
            requests: RequestTracker::default(),
        }
    }

    pub fn notes_by_last_modified_desc(&self) -> Vec<Note> {
        notes_by_last_modified_desc(&self.notes)
    }

    pub fn document_title(&self) -> String {
        let suffix = match self.view {
            View::Login => Some("Login"),
            View::Search => Some("Search"),
            View::Note => self
                .current_note
                .as_ref()
                .map(|n| n.title.as_str())
                .filter(|t| !t.is_empty()),
            View::Home | View::NotFound => None,
        };

        match suffix {
            Some(s) => format!("{s} - {APP_NAME}"),
            None => APP_NAME.to_string(),
        }
    }

    /// Markdown the editor should open with.
    pub fn editor_seed(&self) -> String {
        self.unsaved_content.clone().unwrap_or_else(|| {
            self.current_note
                .as_ref()
                .map(|n| n.content_or_empty().to_string())
                .unwrap_or_default()
        })
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
