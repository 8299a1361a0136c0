use super::{AppState, LoadKind, RequestId, StashedEdit, View};
use crate::api::{ApiError, ApiResult};
use crate::config::MARKDOWN_EXT;
use crate::models::{Note, NoteResponse, SearchResult, SearchResultResponse};
use crate::router::{login_href, safe_redirect, search_href, Route, RouteQuery};
use leptos::logging::{log, warn};

const SESSION_EXPIRED: &str = "Your session has expired. Log in again to continue.";
const SAVE_SESSION_EXPIRED: &str =
    "Your session has expired. Log in again to finish saving your note.";

/// Everything that can happen to the client: user input, navigation and
/// network responses.
#[derive(Clone, Debug)]
pub(crate) enum Msg {
    /// `search` is the raw query string, `query` the params the router parsed from it.
    UrlChanged {
        path: String,
        search: String,
        query: RouteQuery,
    },
    /// An in-app link was clicked. The router ignores links to the current
    /// URL, so those re-enter the route here.
    LinkFollowed(String),

    UsernameInput(String),
    PasswordInput(String),
    RememberMeInput(bool),
    LoginSubmitted,
    LoginFinished {
        remember: bool,
        result: ApiResult<String>,
    },
    LogoutRequested,

    SearchInput(String),
    SearchSubmitted,

    NotesLoaded {
        request: RequestId,
        result: ApiResult<Vec<NoteResponse>>,
    },
    SearchLoaded {
        request: RequestId,
        result: ApiResult<Vec<SearchResultResponse>>,
    },
    NoteLoaded {
        request: RequestId,
        result: ApiResult<NoteResponse>,
    },

    NewNote,
    TitleInput(String),
    ToggleEditMode,
    /// Leave edit mode dropping the pending rename and any unsaved text.
    CancelEdit,
    SaveRequested { markdown: String },
    NoteSaved {
        request: RequestId,
        result: ApiResult<NoteResponse>,
    },
    DeleteRequested,
    DeleteConfirmed { filename: String },
    NoteDeleted {
        request: RequestId,
        result: ApiResult<()>,
    },

    DismissError,
}

/// Side effects requested by [`update`]; executed by the runtime.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Authenticate {
        username: String,
        password: String,
        remember: bool,
    },
    FetchNotes {
        request: RequestId,
    },
    FetchSearch {
        request: RequestId,
        term: String,
    },
    FetchNote {
        request: RequestId,
        filename: String,
    },
    CreateNote {
        request: RequestId,
        filename: String,
        content: String,
    },
    UpdateNote {
        request: RequestId,
        filename: String,
        new_filename: String,
        new_content: String,
    },
    DeleteNote {
        request: RequestId,
        filename: String,
    },
    /// Ask the user; on yes the runtime sends `Msg::DeleteConfirmed`.
    ConfirmDelete {
        filename: String,
        title: String,
    },
    StoreCredential {
        token: String,
        remember: bool,
    },
    ClearCredentials,
    /// Client-side navigation; re-enters via `Msg::UrlChanged`.
    Navigate(String),
    /// Rewrite the address bar without navigating.
    ReplaceUrl(String),
}

fn with_ext(title: &str, ext: &str) -> String {
    let ext = if ext.is_empty() { MARKDOWN_EXT } else { ext };
    format!("{title}.{ext}")
}

fn is_stale(state: &AppState, kind: LoadKind, request: RequestId) -> bool {
    let stale = !state.requests.is_current(kind, request);
    if stale {
        log!("discarding stale {kind:?} response");
    }
    stale
}

/// Navigate to `href`. The router does not report a navigation to the URL it
/// is already on, so that case re-enters the current route directly.
fn go(state: &mut AppState, href: String) -> Vec<Command> {
    if href == state.location {
        return reenter(state);
    }
    vec![Command::Navigate(href)]
}

fn reenter(state: &mut AppState) -> Vec<Command> {
    let route = state.route.clone();
    enter(state, route)
}

/// Send the user to login, remembering where they were.
fn sign_in_again(state: &mut AppState, notice: &str) -> Vec<Command> {
    let back = state.location.clone();
    state.login.notice = Some(notice.to_string());
    vec![Command::Navigate(login_href(Some(&back)))]
}

/// Surface an API error. A 401 sends the user to login.
fn fail(state: &mut AppState, e: ApiError) -> Vec<Command> {
    warn!("request failed: {e}");
    if e.is_unauthorized() && state.view != View::Login {
        return sign_in_again(state, SESSION_EXPIRED);
    }
    state.error = Some(e);
    vec![]
}

fn route(state: &mut AppState, path: &str, search: &str, query: &RouteQuery) -> Vec<Command> {
    let search = search.trim_start_matches('?');
    let location = if search.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{search}")
    };
    let route = Route::parse(path, query);
    log!("route: {location} -> {route:?}");

    state.route = route.clone();
    let absorbed = state.replaced_location.take().as_deref() == Some(location.as_str());
    state.location = location;
    if absorbed {
        return vec![];
    }
    enter(state, route)
}

fn enter(state: &mut AppState, route: Route) -> Vec<Command> {
    state.error = None;
    if !matches!(route, Route::Login { .. }) {
        state.login.notice = None;
        state.stashed_edit = None;
    }

    match route {
        Route::Home => {
            state.view = View::Home;
            state.notes.clear();
            state.notes_loading = true;
            let request = state.requests.issue(LoadKind::Notes);
            vec![Command::FetchNotes { request }]
        }
        Route::Search { term } => {
            state.view = View::Search;
            state.search_input = term.clone();
            load_search_results(state, term)
        }
        Route::Note { stem } => {
            state.view = View::Note;
            state.edit_mode = false;
            state.unsaved_content = None;
            state.note_loading = true;
            let request = state.requests.issue(LoadKind::Note);
            vec![Command::FetchNote {
                request,
                filename: format!("{stem}.{MARKDOWN_EXT}"),
            }]
        }
        Route::Login { redirect } => {
            state.view = View::Login;
            state.login.redirect = redirect;
            vec![]
        }
        Route::NotFound => {
            state.view = View::NotFound;
            vec![]
        }
    }
}

/// An empty term is still sent; the server answers with an empty list.
fn load_search_results(state: &mut AppState, term: String) -> Vec<Command> {
    let request = state.requests.issue(LoadKind::Search);
    state.search_term = term.clone();
    state.search_results = None;
    vec![Command::FetchSearch { request, term }]
}

fn save_note(state: &mut AppState, markdown: String) -> Vec<Command> {
    if state.saving {
        return vec![];
    }
    let Some(note) = state.current_note.clone() else {
        return vec![];
    };

    let title = state.title_input.trim().to_string();
    let content_changed = markdown != note.content_or_empty();
    let title_changed = title != note.title;

    if !note.is_draft() && !content_changed && !title_changed {
        state.edit_mode = false;
        state.unsaved_content = None;
        return vec![];
    }

    state.unsaved_content = Some(markdown.clone());

    if title.is_empty() {
        state.error = Some(ApiError::validation("A note needs a title"));
        return vec![];
    }

    state.saving = true;
    state.error = None;
    let request = state.requests.issue(LoadKind::Note);

    if note.is_draft() {
        vec![Command::CreateNote {
            request,
            filename: with_ext(&title, MARKDOWN_EXT),
            content: markdown,
        }]
    } else {
        vec![Command::UpdateNote {
            request,
            filename: note.filename.clone(),
            new_filename: with_ext(&title, &note.ext),
            new_content: markdown,
        }]
    }
}

/// Put a stashed edit back in the editor, exactly as it was when the save failed.
fn restore_edit(state: &mut AppState, edit: StashedEdit) {
    let _ = state.requests.issue(LoadKind::Note);
    state.view = View::Note;
    state.note_loading = false;
    state.current_note = Some(edit.note);
    state.title_input = edit.title;
    state.unsaved_content = Some(edit.content);
    state.edit_mode = true;
}

/// The single state transition function.
pub(crate) fn update(state: &mut AppState, msg: Msg) -> Vec<Command> {
    match msg {
        Msg::UrlChanged {
            path,
            search,
            query,
        } => route(state, &path, &search, &query),
        // The router handles links that change the URL.
        Msg::LinkFollowed(href) if href == state.location => reenter(state),
        Msg::LinkFollowed(_) => vec![],

        Msg::UsernameInput(v) => {
            state.login.username = v;
            vec![]
        }
        Msg::PasswordInput(v) => {
            state.login.password = v;
            vec![]
        }
        Msg::RememberMeInput(v) => {
            state.login.remember_me = v;
            vec![]
        }
        Msg::LoginSubmitted => {
            if state.login.pending {
                return vec![];
            }
            state.login.pending = true;
            state.error = None;
            vec![Command::Authenticate {
                username: state.login.username.clone(),
                password: state.login.password.clone(),
                remember: state.login.remember_me,
            }]
        }
        Msg::LoginFinished { remember, result } => {
            state.login.pending = false;
            state.login.username.clear();
            state.login.password.clear();
            state.login.remember_me = false;

            match result {
                Ok(token) => {
                    state.login.notice = None;
                    let target = safe_redirect(state.login.redirect.take().as_deref());
                    if let Some(edit) = state.stashed_edit.take() {
                        log!("restoring unsaved edit of {:?}", edit.note.filename);
                        restore_edit(state, edit);
                        state.replaced_location = Some(target.clone());
                    }
                    vec![
                        Command::StoreCredential { token, remember },
                        Command::Navigate(target),
                    ]
                }
                Err(e) => {
                    warn!("login failed: {e}");
                    state.error = Some(e);
                    vec![]
                }
            }
        }
        Msg::LogoutRequested => {
            state.notes.clear();
            state.search_results = None;
            state.current_note = None;
            state.title_input.clear();
            state.edit_mode = false;
            state.unsaved_content = None;
            state.stashed_edit = None;
            state.login.notice = None;
            let mut cmds = vec![Command::ClearCredentials];
            cmds.extend(go(state, Route::Login { redirect: None }.href()));
            cmds
        }

        Msg::SearchInput(v) => {
            state.search_input = v;
            vec![]
        }
        Msg::SearchSubmitted => {
            let href = search_href(state.search_input.trim());
            go(state, href)
        }

        Msg::NotesLoaded { request, result } => {
            if is_stale(state, LoadKind::Notes, request) {
                return vec![];
            }
            state.notes_loading = false;
            match result {
                Ok(list) => {
                    state.notes = list
                        .into_iter()
                        .map(|r| Note::new(r.filename, Some(r.last_modified), None))
                        .collect();
                    vec![]
                }
                Err(e) => fail(state, e),
            }
        }
        Msg::SearchLoaded { request, result } => {
            if is_stale(state, LoadKind::Search, request) {
                return vec![];
            }
            match result {
                Ok(list) => {
                    state.search_results = Some(list.into_iter().map(SearchResult::from).collect());
                    vec![]
                }
                Err(e) => {
                    state.search_results = Some(vec![]);
                    fail(state, e)
                }
            }
        }
        Msg::NoteLoaded { request, result } => {
            if is_stale(state, LoadKind::Note, request) {
                return vec![];
            }
            state.note_loading = false;
            match result {
                Ok(r) => {
                    let note = Note::from(r);
                    state.title_input = note.title.clone();
                    state.current_note = Some(note);
                    vec![]
                }
                Err(e) => {
                    state.current_note = None;
                    fail(state, e)
                }
            }
        }

        Msg::NewNote => {
            // A late load response must not replace the draft.
            let _ = state.requests.issue(LoadKind::Note);
            state.note_loading = false;
            state.current_note = Some(Note::draft());
            state.title_input.clear();
            state.unsaved_content = None;
            state.error = None;
            state.edit_mode = true;
            state.view = View::Note;
            vec![]
        }
        Msg::TitleInput(v) => {
            state.title_input = v;
            vec![]
        }
        Msg::ToggleEditMode => {
            state.edit_mode = !state.edit_mode;
            vec![]
        }
        Msg::CancelEdit => {
            state.edit_mode = false;
            state.unsaved_content = None;
            state.error = None;
            let saved_title = state
                .current_note
                .as_ref()
                .filter(|n| !n.is_draft())
                .map(|n| n.title.clone());
            match saved_title {
                Some(title) => {
                    state.title_input = title;
                    vec![]
                }
                // A draft has nothing to show once editing stops.
                None => {
                    state.title_input.clear();
                    go(state, Route::Home.href())
                }
            }
        }
        Msg::SaveRequested { markdown } => save_note(state, markdown),
        Msg::NoteSaved { request, result } => {
            state.saving = false;
            if is_stale(state, LoadKind::Note, request) {
                return vec![];
            }
            match result {
                Ok(r) => {
                    let note = Note::from(r);
                    let href = note.href.clone();
                    state.title_input = note.title.clone();
                    state.current_note = Some(note);
                    state.unsaved_content = None;
                    state.edit_mode = false;
                    state.location = href.clone();
                    state.route = Route::parse(&href, &RouteQuery::default());
                    state.replaced_location = Some(href.clone());
                    vec![Command::ReplaceUrl(href)]
                }
                Err(e) if e.is_unauthorized() => {
                    warn!("save rejected: {e}");
                    if let Some(note) = state.current_note.clone() {
                        state.stashed_edit = Some(StashedEdit {
                            note,
                            title: state.title_input.clone(),
                            content: state.unsaved_content.clone().unwrap_or_default(),
                        });
                    }
                    sign_in_again(state, SAVE_SESSION_EXPIRED)
                }
                Err(e) => fail(state, e),
            }
        }
        Msg::DeleteRequested => match &state.current_note {
            Some(note) if !note.is_draft() => vec![Command::ConfirmDelete {
                filename: note.filename.clone(),
                title: note.title.clone(),
            }],
            _ => vec![],
        },
        Msg::DeleteConfirmed { filename } => {
            let request = state.requests.issue(LoadKind::Note);
            vec![Command::DeleteNote { request, filename }]
        }
        Msg::NoteDeleted { request, result } => {
            if is_stale(state, LoadKind::Note, request) {
                return vec![];
            }
            match result {
                Ok(()) => {
                    state.current_note = None;
                    state.edit_mode = false;
                    go(state, Route::Home.href())
                }
                Err(e) => fail(state, e),
            }
        }

        Msg::DismissError => {
            state.error = None;
            vec![]
        }
    }
}
