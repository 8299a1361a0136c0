use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardHeader, CardItem, CardList, CardTitle, Input, Spinner,
};
use crate::config::APP_NAME;
use crate::editor::{editor_markdown, MarkdownEditor, MarkdownViewer};
use crate::models::{Note, SearchResult};
use crate::state::{AppActions, Dispatcher, Msg, View};
use crate::util::format_timestamp;
use icons::X;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;

/// Shared handle to the mounted editor, used by the save button and shortcuts.
#[derive(Clone, Copy)]
pub(crate) struct EditorRef(pub NodeRef<html::Textarea>);

#[component]
pub fn ErrorBanner() -> impl IntoView {
    let app = expect_context::<Dispatcher>();
    let state = app.state();
    let error = Memo::new(move |_| state.with(|s| s.error.as_ref().map(|e| e.to_string())));

    view! {
        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
            <Alert class="mb-4 border-destructive/30">
                <AlertDescription class="text-destructive">
                    {move || error.get().unwrap_or_default()}
                </AlertDescription>
                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    attr:aria-label="Dismiss"
                    on:click=move |_| app.dispatch(Msg::DismissError)
                >
                    <X />
                </Button>
            </Alert>
        </Show>
    }
}

#[component]
pub fn NavBar() -> impl IntoView {
    let app = expect_context::<Dispatcher>();
    let actions = expect_context::<AppActions>();
    let state = app.state();

    let search_value = Signal::derive(move || state.with(|s| s.search_input.clone()));

    let on_search = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        app.dispatch(Msg::SearchSubmitted);
    };

    view! {
        <header class="mb-6 flex flex-wrap items-center justify-between gap-3">
            <a
                href="/"
                class="text-lg font-semibold text-foreground"
                on:click=move |_| app.dispatch(Msg::LinkFollowed("/".to_string()))
            >
                {APP_NAME}
            </a>

            <form class="flex min-w-[12rem] flex-1 items-center gap-2 sm:max-w-md" on:submit=on_search>
                <Input
                    r#type="search"
                    placeholder="Search"
                    value=search_value
                    on_input=Callback::new(move |v| app.dispatch(Msg::SearchInput(v)))
                    class="h-8 text-sm"
                />
                <Button size=ButtonSize::Sm variant=ButtonVariant::Outline>"Search"</Button>
            </form>

            <div class="flex items-center gap-2">
                <Button size=ButtonSize::Sm on:click=move |_| app.dispatch(Msg::NewNote)>
                    "New note"
                </Button>
                <Button
                    size=ButtonSize::Sm
                    variant=ButtonVariant::Ghost
                    on:click=move |_| actions.logout.run(())
                >
                    "Log out"
                </Button>
            </div>
        </header>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let app = expect_context::<Dispatcher>();
    let state = app.state();

    let username = Signal::derive(move || state.with(|s| s.login.username.clone()));
    let password = Signal::derive(move || state.with(|s| s.login.password.clone()));
    let remember_me = Memo::new(move |_| state.with(|s| s.login.remember_me));
    let pending = Memo::new(move |_| state.with(|s| s.login.pending));
    let notice = Memo::new(move |_| state.with(|s| s.login.notice.clone()));

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        app.dispatch(Msg::LoginSubmitted);
    };

    view! {
        <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
            <div class="mb-6 flex items-center justify-center">
                <span class="text-lg font-semibold text-foreground">{APP_NAME}</span>
            </div>

            <Show when=move || notice.get().is_some() fallback=|| ().into_view()>
                <Alert class="mb-4">
                    <AlertDescription>{move || notice.get().unwrap_or_default()}</AlertDescription>
                </Alert>
            </Show>
            <ErrorBanner />

            <Card>
                <CardHeader>
                    <CardTitle class="text-lg">"Log in"</CardTitle>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-3" on:submit=on_submit>
                        <label class="flex flex-col gap-1.5 text-xs font-medium">
                            "Username"
                            <Input
                                id="username"
                                value=username
                                on_input=Callback::new(move |v| app.dispatch(Msg::UsernameInput(v)))
                                required=true
                                autofocus=true
                                class="h-8 text-sm"
                            />
                        </label>

                        <label class="flex flex-col gap-1.5 text-xs font-medium">
                            "Password"
                            <Input
                                id="password"
                                r#type="password"
                                value=password
                                on_input=Callback::new(move |v| app.dispatch(Msg::PasswordInput(v)))
                                required=true
                                class="h-8 text-sm"
                            />
                        </label>

                        <label class="flex items-center gap-2 text-xs">
                            <input
                                type="checkbox"
                                prop:checked=move || remember_me.get()
                                on:change=move |ev| app.dispatch(Msg::RememberMeInput(event_target_checked(&ev)))
                            />
                            "Remember me"
                        </label>

                        <Button class="w-full" size=ButtonSize::Sm attr:disabled=move || pending.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || pending.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || if pending.get() { "Logging in..." } else { "Log in" }}
                            </span>
                        </Button>
                    </form>
                </CardContent>
            </Card>
        </div>
    }
}

fn note_item(note: Note) -> impl IntoView {
    let modified = note.last_modified.map(format_timestamp).unwrap_or_default();
    view! {
        <CardItem>
            <a href=note.href class="text-sm font-medium hover:underline">{note.title}</a>
            <span class="text-xs text-muted-foreground">{modified}</span>
        </CardItem>
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app = expect_context::<Dispatcher>();
    let state = app.state();

    let notes = Memo::new(move |_| state.with(|s| s.notes_by_last_modified_desc()));
    let loading = Memo::new(move |_| state.with(|s| s.notes_loading));

    view! {
        <NavBar />
        <ErrorBanner />

        <Card>
            <CardHeader>
                <CardTitle>"Notes"</CardTitle>
                <CardDescription>{move || format!("{} total", notes.get().len())}</CardDescription>
            </CardHeader>

            <CardContent>
                <Show
                    when=move || !notes.get().is_empty()
                    fallback=move || view! {
                        <div class="flex items-center gap-2 text-xs text-muted-foreground">
                            <Show when=move || loading.get() fallback=|| view! { "No notes yet." }>
                                <Spinner />
                                "Loading notes..."
                            </Show>
                        </div>
                    }
                >
                    <CardList>
                        {move || notes.get().into_iter().map(note_item).collect_view()}
                    </CardList>
                </Show>
            </CardContent>
        </Card>
    }
}

fn search_result_item(result: SearchResult) -> impl IntoView {
    let title_html = result
        .title_highlights
        .clone()
        .unwrap_or_else(|| html_escape(&result.title));
    let content_html = result.content_highlights.clone();
    let modified = format_timestamp(result.last_modified);

    view! {
        <CardItem>
            <a
                href=result.href
                title=result.filename
                class="text-sm font-medium hover:underline"
                inner_html=title_html
            />
            {content_html.map(|html| view! {
                <p class="text-xs text-muted-foreground" inner_html=html />
            })}
            <span class="text-xs text-muted-foreground">{modified}</span>
        </CardItem>
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[component]
pub fn SearchPage() -> impl IntoView {
    let app = expect_context::<Dispatcher>();
    let state = app.state();

    let term = Memo::new(move |_| state.with(|s| s.search_term.clone()));
    let results = Memo::new(move |_| state.with(|s| s.search_results.clone()));

    view! {
        <NavBar />
        <ErrorBanner />

        <Card>
            <CardHeader>
                <CardTitle>"Search"</CardTitle>
                <CardDescription>{move || format!("Results for \"{}\"", term.get())}</CardDescription>
            </CardHeader>

            <CardContent>
                {move || match results.get() {
                    None => view! {
                        <div class="flex items-center gap-2 text-xs text-muted-foreground">
                            <Spinner />
                            "Searching..."
                        </div>
                    }
                    .into_any(),
                    Some(list) if list.is_empty() => view! {
                        <div class="text-xs text-muted-foreground">"No matching notes."</div>
                    }
                    .into_any(),
                    Some(list) => view! {
                        <CardList>{list.into_iter().map(search_result_item).collect_view()}</CardList>
                    }
                    .into_any(),
                }}
            </CardContent>
        </Card>
    }
}

#[component]
pub fn NotePage() -> impl IntoView {
    let app = expect_context::<Dispatcher>();
    let EditorRef(editor_ref) = expect_context::<EditorRef>();
    let state = app.state();

    let has_note = Memo::new(move |_| state.with(|s| s.current_note.is_some()));
    let is_draft = Memo::new(move |_| {
        state.with(|s| s.current_note.as_ref().is_some_and(|n| n.is_draft()))
    });
    let loading = Memo::new(move |_| state.with(|s| s.note_loading));
    let edit_mode = Memo::new(move |_| state.with(|s| s.edit_mode));
    let saving = Memo::new(move |_| state.with(|s| s.saving));
    let title = Memo::new(move |_| {
        state.with(|s| {
            s.current_note
                .as_ref()
                .map(|n| n.title.clone())
                .unwrap_or_default()
        })
    });
    let content = Memo::new(move |_| {
        state.with(|s| {
            s.current_note
                .as_ref()
                .map(|n| n.content_or_empty().to_string())
                .unwrap_or_default()
        })
    });
    let title_input = Signal::derive(move || state.with(|s| s.title_input.clone()));

    let on_save = move |_| {
        if let Some(markdown) = editor_markdown(editor_ref) {
            app.dispatch(Msg::SaveRequested { markdown });
        }
    };

    let missing = move || {
        view! {
            <div class="flex items-center gap-2 text-xs text-muted-foreground">
                <Show when=move || loading.get() fallback=|| view! { "This note could not be loaded." }>
                    <Spinner />
                    "Loading note..."
                </Show>
            </div>
        }
    };

    view! {
        <NavBar />
        <ErrorBanner />

        <Show when=move || has_note.get() fallback=missing>
            <div class="mb-4 flex flex-wrap items-center justify-between gap-3">
                <Show
                    when=move || edit_mode.get()
                    fallback=move || view! {
                        <h1 class="text-2xl font-semibold">{move || title.get()}</h1>
                        <div class="flex items-center gap-2">
                            <Button
                                size=ButtonSize::Sm
                                variant=ButtonVariant::Outline
                                on:click=move |_| app.dispatch(Msg::ToggleEditMode)
                            >
                                "Edit"
                            </Button>
                            <Show when=move || !is_draft.get() fallback=|| ().into_view()>
                                <Button
                                    size=ButtonSize::Sm
                                    variant=ButtonVariant::Destructive
                                    on:click=move |_| app.dispatch(Msg::DeleteRequested)
                                >
                                    "Delete"
                                </Button>
                            </Show>
                        </div>
                    }
                >
                    <Input
                        placeholder="Title"
                        value=title_input
                        on_input=Callback::new(move |v| app.dispatch(Msg::TitleInput(v)))
                        class="h-9 max-w-md text-lg font-semibold"
                    />
                    <div class="flex items-center gap-2">
                        <Button
                            size=ButtonSize::Sm
                            variant=ButtonVariant::Ghost
                            on:click=move |_| app.dispatch(Msg::CancelEdit)
                        >
                            "Cancel"
                        </Button>
                        <Button size=ButtonSize::Sm attr:disabled=move || saving.get() on:click=on_save>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || saving.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                "Save"
                            </span>
                        </Button>
                    </div>
                </Show>
            </div>

            <Show
                when=move || edit_mode.get()
                fallback=move || view! { <MarkdownViewer markdown=content /> }
            >
                <MarkdownEditor
                    initial=state.with_untracked(|s| s.editor_seed())
                    node_ref=editor_ref
                />
            </Show>
        </Show>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <NavBar />
        <div class="rounded-md border border-border bg-muted p-4 text-sm text-muted-foreground">
            "Page not found. "
            <a class="text-primary underline underline-offset-4" href="/">"Back to notes"</a>
        </div>
    }
}

/// Page for the active view.
pub(crate) fn page_for(view: View) -> AnyView {
    match view {
        View::Login => view! { <LoginPage /> }.into_any(),
        View::Home => view! { <HomePage /> }.into_any(),
        View::Search => view! { <SearchPage /> }.into_any(),
        View::Note => view! { <NotePage /> }.into_any(),
        View::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape_plain_titles() {
        assert_eq!(html_escape("a <b> & \"c\""), "a &lt;b&gt; &amp; &quot;c&quot;");
    }
}
