use leptos::html;
use leptos::prelude::*;
use pulldown_cmark::{html::push_html, Options, Parser};

pub(crate) fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

/// Current document of a mounted editor, or `None` when it is not mounted.
pub(crate) fn editor_markdown(editor: NodeRef<html::Textarea>) -> Option<String> {
    editor.get_untracked().map(|el| el.value())
}

/// Markdown editor. Mounted only in edit mode; the text lives in the DOM
/// until [`editor_markdown`] reads it.
#[component]
pub fn MarkdownEditor(
    /// Content when mounted.
    #[prop(into)]
    initial: String,
    node_ref: NodeRef<html::Textarea>,
) -> impl IntoView {
    Effect::new(move |_| {
        if let Some(el) = node_ref.get() {
            let _ = el.focus();
        }
    });

    view! {
        <textarea
            data-name="MarkdownEditor"
            class="min-h-[60vh] w-full resize-y rounded-md border border-input bg-transparent p-3 font-mono text-sm outline-none focus-visible:ring-2 focus-visible:ring-ring/50"
            spellcheck="true"
            prop:value=initial
            node_ref=node_ref
        />
    }
}

#[component]
pub fn MarkdownViewer(#[prop(into)] markdown: Signal<String>) -> impl IntoView {
    let rendered = move || render_markdown(&markdown.get());

    view! { <article class="prose max-w-none dark:prose-invert" inner_html=rendered /> }
}
