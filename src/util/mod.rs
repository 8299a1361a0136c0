use crate::shortcuts::KeyInput;
use wasm_bindgen::JsCast;

/// Local date/time for a server timestamp in seconds.
pub(crate) fn format_timestamp(seconds: f64) -> String {
    let d = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(seconds * 1000.0));
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        d.get_full_year(),
        d.get_month() + 1,
        d.get_date(),
        d.get_hours(),
        d.get_minutes()
    )
}

pub(crate) fn set_document_title(title: &str) {
    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
        document.set_title(title);
    }
}

fn is_text_field(el: &web_sys::Element) -> bool {
    let tag = el.tag_name().to_lowercase();
    if tag == "input" || tag == "textarea" {
        return true;
    }
    el.dyn_ref::<web_sys::HtmlElement>()
        .map(|h| h.is_content_editable())
        .unwrap_or(false)
}

pub(crate) fn key_input(ev: &web_sys::KeyboardEvent) -> KeyInput {
    let in_text_field = ev
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .map(|el| is_text_field(&el))
        .unwrap_or(false);

    KeyInput {
        key: ev.key(),
        ctrl: ev.ctrl_key(),
        meta: ev.meta_key(),
        alt: ev.alt_key(),
        in_text_field,
    }
}
