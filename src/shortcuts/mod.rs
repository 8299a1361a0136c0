use crate::config::ShortcutConfig;
use crate::state::{AppState, View};

/// The parts of a `keydown` event the shortcuts care about.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    /// Focus is in an input, textarea or contenteditable element.
    pub in_text_field: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shortcut {
    /// `e`: enter edit mode.
    Edit,
    /// `Ctrl+S`: save the note being edited.
    Save,
}

pub(crate) fn shortcut_for(
    state: &AppState,
    input: &KeyInput,
    config: ShortcutConfig,
) -> Option<Shortcut> {
    if state.view != View::Note {
        return None;
    }

    let key = input.key.to_lowercase();
    let plain = !input.ctrl && !input.meta && !input.alt;

    if key == "e" && plain && !input.in_text_field && !state.edit_mode {
        return Some(Shortcut::Edit);
    }

    if config.save_with_ctrl_s && key == "s" && (input.ctrl || input.meta) && state.edit_mode {
        return Some(Shortcut::Save);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> KeyInput {
        KeyInput {
            key: k.to_string(),
            ..Default::default()
        }
    }

    fn note_view(edit_mode: bool) -> AppState {
        let mut s = AppState::new();
        s.view = View::Note;
        s.edit_mode = edit_mode;
        s
    }

    #[test]
    fn test_e_enters_edit_mode_on_note_view() {
        let s = note_view(false);
        assert_eq!(
            shortcut_for(&s, &key("e"), ShortcutConfig::default()),
            Some(Shortcut::Edit)
        );
    }

    #[test]
    fn test_e_ignored_while_typing() {
        let s = note_view(false);
        let mut k = key("e");
        k.in_text_field = true;
        assert_eq!(shortcut_for(&s, &k, ShortcutConfig::default()), None);
    }

    #[test]
    fn test_e_ignored_when_already_editing_or_other_view() {
        assert_eq!(
            shortcut_for(&note_view(true), &key("e"), ShortcutConfig::default()),
            None
        );

        let mut home = AppState::new();
        home.view = View::Home;
        assert_eq!(shortcut_for(&home, &key("e"), ShortcutConfig::default()), None);
    }

    #[test]
    fn test_e_with_modifier_is_not_a_shortcut() {
        let mut k = key("e");
        k.ctrl = true;
        assert_eq!(
            shortcut_for(&note_view(false), &k, ShortcutConfig::default()),
            None
        );
    }

    #[test]
    fn test_ctrl_s_only_when_enabled() {
        let mut k = key("s");
        k.ctrl = true;
        k.in_text_field = true;
        let s = note_view(true);

        assert_eq!(shortcut_for(&s, &k, ShortcutConfig::default()), None);
        assert_eq!(
            shortcut_for(
                &s,
                &k,
                ShortcutConfig {
                    save_with_ctrl_s: true
                }
            ),
            Some(Shortcut::Save)
        );
    }
}
