use crate::config::NOTE_SEGMENT;
use serde::{Deserialize, Serialize};

/// Note object as returned by `/api/notes` and `/api/notes/{filename}`.
///
/// The list endpoint omits `content`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NoteResponse {
    pub filename: String,
    pub last_modified: f64,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResultResponse {
    pub filename: String,
    pub last_modified: f64,
    #[serde(default)]
    pub title_highlights: Option<String>,
    #[serde(default)]
    pub content_highlights: Option<String>,
}

/// Split `Recipe.md` into (`Recipe`, `md`). A name without a dot has no extension.
pub(crate) fn split_filename(filename: &str) -> (&str, &str) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => (filename, ""),
    }
}

/// Client route for a note stem, e.g. `/note/My%20Recipe`.
pub(crate) fn note_href(title: &str) -> String {
    format!("/{NOTE_SEGMENT}/{}", urlencoding::encode(title))
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Note {
    pub filename: String,
    pub title: String,
    /// `None` until the note has been persisted once.
    pub last_modified: Option<f64>,
    pub content: Option<String>,
    pub ext: String,
    pub href: String,
}

impl Note {
    pub fn new(filename: String, last_modified: Option<f64>, content: Option<String>) -> Self {
        let (title, ext) = split_filename(&filename);
        let title = title.to_string();
        let ext = ext.to_string();
        let href = note_href(&title);
        Self {
            filename,
            title,
            last_modified,
            content,
            ext,
            href,
        }
    }

    /// Empty, unsaved note.
    pub fn draft() -> Self {
        Self::new(String::new(), None, None)
    }

    pub fn is_draft(&self) -> bool {
        self.last_modified.is_none()
    }

    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

impl From<NoteResponse> for Note {
    fn from(r: NoteResponse) -> Self {
        Note::new(r.filename, Some(r.last_modified), r.content)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SearchResult {
    pub filename: String,
    pub title: String,
    pub last_modified: f64,
    pub title_highlights: Option<String>,
    pub content_highlights: Option<String>,
    pub href: String,
}

impl From<SearchResultResponse> for SearchResult {
    fn from(r: SearchResultResponse) -> Self {
        let title = split_filename(&r.filename).0.to_string();
        let href = note_href(&title);
        Self {
            filename: r.filename,
            title,
            last_modified: r.last_modified,
            title_highlights: r.title_highlights.filter(|s| !s.trim().is_empty()),
            content_highlights: r.content_highlights.filter(|s| !s.trim().is_empty()),
            href,
        }
    }
}

/// Most recently modified first. Drafts sort last.
pub(crate) fn notes_by_last_modified_desc(notes: &[Note]) -> Vec<Note> {
    let mut out = notes.to_vec();
    out.sort_by(|a, b| {
        let a = a.last_modified.unwrap_or(f64::NEG_INFINITY);
        let b = b.last_modified.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: &str, ts: f64) -> Note {
        Note::new(name.to_string(), Some(ts), None)
    }

    #[test]
    fn test_note_derives_title_ext_and_href() {
        let n = Note::new("Recipe.md".to_string(), Some(1000.0), Some("# Recipe".into()));
        assert_eq!(n.title, "Recipe");
        assert_eq!(n.ext, "md");
        assert_eq!(n.href, "/note/Recipe");
        assert!(!n.is_draft());
    }

    #[test]
    fn test_note_title_keeps_inner_dots() {
        let n = Note::new("v1.2 notes.md".to_string(), Some(1.0), None);
        assert_eq!(n.title, "v1.2 notes");
        assert_eq!(n.ext, "md");
        assert_eq!(n.href, "/note/v1.2%20notes");
    }

    #[test]
    fn test_draft_note_is_empty_and_unsaved() {
        let n = Note::draft();
        assert!(n.is_draft());
        assert_eq!(n.title, "");
        assert_eq!(n.content_or_empty(), "");
    }

    #[test]
    fn test_note_list_response_contract_deserialize() {
        let json = r#"[
            {"filename": "A.md", "lastModified": 1700000000.5},
            {"filename": "B.md", "lastModified": 12}
        ]"#;
        let parsed: Vec<NoteResponse> = serde_json::from_str(json).expect("list should parse");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].last_modified, 12.0);
        assert!(parsed[0].content.is_none());
    }

    #[test]
    fn test_search_result_contract_deserialize() {
        let json = r#"{
            "filename": "Eggs.md",
            "lastModified": 5,
            "titleHighlights": "<b class=\"match\">Eggs</b>",
            "contentHighlights": null
        }"#;
        let parsed: SearchResultResponse = serde_json::from_str(json).expect("should parse");
        let result = SearchResult::from(parsed);
        assert_eq!(result.title, "Eggs");
        assert_eq!(result.href, "/note/Eggs");
        assert!(result.title_highlights.is_some());
        assert!(result.content_highlights.is_none());
    }

    #[test]
    fn test_sort_desc_is_non_increasing_permutation() {
        let notes = vec![
            note("a.md", 3.0),
            note("b.md", 10.0),
            note("c.md", 1.0),
            note("d.md", 10.0),
            note("e.md", 7.5),
        ];
        let sorted = notes_by_last_modified_desc(&notes);

        assert_eq!(sorted.len(), notes.len());
        for pair in sorted.windows(2) {
            assert!(pair[0].last_modified >= pair[1].last_modified);
        }
        for n in &notes {
            assert_eq!(sorted.iter().filter(|s| s.filename == n.filename).count(), 1);
        }
    }

    #[test]
    fn test_sort_does_not_reorder_source() {
        let notes = vec![note("a.md", 1.0), note("b.md", 2.0)];
        let _ = notes_by_last_modified_desc(&notes);
        assert_eq!(notes[0].filename, "a.md");
    }
}
