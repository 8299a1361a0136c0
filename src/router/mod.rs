use crate::config::{
    LOGIN_SEGMENT, NOTE_SEGMENT, REDIRECT_PARAM, SEARCH_SEGMENT, SEARCH_TERM_PARAM,
};
use crate::models::note_href;
use leptos_router::params::ParamsMap;

/// Query parameters the client routes on, read from the router's parsed query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RouteQuery {
    pub term: Option<String>,
    pub redirect: Option<String>,
}

impl RouteQuery {
    pub fn from_params(params: &ParamsMap) -> Self {
        Self {
            term: params.get(SEARCH_TERM_PARAM),
            redirect: params.get(REDIRECT_PARAM).filter(|r| !r.is_empty()),
        }
    }
}

/// Client-owned routes, resolved from the first path segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Route {
    Home,
    Search { term: String },
    Note { stem: String },
    Login { redirect: Option<String> },
    NotFound,
}

impl Route {
    /// `path` is `location.pathname`.
    pub fn parse(path: &str, query: &RouteQuery) -> Self {
        let mut segments = path.trim_start_matches('/').split('/');
        let base = segments.next().unwrap_or_default();

        match base {
            "" => Route::Home,
            SEARCH_SEGMENT => Route::Search {
                term: query.term.clone().unwrap_or_default(),
            },
            NOTE_SEGMENT => match segments.next().filter(|s| !s.is_empty()) {
                Some(stem) => Route::Note {
                    stem: decode(stem),
                },
                None => Route::NotFound,
            },
            LOGIN_SEGMENT => Route::Login {
                redirect: query.redirect.clone(),
            },
            _ => Route::NotFound,
        }
    }

    pub fn href(&self) -> String {
        match self {
            Route::Home | Route::NotFound => "/".to_string(),
            Route::Search { term } => search_href(term),
            Route::Note { stem } => note_href(stem),
            Route::Login { redirect } => login_href(redirect.as_deref()),
        }
    }
}

fn decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

pub(crate) fn search_href(term: &str) -> String {
    format!(
        "/{SEARCH_SEGMENT}?{SEARCH_TERM_PARAM}={}",
        urlencoding::encode(term)
    )
}

pub(crate) fn login_href(redirect: Option<&str>) -> String {
    match redirect.filter(|r| !r.is_empty()) {
        Some(r) => format!(
            "/{LOGIN_SEGMENT}?{REDIRECT_PARAM}={}",
            urlencoding::encode(r)
        ),
        None => format!("/{LOGIN_SEGMENT}"),
    }
}

/// Post-login destination. Only same-origin absolute paths are honored.
pub(crate) fn safe_redirect(redirect: Option<&str>) -> String {
    match redirect {
        Some(r) if r.starts_with('/') && !r.starts_with("//") => r.to_string(),
        _ => "/".to_string(),
    }
}

/// Splits an href into `(path, search, query)` the way the router reports it.
#[cfg(test)]
pub(crate) fn split_href(href: &str) -> (String, String, RouteQuery) {
    let (path, search) = href.split_once('?').unwrap_or((href, ""));
    let mut query = RouteQuery::default();
    for pair in search.split('&').filter(|p| !p.is_empty()) {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        let v = Some(decode(v));
        match k {
            SEARCH_TERM_PARAM => query.term = v,
            REDIRECT_PARAM => query.redirect = v,
            _ => {}
        }
    }
    (path.to_string(), search.to_string(), query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(t: &str) -> RouteQuery {
        RouteQuery {
            term: Some(t.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_home() {
        assert_eq!(Route::parse("/", &RouteQuery::default()), Route::Home);
        assert_eq!(Route::parse("", &RouteQuery::default()), Route::Home);
    }

    #[test]
    fn test_parse_search_reads_term() {
        assert_eq!(
            Route::parse("/search", &term("fried eggs")),
            Route::Search {
                term: "fried eggs".to_string()
            }
        );
    }

    #[test]
    fn test_parse_search_without_term_is_empty() {
        assert_eq!(
            Route::parse("/search", &RouteQuery::default()),
            Route::Search {
                term: String::new()
            }
        );
    }

    #[test]
    fn test_parse_note_decodes_stem() {
        let q = RouteQuery::default();
        assert_eq!(
            Route::parse("/note/Recipe", &q),
            Route::Note {
                stem: "Recipe".to_string()
            }
        );
        assert_eq!(
            Route::parse("/note/My%20Recipe", &q),
            Route::Note {
                stem: "My Recipe".to_string()
            }
        );
    }

    #[test]
    fn test_parse_note_without_stem_is_not_found() {
        let q = RouteQuery::default();
        assert_eq!(Route::parse("/note", &q), Route::NotFound);
        assert_eq!(Route::parse("/note/", &q), Route::NotFound);
    }

    #[test]
    fn test_parse_login_keeps_redirect() {
        let q = RouteQuery {
            redirect: Some("/note/Recipe".to_string()),
            ..Default::default()
        };
        assert_eq!(
            Route::parse("/login", &q),
            Route::Login {
                redirect: Some("/note/Recipe".to_string())
            }
        );
        assert_eq!(
            Route::parse("/login", &RouteQuery::default()),
            Route::Login { redirect: None }
        );
    }

    #[test]
    fn test_parse_unknown_segment() {
        assert_eq!(
            Route::parse("/settings", &RouteQuery::default()),
            Route::NotFound
        );
    }

    #[test]
    fn test_empty_params_give_empty_query() {
        assert_eq!(
            RouteQuery::from_params(&ParamsMap::new()),
            RouteQuery::default()
        );
    }

    #[test]
    fn test_href_round_trips_through_parse() {
        let routes = [
            Route::Home,
            Route::Search {
                term: "fried eggs & ham".to_string(),
            },
            Route::Note {
                stem: "My Recipe".to_string(),
            },
            Route::Login {
                redirect: Some("/search?term=x".to_string()),
            },
        ];
        for r in routes {
            let href = r.href();
            let (path, _, query) = split_href(&href);
            assert_eq!(Route::parse(&path, &query), r, "href {href}");
        }
    }

    #[test]
    fn test_safe_redirect_rejects_foreign_targets() {
        assert_eq!(safe_redirect(Some("/note/A")), "/note/A");
        assert_eq!(safe_redirect(Some("//evil.example")), "/");
        assert_eq!(safe_redirect(Some("https://evil.example")), "/");
        assert_eq!(safe_redirect(None), "/");
    }
}

// `ParamsMap::insert` decodes through the browser, so populated maps are
// only built under wasm.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_from_params_reads_term_and_redirect() {
        let mut params = ParamsMap::new();
        params.insert("term", "fried eggs".to_string());
        params.insert("redirect", "%2Fnote%2FA".to_string());

        let q = RouteQuery::from_params(&params);
        assert_eq!(q.term.as_deref(), Some("fried eggs"));
        assert_eq!(q.redirect.as_deref(), Some("/note/A"));
    }

    #[wasm_bindgen_test]
    fn test_from_params_drops_empty_redirect() {
        let mut params = ParamsMap::new();
        params.insert("redirect", String::new());
        assert_eq!(RouteQuery::from_params(&params).redirect, None);
    }
}
