//! Static navigation pages.
//!
//! Each route renders its named template with empty view data.

use axum::{routing::get, routing::MethodRouter, Router};
use serde_json::Map;

use crate::app_state::AppState;
use crate::views::Views;

pub const PAGES: [(&str, &str); 4] = [
    ("/", "home"),
    ("/about", "about"),
    ("/contact", "contact"),
    ("/support", "support"),
];

pub fn router() -> Router<AppState> {
    PAGES
        .iter()
        .fold(Router::new(), |r, &(path, view)| r.route(path, page(view)))
}

fn page(view: &'static str) -> MethodRouter<AppState> {
    get(move |views: Views| async move {
        tracing::debug!(view, "render page");
        views.render(view, &Map::new())
    })
}
