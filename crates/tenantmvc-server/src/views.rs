//! Handlebars view engine with layouts and partials.
//!
//! Templates are `*.hbs` files. Views and partials register under their file
//! stem; layouts under `layouts/<stem>`. A rendered view is wrapped in the
//! default layout, which inserts it with `{{{body}}}`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, response::Html};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{Map, Value};

use tenantmvc_core::error::{MvcError, Result};

use crate::config::HttpSection;
use crate::errors::AppError;
use crate::session::ViewLocals;

const TEMPLATE_EXT: &str = "hbs";

pub struct ViewEngine {
    hb: Handlebars<'static>,
    layout: String,
    cache: bool,
}

impl ViewEngine {
    /// Load every template from the configured directories.
    ///
    /// With `cache` off the registry runs in dev mode and re-reads template
    /// files on each render.
    pub fn from_config(http: &HttpSection, cache: bool) -> Result<Self> {
        let mut hb = Handlebars::new();
        hb.set_dev_mode(!cache);

        register_dir(&mut hb, Path::new(&http.views_path), "")?;
        register_dir(&mut hb, Path::new(&http.views_partials_path), "")?;
        register_dir(&mut hb, Path::new(&http.views_layouts_path), "layouts/")?;

        let layout = format!("layouts/{}", http.views_default_layout);
        if !hb.has_template(&layout) {
            return Err(MvcError::View(format!(
                "default layout `{}` not found in {}",
                http.views_default_layout, http.views_layouts_path
            )));
        }

        tracing::debug!(
            templates = hb.get_templates().len(),
            %layout,
            cache,
            "view engine ready"
        );
        Ok(Self { hb, layout, cache })
    }

    pub fn caching(&self) -> bool {
        self.cache
    }

    pub fn has_view(&self, name: &str) -> bool {
        self.hb.has_template(name)
    }

    /// Render `view` with `data` plus the view locals, wrapped in the layout.
    pub fn render<T: Serialize>(&self, view: &str, data: &T, locals: &ViewLocals) -> Result<String> {
        let mut ctx = match serde_json::to_value(data) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(_) => {
                return Err(MvcError::View(format!(
                    "view data for `{view}` must be an object"
                )))
            }
            Err(e) => return Err(MvcError::View(format!("view data for `{view}`: {e}"))),
        };
        ctx.entry("success_msg")
            .or_insert_with(|| Value::from(locals.success_msg.clone()));
        ctx.entry("error_msg")
            .or_insert_with(|| Value::from(locals.error_msg.clone()));

        let body = self
            .hb
            .render(view, &ctx)
            .map_err(|e| MvcError::View(format!("render `{view}` failed: {e}")))?;

        ctx.insert("body".into(), Value::String(body));
        self.hb
            .render(&self.layout, &ctx)
            .map_err(|e| MvcError::View(format!("render layout `{}` failed: {e}", self.layout)))
    }
}

fn register_dir(hb: &mut Handlebars<'static>, dir: &Path, prefix: &str) -> Result<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| MvcError::View(format!("read views dir {} failed: {e}", dir.display())))?;

    for entry in entries {
        let path = entry
            .map_err(|e| MvcError::View(format!("read views dir {} failed: {e}", dir.display())))?
            .path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXT) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let name = format!("{prefix}{stem}");
        hb.register_template_file(&name, &path)
            .map_err(|e| MvcError::View(format!("template {} invalid: {e}", path.display())))?;
    }
    Ok(())
}

/// Extractor bundling the view engine with this request's view locals.
pub struct Views {
    engine: Arc<ViewEngine>,
    locals: ViewLocals,
}

impl Views {
    pub fn render<T: Serialize>(&self, view: &str, data: &T) -> std::result::Result<Html<String>, AppError> {
        Ok(Html(self.engine.render(view, data, &self.locals)?))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Views
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let engine = parts
            .extensions
            .get::<Arc<ViewEngine>>()
            .cloned()
            .ok_or_else(|| AppError(MvcError::Internal("view engine not installed".into())))?;
        let locals = parts.extensions.get::<ViewLocals>().cloned().unwrap_or_default();
        Ok(Self { engine, locals })
    }
}
