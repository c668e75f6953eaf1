use std::sync::Arc;

use minijinja::{Environment, ErrorKind};
use serde::Serialize;

use crate::cache::TemplateModule;
use crate::error::{Result, TemplateError};
use crate::loader::TemplateLoader;

/// Context handed to every view: `{ dataset }`.
#[derive(Debug, Serialize)]
pub struct RenderContext<'a, T: Serialize> {
    pub dataset: &'a T,
}

/// Renders loaded modules with minijinja.
///
/// A fresh environment is built per render so that cache evictions are picked
/// up by the next request. Includes and parents are fetched through the loader.
#[derive(Clone)]
pub struct TemplateRenderer {
    loader: Arc<dyn TemplateLoader>,
}

impl TemplateRenderer {
    pub fn new(loader: Arc<dyn TemplateLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Arc<dyn TemplateLoader> {
        &self.loader
    }

    pub fn render<S: Serialize>(&self, module: &TemplateModule, context: S) -> Result<String> {
        let mut env = Environment::new();

        let loader = self.loader.clone();
        env.set_loader(move |name| match loader.load_include(name) {
            Ok(module) => Ok(Some(module.source.clone())),
            Err(TemplateError::NotFound { .. }) => Ok(None),
            Err(e) => Err(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                e.to_string(),
            )),
        });

        env.add_template_owned(module.name.clone(), module.source.clone())?;
        let template = env.get_template(&module.name)?;

        Ok(template.render(context)?)
    }

    pub fn render_dataset<T: Serialize>(&self, module: &TemplateModule, dataset: &T) -> Result<String> {
        self.render(module, RenderContext { dataset })
    }
}
