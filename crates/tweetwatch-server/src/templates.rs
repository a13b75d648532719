//! HTML pages
//!
//! Templates are embedded in the binary and parsed once at startup.

use liquid::Template;
use rust_embed::Embed;
use serde::Serialize;
use tweetwatch_core::{Error, Label, Result};

#[derive(Embed)]
#[folder = "templates"]
struct PageAssets;

const INDEX_PAGE: &str = "index.html";
const RESULT_PAGE: &str = "result.html";

/// Parsed page templates
pub struct Templates {
    index: Template,
    result: Template,
}

#[derive(Serialize)]
struct IndexContext<'a> {
    error: Option<&'a str>,
}

#[derive(Serialize)]
struct ResultContext<'a> {
    result: &'a str,
    label: &'a str,
    tweet_text: Option<&'a str>,
}

impl Templates {
    /// Parse the embedded templates
    pub fn load() -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| Error::template(format!("failed to build template parser: {e}")))?;

        let parse = |name: &str| -> Result<Template> {
            let asset = <PageAssets as Embed>::get(name)
                .ok_or_else(|| Error::template(format!("missing embedded template {name}")))?;
            let source = std::str::from_utf8(&asset.data)
                .map_err(|e| Error::template(format!("{name} is not valid UTF-8: {e}")))?;
            parser
                .parse(source)
                .map_err(|e| Error::template(format!("failed to parse {name}: {e}")))
        };

        Ok(Self {
            index: parse(INDEX_PAGE)?,
            result: parse(RESULT_PAGE)?,
        })
    }

    /// Input form, optionally with an error banner
    pub fn render_index(&self, error: Option<&str>) -> Result<String> {
        render(&self.index, INDEX_PAGE, &IndexContext { error })
    }

    /// Prediction page; `tweet_text` is omitted when echoing is disabled
    pub fn render_result(&self, label: Label, tweet_text: Option<&str>) -> Result<String> {
        render(
            &self.result,
            RESULT_PAGE,
            &ResultContext {
                result: label.message(),
                label: label.as_str(),
                tweet_text,
            },
        )
    }
}

fn render<T: Serialize>(template: &Template, name: &str, context: &T) -> Result<String> {
    let globals = liquid::to_object(context)
        .map_err(|e| Error::template(format!("failed to build context for {name}: {e}")))?;
    template
        .render(&globals)
        .map_err(|e| Error::template(format!("failed to render {name}: {e}")))
}
