//! Selection of the translator for a savegame

use std::path::Path;

use crate::error::{Error, Result};
use crate::formats::{GameFamily, Id1Format, Id1Translator, NativeTranslator};
use crate::package::SessionPackage;
use crate::translator::Translator;

/// Ordered list of translators
///
/// Order is recognition priority: the first translator to recognize a file
/// wins.
#[derive(Default)]
pub struct FormatRegistry {
    translators: Vec<Box<dyn Translator>>,
}

impl FormatRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every supported format
    ///
    /// The id Tech 1 formats come first; their version tag check is the more
    /// specific of the two checks.
    #[must_use]
    pub fn with_default_translators() -> Self {
        let mut registry = Self::new();
        registry.register(Id1Translator::new(Id1Format::DoomV9));
        registry.register(Id1Translator::new(Id1Format::HereticV13));
        registry.register(NativeTranslator::new(GameFamily::Doom));
        registry.register(NativeTranslator::new(GameFamily::Heretic));
        registry.register(NativeTranslator::new(GameFamily::Hexen));
        registry
    }

    /// Append a translator with the lowest priority so far
    pub fn register<T: Translator + 'static>(&mut self, translator: T) {
        self.translators.push(Box::new(translator));
    }

    /// Registered translators in priority order
    pub fn translators(&self) -> impl Iterator<Item = &(dyn Translator + 'static)> {
        self.translators.iter().map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.translators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }

    /// The first translator that recognizes `path`
    pub fn recognize(&self, path: &Path) -> Option<&dyn Translator> {
        self.translators().find(|t| t.recognize(path))
    }

    /// Pick the translator for `path`
    ///
    /// Tries recognition first, then the game identity hint, then the file
    /// extension.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFormat`] if nothing matches.
    pub fn select(&self, path: &Path, hint: Option<&str>) -> Result<&dyn Translator> {
        if let Some(translator) = self.recognize(path) {
            tracing::debug!("{} recognized as {}", path.display(), translator.format_name());
            return Ok(translator);
        }

        if let Some(hint) = hint.filter(|hint| !hint.is_empty())
            && let Some(translator) = self.translators().find(|t| t.matches_game_id(hint))
        {
            tracing::debug!(
                "{} not recognized, using {} for game {hint}",
                path.display(),
                translator.format_name()
            );
            return Ok(translator);
        }

        if let Some(translator) = self.translators().find(|t| t.matches_extension(path)) {
            tracing::debug!(
                "{} not recognized, using {} by extension",
                path.display(),
                translator.format_name()
            );
            return Ok(translator);
        }

        Err(Error::UnknownFormat {
            path: path.to_path_buf(),
        })
    }

    /// Select a translator and decode `path` with it
    ///
    /// A failed conversion is not retried with another translator.
    pub fn convert(&self, path: &Path, hint: Option<&str>) -> Result<SessionPackage> {
        let translator = self.select(path, hint)?;
        tracing::info!("Converting {} ({})", path.display(), translator.format_name());
        translator.convert(path, hint)
    }

    /// Every extension known to some translator, without duplicates
    pub fn known_extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = Vec::new();
        for translator in &self.translators {
            for &ext in translator.known_extensions() {
                if !extensions.contains(&ext) {
                    extensions.push(ext);
                }
            }
        }
        extensions
    }
}
