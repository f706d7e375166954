//! Translator registry and pipeline execution
//!
//! The registry is assembled once through `TranslatorBuilder` (profiles,
//! augmentations, and extension activation all happen before `build()`
//! returns) and is read-only afterwards. A built `Translator` can therefore
//! serve concurrent `translate` calls without locking: every call works on
//! its own tree and its own private profile copy.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use tomlate_core::IntermediateRepr;
use tomlate_ini::ParseOptions;
use tomlate_render::RenderOptions;
use tracing::debug;

use crate::error::{BoxError, BuildError, ProcessorError, Stage, TranslationError};
use crate::profile::{Augmentation, Profile, TextProcessor};
use crate::tasks;

/// Profile used when the requested name is not registered
pub const DEFAULT_PROFILE: &str = "default";

/// Function converting source text into the intermediate representation
pub type ReaderFn = Arc<dyn Fn(&str) -> Result<IntermediateRepr, BoxError> + Send + Sync>;
/// Function converting the intermediate representation into target text
pub type WriterFn = Arc<dyn Fn(&IntermediateRepr) -> Result<String, BoxError> + Send + Sync>;

type ExtensionFn = Box<dyn FnOnce(&mut TranslatorBuilder) -> Result<(), BuildError> + Send>;

/// Builder assembling the immutable translator registry.
///
/// Extension callables receive `&mut TranslatorBuilder` during `build()` and
/// use `profile_mut` / `augment_profiles` to register their behavior.
pub struct TranslatorBuilder {
    reader: ReaderFn,
    writer: WriterFn,
    profiles: IndexMap<String, Profile>,
    augmentations: IndexMap<String, Augmentation>,
    extensions: Vec<(String, ExtensionFn)>,
}

impl TranslatorBuilder {
    fn new() -> Self {
        Self {
            reader: Arc::new(|text| {
                tomlate_ini::parse(text).map_err(|e| Box::new(e) as BoxError)
            }),
            writer: Arc::new(|repr| {
                tomlate_render::render(repr).map_err(|e| Box::new(e) as BoxError)
            }),
            profiles: IndexMap::new(),
            augmentations: IndexMap::new(),
            extensions: Vec::new(),
        }
    }

    /// Replace the parser collaborator
    pub fn reader(
        mut self,
        reader: impl Fn(&str) -> Result<IntermediateRepr, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.reader = Arc::new(reader);
        self
    }

    /// Replace the renderer collaborator
    pub fn writer(
        mut self,
        writer: impl Fn(&IntermediateRepr) -> Result<String, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.writer = Arc::new(writer);
        self
    }

    /// Use the default parser with custom syntax options
    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.reader = Arc::new(move |text| {
            tomlate_ini::parse_with(text, &options).map_err(|e| Box::new(e) as BoxError)
        });
        self
    }

    /// Use the default renderer with custom thresholds
    pub fn render_options(mut self, options: RenderOptions) -> Self {
        self.writer = Arc::new(move |repr| {
            tomlate_render::render_with(repr, &options).map_err(|e| Box::new(e) as BoxError)
        });
        self
    }

    /// Register (or replace) a fully-built profile
    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profiles.insert(profile.name().to_string(), profile);
        self
    }

    /// Register an extension activation callable.
    ///
    /// Activation happens during `build()`, sorted lexically by registration
    /// name. Registering a second extension under an already-used name is a
    /// no-op: the first registration wins.
    pub fn extension(
        mut self,
        name: impl Into<String>,
        activate: impl FnOnce(&mut TranslatorBuilder) -> Result<(), BuildError> + Send + 'static,
    ) -> Self {
        self.extensions.push((name.into(), Box::new(activate)));
        self
    }

    /// Fetch an existing profile or create an empty one under `name`
    pub fn profile_mut(&mut self, name: &str) -> &mut Profile {
        self.profiles.entry(name.to_string()).or_insert_with(|| Profile::new(name))
    }

    /// Register an augmentation; names must be unique and identifier-like
    pub fn augment_profiles(&mut self, augmentation: Augmentation) -> Result<(), BuildError> {
        let name = augmentation.name().to_string();
        if !valid_augmentation_name(&name) {
            return Err(BuildError::InvalidAugmentationName { name });
        }
        if self.augmentations.contains_key(&name) {
            return Err(BuildError::AugmentationExists { name });
        }
        self.augmentations.insert(name, augmentation);
        Ok(())
    }

    /// Activate all registered extensions and freeze the registry.
    ///
    /// Extensions registered by other extensions during activation are
    /// discarded; the activation set is fixed when `build()` starts.
    pub fn build(mut self) -> Result<Translator, BuildError> {
        let mut extensions = std::mem::take(&mut self.extensions);
        extensions.sort_by(|a, b| a.0.cmp(&b.0));
        let mut activated = HashSet::new();
        for (name, activate) in extensions {
            if !activated.insert(name.clone()) {
                debug!(extension = %name, "duplicate extension registration ignored");
                continue;
            }
            debug!(extension = %name, "activating extension");
            activate(&mut self)?;
        }
        self.extensions.clear();
        Ok(Translator {
            reader: self.reader,
            writer: self.writer,
            profiles: self.profiles,
            augmentations: self.augmentations,
        })
    }
}

fn valid_augmentation_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// The frozen registry plus the reader/writer collaborators.
///
/// Safe to share across threads once built; `translate` never mutates it.
pub struct Translator {
    reader: ReaderFn,
    writer: WriterFn,
    profiles: IndexMap<String, Profile>,
    augmentations: IndexMap<String, Augmentation>,
}

impl Translator {
    /// Start building a translator with the default INI reader and TOML
    /// writer and an empty registry
    pub fn builder() -> TranslatorBuilder {
        TranslatorBuilder::new()
    }

    /// A translator with the builtin clean-up tasks and an empty
    /// structure-preserving `"default"` profile
    pub fn new() -> Self {
        Self::builder()
            .with_profile(
                Profile::new(DEFAULT_PROFILE)
                    .with_description("Structure-preserving conversion without dialect-specific rules")
                    .with_help_text(
                        "Suitable for any INI/CFG document; values stay strings unless an \
                         intermediate processor coerces them",
                    )
                    .with_active_by_default(true),
            )
            .extension("profile-independent-tasks", tasks::activate)
            .build()
            .expect("builtin registrations use valid unique names")
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    /// Registered profiles, in registration order
    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Registered augmentations, in registration order
    pub fn augmentations(&self) -> impl Iterator<Item = &Augmentation> {
        self.augmentations.values()
    }

    /// Translate INI text to TOML text using the named profile (falling back
    /// to [`DEFAULT_PROFILE`] when the name is not registered)
    pub fn translate(&self, source: &str, profile_name: &str) -> Result<String, TranslationError> {
        self.translate_with(source, profile_name, &HashMap::new())
    }

    /// Like [`Translator::translate`], with explicit augmentation activation
    /// overrides (`true` forces on, `false` forces off, absent keeps the
    /// registered default)
    pub fn translate_with(
        &self,
        source: &str,
        profile_name: &str,
        augmentation_overrides: &HashMap<String, bool>,
    ) -> Result<String, TranslationError> {
        let registered = self
            .profiles
            .get(profile_name)
            .or_else(|| self.profiles.get(DEFAULT_PROFILE))
            .ok_or_else(|| TranslationError::ProfileNotFound {
                name: profile_name.to_string(),
                available: self.profiles.keys().cloned().collect(),
            })?;

        // Private copy: augmentations must never leak into the registry
        let mut profile = registered.clone();
        for augmentation in self.augmentations.values() {
            let explicit = augmentation_overrides.get(augmentation.name()).copied();
            if augmentation.is_active(explicit) {
                augmentation.apply(&mut profile);
            }
        }

        debug!(profile = %profile.name(), "starting translation");
        let mut text = source.to_string();
        for (index, processor) in profile.pre_processors().iter().enumerate() {
            text = run_text(processor, text, &profile, Stage::Pre, index)?;
        }

        let mut repr = (self.reader)(&text).map_err(TranslationError::Parse)?;
        for (index, processor) in profile.intermediate_processors().iter().enumerate() {
            debug!(processor = processor.name(), "applying intermediate processor");
            repr = processor.apply(repr).map_err(|source| ProcessorError {
                profile: profile.name().to_string(),
                stage: Stage::Intermediate,
                function: processor.name().to_string(),
                index,
                source,
            })?;
        }

        let mut text = (self.writer)(&repr).map_err(TranslationError::Serialization)?;
        for (index, processor) in profile.post_processors().iter().enumerate() {
            text = run_text(processor, text, &profile, Stage::Post, index)?;
        }
        Ok(text)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

fn run_text(
    processor: &TextProcessor,
    input: String,
    profile: &Profile,
    stage: Stage,
    index: usize,
) -> Result<String, ProcessorError> {
    debug!(processor = processor.name(), %stage, "applying text processor");
    processor.apply(input).map_err(|source| ProcessorError {
        profile: profile.name().to_string(),
        stage,
        function: processor.name().to_string(),
        index,
        source,
    })
}
