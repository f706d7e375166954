//! Profiles and their transformation chains
//!
//! A profile bundles the ordered chains applied for one class of source
//! documents: pre-processors (text to text, before parsing), intermediate
//! processors (tree to tree), and post-processors (text to text, after
//! rendering). Chain functions are required to be pure: no observable effect
//! beyond their return value, and ideally idempotent on their own output.

use std::fmt;
use std::sync::Arc;

use tomlate_core::IntermediateRepr;

use crate::error::BoxError;

/// A named text-to-text chain function
#[derive(Clone)]
pub struct TextProcessor {
    name: String,
    run: Arc<dyn Fn(String) -> Result<String, BoxError> + Send + Sync>,
}

impl TextProcessor {
    pub fn new(
        name: impl Into<String>,
        run: impl Fn(String) -> Result<String, BoxError> + Send + Sync + 'static,
    ) -> Self {
        Self { name: name.into(), run: Arc::new(run) }
    }

    /// Wrap a plain function that cannot fail
    pub fn infallible(
        name: impl Into<String>,
        run: impl Fn(String) -> String + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, move |text| Ok(run(text)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, input: String) -> Result<String, BoxError> {
        (self.run)(input)
    }
}

impl fmt::Debug for TextProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextProcessor").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A named tree-to-tree chain function
#[derive(Clone)]
pub struct IrProcessor {
    name: String,
    run: Arc<dyn Fn(IntermediateRepr) -> Result<IntermediateRepr, BoxError> + Send + Sync>,
}

impl IrProcessor {
    pub fn new(
        name: impl Into<String>,
        run: impl Fn(IntermediateRepr) -> Result<IntermediateRepr, BoxError> + Send + Sync + 'static,
    ) -> Self {
        Self { name: name.into(), run: Arc::new(run) }
    }

    pub fn infallible(
        name: impl Into<String>,
        run: impl Fn(IntermediateRepr) -> IntermediateRepr + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, move |repr| Ok(run(repr)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, input: IntermediateRepr) -> Result<IntermediateRepr, BoxError> {
        (self.run)(input)
    }
}

impl fmt::Debug for IrProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IrProcessor").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A named bundle of transformation chains
#[derive(Debug, Clone, Default)]
pub struct Profile {
    name: String,
    description: String,
    help_text: String,
    active_by_default: bool,
    pre_processors: Vec<TextProcessor>,
    intermediate_processors: Vec<IrProcessor>,
    post_processors: Vec<TextProcessor>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    pub fn with_active_by_default(mut self, active: bool) -> Self {
        self.active_by_default = active;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn active_by_default(&self) -> bool {
        self.active_by_default
    }

    pub fn add_pre(&mut self, processor: TextProcessor) -> &mut Self {
        self.pre_processors.push(processor);
        self
    }

    pub fn add_intermediate(&mut self, processor: IrProcessor) -> &mut Self {
        self.intermediate_processors.push(processor);
        self
    }

    pub fn add_post(&mut self, processor: TextProcessor) -> &mut Self {
        self.post_processors.push(processor);
        self
    }

    pub fn prepend_pre(&mut self, processor: TextProcessor) -> &mut Self {
        self.pre_processors.insert(0, processor);
        self
    }

    pub fn prepend_intermediate(&mut self, processor: IrProcessor) -> &mut Self {
        self.intermediate_processors.insert(0, processor);
        self
    }

    pub fn prepend_post(&mut self, processor: TextProcessor) -> &mut Self {
        self.post_processors.insert(0, processor);
        self
    }

    pub fn pre_processors(&self) -> &[TextProcessor] {
        &self.pre_processors
    }

    pub fn intermediate_processors(&self) -> &[IrProcessor] {
        &self.intermediate_processors
    }

    pub fn post_processors(&self) -> &[TextProcessor] {
        &self.post_processors
    }
}

/// A profile-independent processor registered to run after profile selection.
///
/// Active augmentations mutate a private per-call copy of the selected
/// profile, typically by appending functions to its chains.
#[derive(Clone)]
pub struct Augmentation {
    name: String,
    help_text: String,
    active_by_default: bool,
    run: Arc<dyn Fn(&mut Profile) + Send + Sync>,
}

impl Augmentation {
    pub fn new(
        name: impl Into<String>,
        help_text: impl Into<String>,
        active_by_default: bool,
        run: impl Fn(&mut Profile) + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            help_text: help_text.into(),
            active_by_default,
            run: Arc::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub fn active_by_default(&self) -> bool {
        self.active_by_default
    }

    /// Resolve the enabled state: an explicit user choice wins, otherwise the
    /// registered default applies
    pub fn is_active(&self, explicit: Option<bool>) -> bool {
        explicit.unwrap_or(self.active_by_default)
    }

    pub fn apply(&self, profile: &mut Profile) {
        (self.run)(profile)
    }
}

impl fmt::Debug for Augmentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Augmentation")
            .field("name", &self.name)
            .field("active_by_default", &self.active_by_default)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_names_and_application() {
        let upper = TextProcessor::infallible("upper", |text| text.to_uppercase());
        assert_eq!(upper.name(), "upper");
        assert_eq!(upper.apply("abc".to_string()).unwrap(), "ABC");
    }

    #[test]
    fn test_chains_keep_registration_order() {
        let mut profile = Profile::new("p");
        profile.add_pre(TextProcessor::infallible("one", |t| t));
        profile.add_pre(TextProcessor::infallible("two", |t| t));
        profile.prepend_pre(TextProcessor::infallible("zero", |t| t));
        let names: Vec<_> = profile.pre_processors().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["zero", "one", "two"]);
    }

    #[test]
    fn test_prepend_applies_to_every_chain() {
        let mut profile = Profile::new("p");
        profile.add_intermediate(IrProcessor::infallible("late", |r| r));
        profile.prepend_intermediate(IrProcessor::infallible("early", |r| r));
        profile.add_post(TextProcessor::infallible("late", |t| t));
        profile.prepend_post(TextProcessor::infallible("early", |t| t));
        let intermediate: Vec<_> =
            profile.intermediate_processors().iter().map(|p| p.name()).collect();
        let post: Vec<_> = profile.post_processors().iter().map(|p| p.name()).collect();
        assert_eq!(intermediate, vec!["early", "late"]);
        assert_eq!(post, vec!["early", "late"]);
    }

    #[test]
    fn test_augmentation_tri_state_activation() {
        let on = Augmentation::new("on", "", true, |_| {});
        let off = Augmentation::new("off", "", false, |_| {});
        assert!(on.is_active(None));
        assert!(!off.is_active(None));
        assert!(off.is_active(Some(true)));
        assert!(!on.is_active(Some(false)));
    }
}
