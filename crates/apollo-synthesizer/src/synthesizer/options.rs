use crate::collections::IndexMap;
use crate::collections::IndexSet;

/// Knobs for [`OperationSynthesizer::synthesize`][super::OperationSynthesizer::synthesize].
///
/// Every field has a default, so a configuration file only needs to name what it changes:
///
/// ```rust
/// use apollo_synthesizer::SynthesisOptions;
///
/// let options: SynthesisOptions = serde_json::from_str(r#"{
///     "models": ["User"],
///     "depthLimit": 3
/// }"#).unwrap();
/// assert_eq!(options.circular_reference_depth, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesisOptions {
    /// Object types collapsed to `{ id }` when reached below the root field
    pub models: IndexSet<String>,

    /// Type names, or `Parent.field` coordinates, exempt from the model collapse
    pub ignore: Vec<String>,

    /// Deepest selection set expanded in boolean selection mode. `None` is unbounded.
    pub depth_limit: Option<usize>,

    /// How many times a type may appear among the ancestors of a selection
    pub circular_reference_depth: usize,

    /// Variable names that arguments may bind to. `None` allows every argument.
    ///
    /// Arguments of the root field are matched by their own name,
    /// nested arguments by their path-qualified variable name such as `posts_comments_limit`.
    pub argument_names: Option<IndexSet<String>>,

    /// Which fields to select
    pub selected_fields: FieldSelection,
}

/// Field selection override.
///
/// In boolean mode every field is selected (or none is) and
/// [`depth_limit`][SynthesisOptions::depth_limit] applies.
/// In object mode only the listed fields with a `true` or nested object entry are selected,
/// at whatever depth the tree reaches.
///
/// Deserializes from `true`, `false`, or a nested object of those:
///
/// ```rust
/// use apollo_synthesizer::FieldSelection;
///
/// let selection: FieldSelection = serde_json::from_str(r#"{
///     "id": true,
///     "posts": { "title": true }
/// }"#).unwrap();
/// assert!(selection.is_object_mode());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldSelection {
    All(bool),
    Fields(IndexMap<String, FieldSelection>),
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            models: IndexSet::default(),
            ignore: Vec::new(),
            depth_limit: None,
            circular_reference_depth: 1,
            argument_names: None,
            selected_fields: FieldSelection::default(),
        }
    }
}

impl SynthesisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn ignore<I, S>(mut self, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = ignore.into_iter().map(Into::into).collect();
        self
    }

    pub fn depth_limit(mut self, depth_limit: usize) -> Self {
        self.depth_limit = Some(depth_limit);
        self
    }

    pub fn circular_reference_depth(mut self, depth: usize) -> Self {
        self.circular_reference_depth = depth;
        self
    }

    pub fn argument_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argument_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn selected_fields(mut self, selected_fields: FieldSelection) -> Self {
        self.selected_fields = selected_fields;
        self
    }

    pub(crate) fn is_model(&self, type_name: &str) -> bool {
        self.models.contains(type_name)
    }

    /// Whether the type, or the field of `parent` that led to it, is on the ignore list
    pub(crate) fn is_ignored(
        &self,
        type_name: &str,
        parent: Option<&str>,
        field: Option<&str>,
    ) -> bool {
        self.ignore.iter().any(|entry| {
            entry == type_name
                || matches!(
                    (parent, field, entry.split_once('.')),
                    (Some(parent), Some(field), Some((entry_parent, entry_field)))
                    if entry_parent == parent && entry_field == field
                )
        })
    }

    pub(crate) fn allows_argument(&self, variable_name: &str) -> bool {
        self.argument_names
            .as_ref()
            .map_or(true, |names| names.contains(variable_name))
    }
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self::All(true)
    }
}

impl FieldSelection {
    /// Object mode selection from `(field name, selection)` pairs
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldSelection)>,
        S: Into<String>,
    {
        Self::Fields(
            fields
                .into_iter()
                .map(|(name, selection)| (name.into(), selection))
                .collect(),
        )
    }

    pub fn is_object_mode(&self) -> bool {
        matches!(self, Self::Fields(_))
    }

    /// The selection applying below `field`, or `None` if the field is not selected
    pub(crate) fn child(&self, field: &str) -> Option<&FieldSelection> {
        match self {
            Self::All(true) => Some(self),
            Self::All(false) => None,
            Self::Fields(fields) => fields
                .get(field)
                .filter(|selection| **selection != Self::All(false)),
        }
    }
}

impl From<bool> for FieldSelection {
    fn from(value: bool) -> Self {
        Self::All(value)
    }
}
