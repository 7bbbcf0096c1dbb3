//! Synthesis of complete operations from a root field.
//!
//! Starting from one field of a root operation type, the synthesizer walks the schema
//! and selects every reachable field, subject to [`SynthesisOptions`]:
//!
//! * each argument is bound to an operation variable,
//! * abstract types fan out into one inline fragment per possible type,
//! * recursion through a type is cut off by the circular reference threshold,
//! * models are collapsed to `{ id }` below the root field.
//!
//! ```rust
//! use apollo_synthesizer::ast::OperationType;
//! use apollo_synthesizer::{OperationSynthesizer, Schema, SynthesisOptions};
//!
//! let schema = Schema::parse(r#"
//!     type Query { user(id: ID!): User }
//!     type User { id: ID! name: String friends: [User] }
//! "#).unwrap();
//!
//! let mut synthesizer = OperationSynthesizer::new(&schema);
//! let operation = synthesizer
//!     .synthesize("user", OperationType::Query, &SynthesisOptions::default())
//!     .unwrap();
//! assert_eq!(
//!     operation.serialize().no_indent().to_string(),
//!     "query user_query($id: ID!) { user(id: $id) { id name friends { id name } } }"
//! );
//! ```

use crate::ast::OperationDefinition;
use crate::ast::OperationType;
use crate::ast::Selection;
use crate::ast::SelectionSet;
use crate::collections::IndexMap;
use crate::intern::InternCache;
use crate::schema::Implementers;
use crate::schema::Schema;
use crate::Name;
use crate::Node;

mod binder;
mod context;
mod guard;
mod options;
mod walker;

use self::context::SynthesisContext;
pub use self::options::FieldSelection;
pub use self::options::SynthesisOptions;

/// Reasons an operation could not be synthesized
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("the schema does not define a {0} root operation type")]
    NoRootOperation(OperationType),

    #[error("root operation type `{type_name}` has no field `{field_name}`")]
    NoSuchRootField { type_name: Name, field_name: String },

    /// The root field was left out entirely: a required argument is excluded
    /// by the argument allow-list, or it has a composite type with nothing to select.
    #[error("nothing to select for root field `{field_name}`")]
    EmptySelection { field_name: Name },
}

/// Synthesizes operations against one schema, sharing an [`InternCache`] between calls.
///
/// Operations produced by the same synthesizer share every structurally equal sub-tree,
/// such as the `{ id }` selection of models.
pub struct OperationSynthesizer<'schema> {
    schema: &'schema Schema,
    implementers: IndexMap<Name, Implementers>,
    cache: InternCache,
}

const _: () = {
    const fn assert_send<T: Send>() {}
    assert_send::<OperationSynthesizer<'static>>();
};

impl<'schema> OperationSynthesizer<'schema> {
    pub fn new(schema: &'schema Schema) -> Self {
        Self::with_cache(schema, InternCache::new())
    }

    /// Create a synthesizer reusing the canonical nodes of an existing cache
    pub fn with_cache(schema: &'schema Schema, cache: InternCache) -> Self {
        Self {
            schema,
            implementers: schema.implementers_map(),
            cache,
        }
    }

    pub fn schema(&self) -> &'schema Schema {
        self.schema
    }

    pub fn cache(&self) -> &InternCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut InternCache {
        &mut self.cache
    }

    pub fn into_cache(self) -> InternCache {
        self.cache
    }

    /// Synthesize the operation named `{field_name}_{operation_type}`
    /// selecting the root field `field_name` of the `operation_type` root type.
    pub fn synthesize(
        &mut self,
        field_name: &str,
        operation_type: OperationType,
        options: &SynthesisOptions,
    ) -> Result<Node<OperationDefinition>, SynthesisError> {
        let schema = self.schema;
        let root_type_name = schema
            .root_operation(operation_type)
            .ok_or(SynthesisError::NoRootOperation(operation_type))?;
        let root_type = schema
            .get_object(root_type_name)
            .ok_or(SynthesisError::NoRootOperation(operation_type))?;
        let field = root_type.fields.get(field_name).ok_or_else(|| {
            SynthesisError::NoSuchRootField {
                type_name: root_type_name.clone(),
                field_name: field_name.to_owned(),
            }
        })?;

        let mut ctx = SynthesisContext::new(schema, options, &self.implementers, &mut self.cache);
        binder::bind_root_arguments(&mut ctx, field);
        let root_field = walker::resolve_field(
            &mut ctx,
            root_type_name,
            field,
            &options.selected_fields,
            0,
            true,
        )
        .ok_or_else(|| SynthesisError::EmptySelection {
            field_name: field.name.clone(),
        })?;

        let selection_set = ctx
            .cache
            .intern(Node::new(SelectionSet::new(vec![Selection::Field(root_field)])));
        let name = Name::new_derived(format!("{}_{}", field.name, operation_type));
        let operation = ctx.cache.intern(Node::new(OperationDefinition {
            operation_type,
            name: Some(name),
            variables: std::mem::take(&mut ctx.variables)
                .into_values()
                .map(|bound| bound.definition)
                .collect(),
            directives: Default::default(),
            selection_set,
        }));
        tracing::debug!(
            operation = ?operation.name,
            variables = operation.variables.len(),
            cached_nodes = ctx.cache.len(),
            "synthesized operation"
        );
        Ok(operation)
    }

    /// Synthesize one operation per field of the `operation_type` root type, in field order.
    ///
    /// Fields with nothing to select are skipped.
    pub fn synthesize_root_fields(
        &mut self,
        operation_type: OperationType,
        options: &SynthesisOptions,
    ) -> Result<IndexMap<Name, Node<OperationDefinition>>, SynthesisError> {
        let schema = self.schema;
        let root_type = schema
            .root_operation(operation_type)
            .and_then(|name| schema.get_object(name))
            .ok_or(SynthesisError::NoRootOperation(operation_type))?;
        let mut operations = IndexMap::default();
        for field_name in root_type.fields.keys() {
            match self.synthesize(field_name, operation_type, options) {
                Ok(operation) => {
                    operations.insert(field_name.clone(), operation);
                }
                Err(error @ SynthesisError::EmptySelection { .. }) => {
                    tracing::debug!(%error, "skipping root field")
                }
                Err(error) => return Err(error),
            }
        }
        Ok(operations)
    }
}

/// Synthesize a single operation with a throwaway cache.
///
/// Use an [`OperationSynthesizer`] to share nodes across operations.
pub fn synthesize(
    schema: &Schema,
    field_name: &str,
    operation_type: OperationType,
    options: &SynthesisOptions,
) -> Result<Node<OperationDefinition>, SynthesisError> {
    OperationSynthesizer::new(schema).synthesize(field_name, operation_type, options)
}
