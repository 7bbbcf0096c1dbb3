//! Recursive construction of selection sets.
//!
//! Every function here returns `None` for "nothing to select",
//! and callers drop the field or fragment that would have held it.

use super::binder;
use super::binder::sanitize_type;
use super::context::SynthesisContext;
use super::guard::CircularReferenceGuard;
use super::FieldSelection;
use crate::ast::Field;
use crate::ast::FieldDefinition;
use crate::ast::InlineFragment;
use crate::ast::Selection;
use crate::ast::SelectionSet;
use crate::schema::ExtendedType;
use crate::schema::ObjectType;
use crate::Name;
use crate::Node;

/// Build the field for `field`, a field of the type named `parent`.
///
/// Returns `None` when the field must be left out: a required argument is excluded,
/// or it has a composite type and nothing to select in it.
/// Variables bound while building a field that ends up left out are discarded.
pub(crate) fn resolve_field(
    ctx: &mut SynthesisContext<'_>,
    parent: &Name,
    field: &FieldDefinition,
    selection: &FieldSelection,
    depth: usize,
    first_call: bool,
) -> Option<Node<Field>> {
    ctx.with_field(field.name.clone(), |ctx| {
        let variables_before = ctx.variables.len();
        let arguments = match binder::bind_field_arguments(ctx, field, first_call) {
            Ok(arguments) => arguments,
            Err(excluded) => {
                tracing::trace!(
                    path = ?ctx.path,
                    variable = %excluded.variable,
                    "field dropped: required argument not in allow-list"
                );
                return None;
            }
        };

        let named_type = field.ty.inner_named_type();
        let selection_set = if ctx.is_leaf(named_type) {
            None
        } else {
            let selection_set =
                CircularReferenceGuard::with_ancestor(ctx, parent.clone(), |ctx| {
                    resolve_selection_set(
                        ctx,
                        Some(parent),
                        named_type,
                        selection,
                        depth + 1,
                        first_call,
                    )
                });
            if selection_set.is_none() {
                tracing::trace!(path = ?ctx.path, "field dropped: nothing to select");
                ctx.variables.truncate(variables_before);
                return None;
            }
            selection_set
        };

        let alias = alias(ctx, field);
        Some(ctx.cache.intern(Node::new(Field {
            alias,
            name: field.name.clone(),
            arguments,
            directives: Default::default(),
            selection_set,
        })))
    })
}

/// Build the selection set for a value of the type named `type_name`
pub(crate) fn resolve_selection_set(
    ctx: &mut SynthesisContext<'_>,
    parent: Option<&Name>,
    type_name: &Name,
    selection: &FieldSelection,
    depth: usize,
    first_call: bool,
) -> Option<Node<SelectionSet>> {
    if !selection.is_object_mode() && ctx.options.depth_limit.is_some_and(|limit| depth > limit) {
        tracing::trace!(path = ?ctx.path, depth, "depth limit reached");
        return None;
    }
    let schema = ctx.schema;
    match schema.types.get(type_name)? {
        ExtendedType::Union(union_) => {
            resolve_fragments(ctx, type_name, union_.members.iter(), selection, depth)
        }
        ExtendedType::Interface(_) => {
            let implementers = ctx.implementers;
            let objects = implementers
                .get(type_name)
                .into_iter()
                .flat_map(|implementers| implementers.objects.iter());
            resolve_fragments(ctx, type_name, objects, selection, depth)
        }
        ExtendedType::Object(object) => {
            resolve_object(ctx, parent, object, selection, depth, first_call)
        }
        ExtendedType::Scalar(_) | ExtendedType::Enum(_) | ExtendedType::InputObject(_) => None,
    }
}

/// One inline fragment per possible type of an abstract type, skipping empty ones
fn resolve_fragments<'a>(
    ctx: &mut SynthesisContext<'_>,
    abstract_type: &Name,
    possible_types: impl Iterator<Item = &'a Name>,
    selection: &FieldSelection,
    depth: usize,
) -> Option<Node<SelectionSet>> {
    let mut selections = Vec::new();
    for possible_type in possible_types {
        if ctx.guard.is_circular(possible_type, false) {
            tracing::trace!(
                path = ?ctx.path,
                ancestors = ?ctx.guard.ancestors(),
                %possible_type,
                "fragment skipped: circular"
            );
            continue;
        }
        let Some(selection_set) = resolve_selection_set(
            ctx,
            Some(abstract_type),
            possible_type,
            selection,
            depth,
            false,
        ) else {
            continue;
        };
        let fragment = ctx.cache.intern(Node::new(InlineFragment {
            type_condition: Some(possible_type.clone()),
            directives: Default::default(),
            selection_set,
        }));
        selections.push(Selection::InlineFragment(fragment));
    }
    ctx.selection_set(selections)
}

fn resolve_object(
    ctx: &mut SynthesisContext<'_>,
    parent: Option<&Name>,
    object: &ObjectType,
    selection: &FieldSelection,
    depth: usize,
    first_call: bool,
) -> Option<Node<SelectionSet>> {
    if ctx.schema.is_root_type(&object.name) {
        tracing::trace!(path = ?ctx.path, ty = %object.name, "root operation type not selected");
        return None;
    }
    if !first_call && ctx.options.is_model(&object.name) {
        let ignored = ctx.options.is_ignored(
            &object.name,
            parent.map(|name| name.as_str()),
            ctx.path.last().map(|name| name.as_str()),
        );
        if !ignored {
            tracing::trace!(path = ?ctx.path, ty = %object.name, "model collapsed to id");
            return Some(ctx.id_selection());
        }
    }

    let mut selections = Vec::new();
    for field in object.fields.values() {
        let field_type = field.ty.inner_named_type();
        let is_leaf = ctx.is_leaf(field_type);
        if ctx.guard.is_circular(field_type, is_leaf) {
            tracing::trace!(
                path = ?ctx.path,
                ancestors = ?ctx.guard.ancestors(),
                field = %field.name,
                "field skipped: circular"
            );
            continue;
        }
        let Some(field_selection) = selection.child(&field.name) else {
            tracing::trace!(path = ?ctx.path, field = %field.name, "field not selected");
            continue;
        };
        if let Some(field) =
            resolve_field(ctx, &object.name, field, field_selection, depth, false)
        {
            selections.push(Selection::Field(field))
        }
    }
    ctx.selection_set(selections)
}

/// An alias distinguishing this field from one of a different type
/// previously selected at the same path, as happens across inline fragments.
///
/// Records the type of the field, so only call this for a field that is kept.
fn alias(ctx: &mut SynthesisContext<'_>, field: &FieldDefinition) -> Option<Name> {
    let key = ctx.path.join(".");
    let type_string = field.ty.to_string();
    let alias = match ctx.field_types.get(&key) {
        Some(previous) if *previous != type_string => Some(Name::new_derived(format!(
            "{}{}",
            field.name,
            sanitize_type(&field.ty)
        ))),
        _ => None,
    };
    if let Some(alias) = &alias {
        tracing::trace!(path = %key, %alias, "aliasing field of conflicting type");
    }
    ctx.field_types.insert(key, type_string);
    alias
}
