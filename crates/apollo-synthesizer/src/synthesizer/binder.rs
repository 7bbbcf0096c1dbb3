//! Turning schema arguments into operation variables.
//!
//! Root field arguments bind to variables of the same name.
//! Deeper arguments bind to a variable named after the path of fields leading to them,
//! so `limit` on `comments` under the root field `posts` binds `$posts_comments_limit`.

use super::context::BoundVariable;
use super::context::SynthesisContext;
use crate::ast::Argument;
use crate::ast::FieldDefinition;
use crate::ast::InputValueDefinition;
use crate::ast::Type;
use crate::ast::Value;
use crate::ast::VariableDefinition;
use crate::Name;
use crate::Node;

/// A non-null argument was left out by the argument allow-list,
/// so its field cannot be selected at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequiredArgumentExcluded {
    pub(crate) variable: String,
}

/// Define a variable for each allowed argument of the root field
pub(crate) fn bind_root_arguments(ctx: &mut SynthesisContext<'_>, field: &FieldDefinition) {
    for argument in &field.arguments {
        if !ctx.options.allows_argument(&argument.name) {
            tracing::trace!(argument = %argument.name, "root argument not in allow-list");
            continue;
        }
        register_variable(ctx, argument.name.to_string(), argument);
    }
}

/// Build the arguments of the field at the end of the current path,
/// each referencing its variable.
///
/// Variables for the root field are expected to be bound already by [`bind_root_arguments`].
/// Nothing is registered when a required argument is excluded.
pub(crate) fn bind_field_arguments(
    ctx: &mut SynthesisContext<'_>,
    field: &FieldDefinition,
    first_call: bool,
) -> Result<Vec<Node<Argument>>, RequiredArgumentExcluded> {
    let mut allowed = Vec::with_capacity(field.arguments.len());
    for argument in &field.arguments {
        let variable = if first_call {
            argument.name.to_string()
        } else {
            qualified_name(&ctx.path, &argument.name)
        };
        if ctx.options.allows_argument(&variable) {
            allowed.push((argument, variable));
        } else if argument.ty.is_non_null() {
            return Err(RequiredArgumentExcluded { variable });
        } else {
            tracing::trace!(%variable, "optional argument not in allow-list");
        }
    }

    let mut arguments = Vec::with_capacity(allowed.len());
    for (argument, variable) in allowed {
        let variable = if first_call {
            argument.name.clone()
        } else {
            register_variable(ctx, variable, argument)
        };
        let value = ctx.cache.intern(Node::new(Value::Variable(variable)));
        arguments.push(ctx.cache.intern(Node::new(Argument {
            name: argument.name.clone(),
            value,
        })));
    }
    Ok(arguments)
}

/// The variable type for an argument type, as an interned node
pub(crate) fn variable_type(ctx: &mut SynthesisContext<'_>, ty: &Type) -> Node<Type> {
    ctx.cache.intern(Node::new(ty.clone()))
}

/// `posts_comments_limit` for argument `limit` at path `posts.comments`
fn qualified_name(path: &[Name], argument: &Name) -> String {
    let mut name = path.join("_");
    if !name.is_empty() {
        name.push('_');
    }
    name.push_str(argument);
    name
}

/// Define a variable for `argument` under `name`, returning the name actually used.
///
/// A variable is reused only when it was bound for the same argument at the same field path,
/// as happens when several fragments select the same field, and has the same type and default.
/// Any other variable holding the name forces a rename with a type suffix, then a counter.
fn register_variable(
    ctx: &mut SynthesisContext<'_>,
    name: String,
    argument: &InputValueDefinition,
) -> Name {
    let origin = origin(&ctx.path, &argument.name);
    let ty = variable_type(ctx, &argument.ty);
    let default_value = argument
        .default_value
        .clone()
        .map(|value| ctx.cache.intern(value));
    let typed_name = format!("{name}_{}", sanitize_type(&argument.ty));
    let mut attempt = 0_usize;
    loop {
        let candidate = match attempt {
            0 => name.clone(),
            1 => typed_name.clone(),
            counter => format!("{typed_name}_{counter}"),
        };
        attempt += 1;
        match ctx.variables.get(candidate.as_str()) {
            Some(existing)
                if existing.origin == origin
                    && existing.definition.ty == ty
                    && existing.definition.default_value == default_value =>
            {
                return existing.definition.name.clone()
            }
            Some(existing) => {
                tracing::trace!(
                    variable = %candidate,
                    taken_by = %existing.origin,
                    %origin,
                    "variable name taken by another argument"
                );
            }
            None => {
                let name = Name::new_derived(candidate);
                let definition = ctx.cache.intern(Node::new(VariableDefinition {
                    name: name.clone(),
                    ty,
                    default_value,
                    directives: Default::default(),
                }));
                ctx.variables
                    .insert(name.clone(), BoundVariable { origin, definition });
                return name;
            }
        }
    }
}

/// `posts.comments.limit` for argument `limit` at path `posts.comments`
fn origin(path: &[Name], argument: &Name) -> String {
    let mut origin = path.join(".");
    if !origin.is_empty() {
        origin.push('.');
    }
    origin.push_str(argument);
    origin
}

/// Spell a type reference with name characters only: `[User!]` becomes `ListUserNonNull`
pub(crate) fn sanitize_type(ty: &Type) -> String {
    ty.to_string()
        .replace('!', "NonNull")
        .replace('[', "List")
        .replace(']', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name;

    #[test]
    fn qualified_names() {
        assert_eq!(qualified_name(&[], &name!("id")), "id");
        assert_eq!(
            qualified_name(&[name!("posts"), name!("comments")], &name!("limit")),
            "posts_comments_limit"
        );
    }

    #[test]
    fn origins_keep_path_segments_apart() {
        assert_eq!(origin(&[], &name!("id")), "id");
        assert_ne!(
            origin(&[name!("a"), name!("b_c")], &name!("x")),
            origin(&[name!("a"), name!("b"), name!("c")], &name!("x"))
        );
        assert_eq!(
            qualified_name(&[name!("a"), name!("b_c")], &name!("x")),
            qualified_name(&[name!("a"), name!("b"), name!("c")], &name!("x"))
        );
    }

    #[test]
    fn sanitized_types() {
        let user = Type::Named(name!("User"));
        assert_eq!(sanitize_type(&user), "User");
        assert_eq!(sanitize_type(&user.clone().non_null()), "UserNonNull");
        assert_eq!(
            sanitize_type(&user.non_null().list().non_null()),
            "ListUserNonNullNonNull"
        );
    }
}
