use super::*;
use crate::ast::OperationType;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;
use apollo_parser::S;

/// Builds a [`Schema`] from one or more SDL documents.
///
/// Type extensions may appear before or after the definition they extend,
/// in the same document or a later one.
pub struct SchemaBuilder {
    schema: Schema,
    schema_definition: SchemaDefinitionStatus,
    orphan_type_extensions: IndexMap<Name, Vec<cst::Definition>>,
    errors: Vec<BuildError>,
}

enum SchemaDefinitionStatus {
    Found,
    NoneSoFar {
        orphan_extensions: Vec<cst::SchemaExtension>,
    },
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Returns a new schema builder initialized with the built-in scalars
    pub fn new() -> Self {
        SchemaBuilder {
            schema: Schema::new(),
            schema_definition: SchemaDefinitionStatus::NoneSoFar {
                orphan_extensions: Vec::new(),
            },
            orphan_type_extensions: IndexMap::default(),
            errors: Vec::new(),
        }
    }

    /// Parse an SDL document and add its definitions to the schema being built
    ///
    /// Syntax errors are recorded and reported by [`build`][Self::build].
    /// Definitions that parsed correctly are still added.
    pub fn add_document(&mut self, source_text: &str) {
        let tree = apollo_parser::Parser::new(source_text).parse();
        for error in tree.errors() {
            self.errors.push(BuildError::SyntaxError {
                message: error.message().to_owned(),
                index: error.index(),
            })
        }
        for definition in tree.document().definitions() {
            self.add_definition(definition)
        }
    }

    /// Add a type built programatically
    ///
    /// Pending extensions for a type of the same name are applied to it.
    pub fn add_type(&mut self, ty: impl Into<ExtendedType>) {
        self.insert_type(ty.into())
    }

    /// Returns the schema built from all added documents,
    /// or every error found together with the partially built schema.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let Self {
            mut schema,
            schema_definition,
            orphan_type_extensions,
            mut errors,
        } = self;
        if let SchemaDefinitionStatus::NoneSoFar { orphan_extensions } = schema_definition {
            errors.extend(orphan_extensions.iter().map(|_| BuildError::OrphanSchemaExtension));
            // Implict `schema`
            for operation_type in OperationType::ALL {
                let name = operation_type.default_type_name();
                if schema.get_object(name).is_some() {
                    let slot = match operation_type {
                        OperationType::Query => &mut schema.schema_definition.query,
                        OperationType::Mutation => &mut schema.schema_definition.mutation,
                        OperationType::Subscription => &mut schema.schema_definition.subscription,
                    };
                    *slot = Some(Name::new_static_unchecked(name));
                }
            }
        }
        for (name, extensions) in orphan_type_extensions {
            errors.extend(
                extensions
                    .iter()
                    .map(|_| BuildError::OrphanTypeExtension { name: name.clone() }),
            );
        }
        if errors.is_empty() {
            Ok(schema)
        } else {
            Err(SchemaError {
                partial: Box::new(schema),
                errors,
            })
        }
    }

    fn add_definition(&mut self, definition: cst::Definition) {
        use cst::Definition as C;
        match &definition {
            C::OperationDefinition(_) => self.errors.push(BuildError::ExecutableDefinition {
                describe: "an operation definition",
            }),
            C::FragmentDefinition(_) => self.errors.push(BuildError::ExecutableDefinition {
                describe: "a fragment definition",
            }),
            // Directive definitions have no effect on the type graph
            C::DirectiveDefinition(_) => {}
            C::SchemaDefinition(def) => {
                let previous =
                    std::mem::replace(&mut self.schema_definition, SchemaDefinitionStatus::Found);
                match previous {
                    SchemaDefinitionStatus::Found => {
                        self.errors.push(BuildError::SchemaDefinitionCollision)
                    }
                    SchemaDefinitionStatus::NoneSoFar { orphan_extensions } => {
                        self.schema.schema_definition.description =
                            description(def.description());
                        self.add_root_operations(def.root_operation_type_definitions());
                        for ext in orphan_extensions {
                            self.add_root_operations(ext.root_operation_type_definitions())
                        }
                    }
                }
            }
            C::ScalarTypeDefinition(def) => {
                if let Some(name) = def.name().convert() {
                    self.insert_type(ExtendedType::Scalar(Node::new(ScalarType {
                        description: description(def.description()),
                        name,
                        directives: directives(def.directives()),
                    })))
                }
            }
            C::ObjectTypeDefinition(def) => {
                if let Some(name) = def.name().convert() {
                    let ty = ObjectType::from_cst(def, name, &mut self.errors);
                    self.insert_type(ty.into())
                }
            }
            C::InterfaceTypeDefinition(def) => {
                if let Some(name) = def.name().convert() {
                    let ty = InterfaceType::from_cst(def, name, &mut self.errors);
                    self.insert_type(ty.into())
                }
            }
            C::UnionTypeDefinition(def) => {
                if let Some(name) = def.name().convert() {
                    let ty = UnionType::from_cst(def, name, &mut self.errors);
                    self.insert_type(ty.into())
                }
            }
            C::EnumTypeDefinition(def) => {
                if let Some(name) = def.name().convert() {
                    let ty = EnumType::from_cst(def, name, &mut self.errors);
                    self.insert_type(ty.into())
                }
            }
            C::InputObjectTypeDefinition(def) => {
                if let Some(name) = def.name().convert() {
                    let ty = InputObjectType::from_cst(def, name, &mut self.errors);
                    self.insert_type(ty.into())
                }
            }
            C::SchemaExtension(ext) => match &mut self.schema_definition {
                SchemaDefinitionStatus::Found => {
                    self.add_root_operations(ext.root_operation_type_definitions())
                }
                SchemaDefinitionStatus::NoneSoFar { orphan_extensions } => {
                    orphan_extensions.push(ext.clone())
                }
            },
            C::ScalarTypeExtension(ext) => self.add_type_extension(ext.name(), definition.clone()),
            C::ObjectTypeExtension(ext) => self.add_type_extension(ext.name(), definition.clone()),
            C::InterfaceTypeExtension(ext) => {
                self.add_type_extension(ext.name(), definition.clone())
            }
            C::UnionTypeExtension(ext) => self.add_type_extension(ext.name(), definition.clone()),
            C::EnumTypeExtension(ext) => self.add_type_extension(ext.name(), definition.clone()),
            C::InputObjectTypeExtension(ext) => {
                self.add_type_extension(ext.name(), definition.clone())
            }
        }
    }

    fn insert_type(&mut self, ty: ExtendedType) {
        let name = ty.name().clone();
        if let Some(previous) = self.schema.types.get(&name) {
            self.errors.push(if previous.is_built_in() {
                BuildError::BuiltInScalarTypeRedefinition { name }
            } else {
                BuildError::TypeDefinitionCollision { name }
            });
            return;
        }
        self.schema.types.insert(name.clone(), ty);
        if let Some(extensions) = self.orphan_type_extensions.shift_remove(&name) {
            for extension in extensions {
                self.apply_type_extension(&name, &extension)
            }
        }
    }

    fn add_type_extension(&mut self, name: Option<cst::Name>, definition: cst::Definition) {
        let Some(name) = name.convert() else { return };
        if self.schema.types.contains_key(&name) {
            self.apply_type_extension(&name, &definition)
        } else {
            self.orphan_type_extensions
                .entry(name)
                .or_default()
                .push(definition)
        }
    }

    fn apply_type_extension(&mut self, name: &Name, definition: &cst::Definition) {
        use cst::Definition as C;
        let Some(ty) = self.schema.types.get_mut(name) else {
            return;
        };
        let errors = &mut self.errors;
        match (ty, definition) {
            (ExtendedType::Scalar(ty), C::ScalarTypeExtension(ext)) => ty
                .make_mut()
                .directives
                .extend(directives(ext.directives()).0),
            (ExtendedType::Object(ty), C::ObjectTypeExtension(ext)) => {
                ty.make_mut().extend_cst(ext, errors)
            }
            (ExtendedType::Interface(ty), C::InterfaceTypeExtension(ext)) => {
                ty.make_mut().extend_cst(ext, errors)
            }
            (ExtendedType::Union(ty), C::UnionTypeExtension(ext)) => {
                ty.make_mut().extend_cst(ext, errors)
            }
            (ExtendedType::Enum(ty), C::EnumTypeExtension(ext)) => {
                ty.make_mut().extend_cst(ext, errors)
            }
            (ExtendedType::InputObject(ty), C::InputObjectTypeExtension(ext)) => {
                ty.make_mut().extend_cst(ext, errors)
            }
            (ty, _) => errors.push(BuildError::TypeExtensionKindMismatch {
                name: name.clone(),
                describe_ext: describe_extension(definition),
                describe_def: ty.describe(),
            }),
        }
    }

    fn add_root_operations(
        &mut self,
        root_operations: impl Iterator<Item = cst::RootOperationTypeDefinition>,
    ) {
        for root_operation in root_operations {
            let operation_type = root_operation.operation_type().convert();
            let object_type = root_operation.named_type().and_then(|ty| ty.name()).convert();
            let (Some(operation_type), Some(object_type)) = (operation_type, object_type) else {
                continue;
            };
            let slot = match operation_type {
                OperationType::Query => &mut self.schema.schema_definition.query,
                OperationType::Mutation => &mut self.schema.schema_definition.mutation,
                OperationType::Subscription => &mut self.schema.schema_definition.subscription,
            };
            if slot.is_some() {
                self.errors.push(BuildError::DuplicateRootOperation {
                    operation_type: operation_type.name(),
                })
            } else {
                *slot = Some(object_type)
            }
        }
    }
}

fn describe_extension(definition: &cst::Definition) -> &'static str {
    use cst::Definition as C;
    match definition {
        C::ScalarTypeExtension(_) => "a scalar type extension",
        C::ObjectTypeExtension(_) => "an object type extension",
        C::InterfaceTypeExtension(_) => "an interface type extension",
        C::UnionTypeExtension(_) => "a union type extension",
        C::EnumTypeExtension(_) => "an enum type extension",
        C::InputObjectTypeExtension(_) => "an input object type extension",
        _ => "a definition",
    }
}

impl ObjectType {
    fn from_cst(
        definition: &cst::ObjectTypeDefinition,
        name: Name,
        errors: &mut Vec<BuildError>,
    ) -> Self {
        let mut ty = Self {
            description: description(definition.description()),
            name,
            implements_interfaces: IndexSet::default(),
            directives: directives(definition.directives()),
            fields: IndexMap::default(),
        };
        add_interfaces(
            &ty.name,
            &mut ty.implements_interfaces,
            definition.implements_interfaces(),
            errors,
        );
        add_fields(
            &ty.name,
            &mut ty.fields,
            definition.fields_definition(),
            errors,
        );
        ty
    }

    fn extend_cst(&mut self, extension: &cst::ObjectTypeExtension, errors: &mut Vec<BuildError>) {
        self.directives
            .extend(directives(extension.directives()).0);
        add_interfaces(
            &self.name,
            &mut self.implements_interfaces,
            extension.implements_interfaces(),
            errors,
        );
        add_fields(
            &self.name,
            &mut self.fields,
            extension.fields_definition(),
            errors,
        );
    }
}

impl InterfaceType {
    fn from_cst(
        definition: &cst::InterfaceTypeDefinition,
        name: Name,
        errors: &mut Vec<BuildError>,
    ) -> Self {
        let mut ty = Self {
            description: description(definition.description()),
            name,
            implements_interfaces: IndexSet::default(),
            directives: directives(definition.directives()),
            fields: IndexMap::default(),
        };
        add_interfaces(
            &ty.name,
            &mut ty.implements_interfaces,
            definition.implements_interfaces(),
            errors,
        );
        add_fields(
            &ty.name,
            &mut ty.fields,
            definition.fields_definition(),
            errors,
        );
        ty
    }

    fn extend_cst(
        &mut self,
        extension: &cst::InterfaceTypeExtension,
        errors: &mut Vec<BuildError>,
    ) {
        self.directives
            .extend(directives(extension.directives()).0);
        add_interfaces(
            &self.name,
            &mut self.implements_interfaces,
            extension.implements_interfaces(),
            errors,
        );
        add_fields(
            &self.name,
            &mut self.fields,
            extension.fields_definition(),
            errors,
        );
    }
}

impl UnionType {
    fn from_cst(
        definition: &cst::UnionTypeDefinition,
        name: Name,
        errors: &mut Vec<BuildError>,
    ) -> Self {
        let mut ty = Self {
            description: description(definition.description()),
            name,
            directives: directives(definition.directives()),
            members: IndexSet::default(),
        };
        add_members(
            &ty.name,
            &mut ty.members,
            definition.union_member_types(),
            errors,
        );
        ty
    }

    fn extend_cst(&mut self, extension: &cst::UnionTypeExtension, errors: &mut Vec<BuildError>) {
        self.directives
            .extend(directives(extension.directives()).0);
        add_members(
            &self.name,
            &mut self.members,
            extension.union_member_types(),
            errors,
        );
    }
}

impl EnumType {
    fn from_cst(
        definition: &cst::EnumTypeDefinition,
        name: Name,
        errors: &mut Vec<BuildError>,
    ) -> Self {
        let mut ty = Self {
            description: description(definition.description()),
            name,
            directives: directives(definition.directives()),
            values: IndexMap::default(),
        };
        add_enum_values(
            &ty.name,
            &mut ty.values,
            definition.enum_values_definition(),
            errors,
        );
        ty
    }

    fn extend_cst(&mut self, extension: &cst::EnumTypeExtension, errors: &mut Vec<BuildError>) {
        self.directives
            .extend(directives(extension.directives()).0);
        add_enum_values(
            &self.name,
            &mut self.values,
            extension.enum_values_definition(),
            errors,
        );
    }
}

impl InputObjectType {
    fn from_cst(
        definition: &cst::InputObjectTypeDefinition,
        name: Name,
        errors: &mut Vec<BuildError>,
    ) -> Self {
        let mut ty = Self {
            description: description(definition.description()),
            name,
            directives: directives(definition.directives()),
            fields: IndexMap::default(),
        };
        add_input_fields(
            &ty.name,
            &mut ty.fields,
            definition.input_fields_definition(),
            errors,
        );
        ty
    }

    fn extend_cst(
        &mut self,
        extension: &cst::InputObjectTypeExtension,
        errors: &mut Vec<BuildError>,
    ) {
        self.directives
            .extend(directives(extension.directives()).0);
        add_input_fields(
            &self.name,
            &mut self.fields,
            extension.input_fields_definition(),
            errors,
        );
    }
}

/// Insert into `map` keyed by name, recording a collision instead of overwriting
fn insert_component<T>(
    type_name: &Name,
    map: &mut IndexMap<Name, Node<T>>,
    describe: &'static str,
    name: Name,
    component: T,
    errors: &mut Vec<BuildError>,
) {
    if map.contains_key(&name) {
        errors.push(BuildError::ComponentNameCollision {
            type_name: type_name.clone(),
            name,
            describe,
        })
    } else {
        map.insert(name, Node::new(component));
    }
}

fn insert_name(
    type_name: &Name,
    set: &mut IndexSet<Name>,
    describe: &'static str,
    name: Name,
    errors: &mut Vec<BuildError>,
) {
    if !set.insert(name.clone()) {
        errors.push(BuildError::ComponentNameCollision {
            type_name: type_name.clone(),
            name,
            describe,
        })
    }
}

fn add_fields(
    type_name: &Name,
    fields: &mut IndexMap<Name, Node<FieldDefinition>>,
    cst: Option<cst::FieldsDefinition>,
    errors: &mut Vec<BuildError>,
) {
    let Some(cst) = cst else { return };
    for field in cst.field_definitions().filter_map(|def| def.convert()) {
        insert_component(type_name, fields, "field", field.name.clone(), field, errors)
    }
}

fn add_input_fields(
    type_name: &Name,
    fields: &mut IndexMap<Name, Node<InputValueDefinition>>,
    cst: Option<cst::InputFieldsDefinition>,
    errors: &mut Vec<BuildError>,
) {
    let Some(cst) = cst else { return };
    for field in cst.input_value_definitions().filter_map(|def| def.convert()) {
        insert_component(
            type_name,
            fields,
            "input field",
            field.name.clone(),
            field,
            errors,
        )
    }
}

fn add_enum_values(
    type_name: &Name,
    values: &mut IndexMap<Name, Node<EnumValueDefinition>>,
    cst: Option<cst::EnumValuesDefinition>,
    errors: &mut Vec<BuildError>,
) {
    let Some(cst) = cst else { return };
    for value in cst.enum_value_definitions().filter_map(|def| def.convert()) {
        insert_component(
            type_name,
            values,
            "value",
            value.value.clone(),
            value,
            errors,
        )
    }
}

fn add_interfaces(
    type_name: &Name,
    interfaces: &mut IndexSet<Name>,
    cst: Option<cst::ImplementsInterfaces>,
    errors: &mut Vec<BuildError>,
) {
    let Some(cst) = cst else { return };
    for name in cst.named_types().filter_map(|ty| ty.name().convert()) {
        insert_name(type_name, interfaces, "implemented interface", name, errors)
    }
}

fn add_members(
    type_name: &Name,
    members: &mut IndexSet<Name>,
    cst: Option<cst::UnionMemberTypes>,
    errors: &mut Vec<BuildError>,
) {
    let Some(cst) = cst else { return };
    for name in cst.named_types().filter_map(|ty| ty.name().convert()) {
        insert_name(type_name, members, "member", name, errors)
    }
}

fn description(description: Option<cst::Description>) -> Option<String> {
    Some(String::from(description?.string_value()?))
}

fn directives(directives: Option<cst::Directives>) -> ast::DirectiveList {
    ast::DirectiveList(collect_opt(directives, |x| x.directives()))
}

/// Similar to `TryFrom`, but with an `Option` return type
/// as a CST node missing a required part has a corresponding syntax error.
trait Convert {
    type Target;
    fn convert(&self) -> Option<Self::Target>;
}

/// Convert and collect, silently skipping entries with conversion errors
/// as they have corresponding parse errors in `SyntaxTree::errors`
fn collect<CstType, AstType>(iter: impl IntoIterator<Item = CstType>) -> Vec<Node<AstType>>
where
    CstType: Convert<Target = AstType>,
{
    iter.into_iter()
        .filter_map(|value| Some(Node::new(value.convert()?)))
        .collect()
}

fn collect_opt<CstType1, CstType2, AstType, F, I>(
    opt: Option<CstType1>,
    convert: F,
) -> Vec<Node<AstType>>
where
    F: FnOnce(CstType1) -> I,
    I: IntoIterator<Item = CstType2>,
    CstType2: Convert<Target = AstType>,
{
    if let Some(cst) = opt {
        collect(convert(cst))
    } else {
        Vec::new()
    }
}

impl<T: Convert> Convert for Option<T> {
    type Target = T::Target;

    fn convert(&self) -> Option<Self::Target> {
        self.as_ref()?.convert()
    }
}

impl Convert for cst::Name {
    type Target = Name;

    fn convert(&self) -> Option<Self::Target> {
        Name::new(self.text().as_str()).ok()
    }
}

impl Convert for cst::OperationType {
    type Target = OperationType;

    fn convert(&self) -> Option<Self::Target> {
        let token = self.syntax().first_token()?;
        match token.kind() {
            S![query] => Some(OperationType::Query),
            S![mutation] => Some(OperationType::Mutation),
            S![subscription] => Some(OperationType::Subscription),
            _ => None,
        }
    }
}

impl Convert for cst::Type {
    type Target = ast::Type;

    fn convert(&self) -> Option<Self::Target> {
        use ast::Type as A;
        use cst::Type as C;
        match self {
            C::NamedType(name) => Some(A::Named(name.name()?.convert()?)),
            C::ListType(inner) => Some(A::List(Box::new(inner.ty()?.convert()?))),
            C::NonNullType(inner) => {
                if let Some(named) = inner.named_type() {
                    Some(A::NonNullNamed(named.name()?.convert()?))
                } else if let Some(list) = inner.list_type() {
                    Some(A::NonNullList(Box::new(list.ty()?.convert()?)))
                } else {
                    None
                }
            }
        }
    }
}

impl Convert for cst::FieldDefinition {
    type Target = ast::FieldDefinition;

    fn convert(&self) -> Option<Self::Target> {
        Some(Self::Target {
            description: description(self.description()),
            name: self.name()?.convert()?,
            arguments: collect_opt(self.arguments_definition(), |x| {
                x.input_value_definitions()
            }),
            ty: self.ty()?.convert()?,
            directives: directives(self.directives()),
        })
    }
}

impl Convert for cst::InputValueDefinition {
    type Target = ast::InputValueDefinition;

    fn convert(&self) -> Option<Self::Target> {
        let default_value = if let Some(default) = self.default_value() {
            Some(Node::new(default.value()?.convert()?))
        } else {
            None
        };
        Some(Self::Target {
            description: description(self.description()),
            name: self.name()?.convert()?,
            ty: Node::new(self.ty()?.convert()?),
            default_value,
            directives: directives(self.directives()),
        })
    }
}

impl Convert for cst::EnumValueDefinition {
    type Target = ast::EnumValueDefinition;

    fn convert(&self) -> Option<Self::Target> {
        Some(Self::Target {
            description: description(self.description()),
            value: self.enum_value()?.name()?.convert()?,
            directives: directives(self.directives()),
        })
    }
}

impl Convert for cst::Directive {
    type Target = ast::Directive;

    fn convert(&self) -> Option<Self::Target> {
        Some(Self::Target {
            name: self.name()?.convert()?,
            arguments: collect_opt(self.arguments(), |x| x.arguments()),
        })
    }
}

impl Convert for cst::Argument {
    type Target = ast::Argument;

    fn convert(&self) -> Option<Self::Target> {
        Some(ast::Argument {
            name: self.name()?.convert()?,
            value: Node::new(self.value()?.convert()?),
        })
    }
}

impl Convert for cst::Value {
    type Target = ast::Value;

    fn convert(&self) -> Option<Self::Target> {
        use ast::Value as A;
        use cst::Value as C;

        Some(match self {
            C::Variable(v) => A::Variable(v.name()?.convert()?),
            C::StringValue(v) => A::String(String::from(v)),
            C::FloatValue(v) => A::Float(ast::FloatValue::new_parsed(
                v.syntax().first_token()?.text(),
            )),
            C::IntValue(v) => A::Int(ast::IntValue::new_parsed(v.syntax().first_token()?.text())),
            C::BooleanValue(v) => A::Boolean(bool::try_from(v).ok()?),
            C::NullValue(_) => A::Null,
            C::EnumValue(v) => A::Enum(v.name()?.convert()?),
            C::ListValue(v) => A::List(collect(v.values())),
            C::ObjectValue(v) => A::Object(
                v.object_fields()
                    .filter_map(|x| x.convert())
                    .collect(),
            ),
        })
    }
}

impl Convert for cst::ObjectField {
    type Target = (Name, Node<ast::Value>);

    fn convert(&self) -> Option<Self::Target> {
        let name = self.name()?.convert()?;
        let value = Node::new(self.value()?.convert()?);
        Some((name, value))
    }
}
