use crate::model::*;
use crate::syntax::*;
use tracing::{debug, trace};

/// Name every class constructor gets, whatever the source spelled.
pub const CONSTRUCTOR_NAME: &str = "constructor";

const QUOTES: &[char] = &['\'', '"'];

/// Build the declaration model of a whole source file.
///
/// Declarations outside any namespace land in the global namespace (empty
/// name); namespace bodies are walked recursively and registered under their
/// dotted qualified name.
pub fn build_declarations(file: &SourceFile) -> DeclarationMap {
    let mut map = DeclarationMap::new();
    add_statements(&file.statements, "", &mut map);
    debug!(
        file = file.file_name.as_deref().unwrap_or("<memory>"),
        namespaces = map.namespaces.len(),
        "built declaration map"
    );
    map
}

fn add_statements(statements: &[Statement], scope: &str, map: &mut DeclarationMap) {
    for stmt in statements {
        match stmt {
            Statement::Module(module) => {
                let qualified = add_namespace(module, scope, map).name.clone();
                add_statements(&module.body, &qualified, map);
            }
            Statement::Function(sig) => {
                add_function_declaration(sig, map.add_namespace(scope));
            }
            Statement::Interface(iface) => {
                add_interface_declaration(iface, map.add_namespace(scope));
            }
            Statement::Class(class) => {
                add_class_declaration(class, map.add_namespace(scope));
            }
            Statement::Other { syntax_kind, .. } => {
                trace!(syntax_kind = %syntax_kind, scope, "skipping statement");
            }
        }
    }
}

// ── Build-and-attach ────────────────────────────────────────────────

/// Open the namespace declared by `node` inside `scope` (empty for the
/// global scope), creating it on first encounter.
pub fn add_namespace<'m>(
    node: &ModuleDeclaration,
    scope: &str,
    map: &'m mut impl AddNamespace,
) -> &'m mut Namespace {
    let name = normalize_name(&node.name);
    let qualified = if scope.is_empty() {
        name
    } else {
        format!("{}.{}", scope, name)
    };
    map.add_namespace(&qualified)
}

pub fn add_function_declaration<'p>(
    node: &SignatureNode,
    parent: &'p mut impl AddFunction,
) -> &'p mut Function {
    parent.add_function(function_from(node))
}

pub fn add_interface_declaration<'p>(
    node: &InterfaceDeclaration,
    parent: &'p mut impl AddInterface,
) -> &'p mut Interface {
    parent.add_interface(interface_from(node))
}

pub fn add_class_declaration<'p>(
    node: &ClassDeclaration,
    parent: &'p mut impl AddClass,
) -> &'p mut Class {
    parent.add_class(class_from(node))
}

// ── Syntax views ────────────────────────────────────────────────────

/// What the builder reads from a parameter or property node.
pub trait PropertyLike {
    fn name(&self) -> Option<&PropertyName>;
    fn type_annotation(&self) -> Option<&TypeNode>;
    fn is_optional(&self) -> bool;
}

impl PropertyLike for ParameterNode {
    fn name(&self) -> Option<&PropertyName> {
        self.name.as_ref()
    }
    fn type_annotation(&self) -> Option<&TypeNode> {
        self.type_annotation.as_ref()
    }
    fn is_optional(&self) -> bool {
        self.question_token
    }
}

impl PropertyLike for PropertyNode {
    fn name(&self) -> Option<&PropertyName> {
        self.name.as_ref()
    }
    fn type_annotation(&self) -> Option<&TypeNode> {
        self.type_annotation.as_ref()
    }
    fn is_optional(&self) -> bool {
        self.question_token
    }
}

/// An interface body: a named interface declaration or an inline type literal.
pub trait InterfaceLike {
    fn name(&self) -> Option<&str>;
    fn members(&self) -> &[TypeElement];
}

impl InterfaceLike for InterfaceDeclaration {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
    fn members(&self) -> &[TypeElement] {
        &self.members
    }
}

impl InterfaceLike for TypeLiteralNode {
    fn name(&self) -> Option<&str> {
        None
    }
    fn members(&self) -> &[TypeElement] {
        &self.members
    }
}

// ── Pure builders ───────────────────────────────────────────────────

/// Trim, then drop one leading and one trailing quote character, so that
/// `'foo'`, `"foo"` and `foo` all name the same member.
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed.strip_prefix(QUOTES).unwrap_or(trimmed);
    let unquoted = unquoted.strip_suffix(QUOTES).unwrap_or(unquoted);
    unquoted.to_string()
}

fn name_text(name: Option<&PropertyName>) -> String {
    name.map(|n| normalize_name(&n.render())).unwrap_or_default()
}

pub fn function_from(node: &SignatureNode) -> Function {
    let return_type = node
        .return_type
        .as_ref()
        .map(|t| t.render())
        .unwrap_or_default();
    let mut function = Function::new(&name_text(node.name.as_ref()), &return_type);

    for p in &node.parameters {
        function.add_parameter(property_from(p));
    }
    for m in &node.modifiers {
        function.add_modifier(&m.render());
    }

    function
}

pub fn interface_from(node: &impl InterfaceLike) -> Interface {
    let mut iface = Interface::new(&normalize_name(node.name().unwrap_or("")));

    for member in node.members() {
        match member {
            TypeElement::PropertySignature(p) => iface.add_property(property_from(p)),
            TypeElement::MethodSignature(m) => iface.add_method(function_from(m)),
            TypeElement::CallSignature(c) => iface.add_call_signature(function_from(c)),
            TypeElement::ConstructSignature(_)
            | TypeElement::IndexSignature { .. }
            | TypeElement::Other { .. } => {
                trace!(interface = %iface.name, member = %member.render(), "skipping member");
            }
        }
    }

    iface
}

pub fn class_from(node: &ClassDeclaration) -> Class {
    let mut class = Class::new(&normalize_name(node.name.as_deref().unwrap_or("")));

    for member in &node.members {
        match member {
            ClassElement::Constructor(c) => {
                let constructor = class.add_constructor(function_from(c));
                constructor.name = CONSTRUCTOR_NAME.to_string();
            }
            ClassElement::Method(m) => class.add_method(function_from(m)),
            ClassElement::Property(p) => class.add_property(property_from(p)),
            ClassElement::GetAccessor(_)
            | ClassElement::SetAccessor(_)
            | ClassElement::IndexSignature { .. }
            | ClassElement::Other { .. } => {
                trace!(class = %class.name, member = %member.render(), "skipping member");
            }
        }
    }

    class
}

pub fn property_from(node: &impl PropertyLike) -> Property {
    Property {
        name: name_text(node.name()),
        property_type: property_type_from(node.type_annotation()),
        optional: node.is_optional(),
    }
}

/// Map a type annotation onto the closed `PropertyType` variants.
///
/// Total: kinds without a dedicated variant, and a missing annotation, come
/// back as `PrimitiveKeyword` holding the rendered text.
pub fn property_type_from(node: Option<&TypeNode>) -> PropertyType {
    let node = match node {
        Some(n) => n,
        None => return PropertyType::PrimitiveKeyword(String::new()),
    };

    match node {
        TypeNode::Parenthesized { inner } => property_type_from(Some(&**inner)),
        TypeNode::Function(sig) => PropertyType::FunctionType(function_from(sig)),
        TypeNode::TypeLiteral(lit) => PropertyType::LiteralTypeObject(interface_from(lit)),
        TypeNode::Literal { .. } => PropertyType::LiteralValue(node.render()),
        TypeNode::Union { types } => PropertyType::Union(
            types
                .iter()
                .map(|t| property_type_from(Some(t)))
                .collect(),
        ),
        TypeNode::Array { element } => {
            PropertyType::Array(Box::new(property_type_from(Some(&**element))))
        }
        TypeNode::Keyword { .. }
        | TypeNode::TypeReference { .. }
        | TypeNode::Intersection { .. }
        | TypeNode::Tuple { .. }
        | TypeNode::Other { .. } => PropertyType::PrimitiveKeyword(node.render()),
    }
}
