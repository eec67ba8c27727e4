//! Syntax tree handed over by the external declaration parser.
//!
//! Only the node kinds the builder understands get their own variants; every
//! other construct arrives as an `Other` node carrying its source text. All
//! nodes can render themselves back to declaration text with `render()`.
use serde::{Deserialize, Serialize};

/// A name-bearing node: identifier, string/numeric literal, computed name or
/// destructuring pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PropertyName {
    Identifier { text: String },
    /// Raw source text, quotes included (e.g. `'foo'`).
    StringLiteral { text: String },
    NumericLiteral { text: String },
    /// `[expression]`
    Computed { expression: String },
    /// `{ a, b }` or `[a, b]` in parameter position
    BindingPattern { text: String },
}

impl PropertyName {
    pub fn identifier(text: &str) -> Self {
        PropertyName::Identifier {
            text: text.to_string(),
        }
    }

    pub fn string_literal(raw: &str) -> Self {
        PropertyName::StringLiteral {
            text: raw.to_string(),
        }
    }

    pub fn render(&self) -> String {
        match self {
            PropertyName::Identifier { text }
            | PropertyName::StringLiteral { text }
            | PropertyName::NumericLiteral { text }
            | PropertyName::BindingPattern { text } => text.clone(),
            PropertyName::Computed { expression } => format!("[{}]", expression),
        }
    }
}

/// A modifier token (`export`, `declare`, `static`, `readonly`, ...), kept raw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Modifier(pub String);

impl Modifier {
    pub fn new(text: &str) -> Self {
        Modifier(text.to_string())
    }

    pub fn render(&self) -> String {
        self.0.clone()
    }
}

/// A type annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeNode {
    /// `string`, `number`, `void`, `any`, ...
    Keyword { text: String },
    /// `Foo`, `Promise<T>`; type arguments stay opaque to the builder.
    TypeReference {
        name: String,
        #[serde(default)]
        type_arguments: Vec<TypeNode>,
    },
    /// `'x'`, `42`, `true`
    Literal { text: String },
    /// `(T)`
    Parenthesized { inner: Box<TypeNode> },
    /// `(a: A) => R`
    Function(Box<SignatureNode>),
    /// `{ a: A; b(): void }`
    TypeLiteral(TypeLiteralNode),
    Union { types: Vec<TypeNode> },
    Intersection { types: Vec<TypeNode> },
    /// `T[]`
    Array { element: Box<TypeNode> },
    Tuple { elements: Vec<TypeNode> },
    /// Any other type syntax (conditional, mapped, indexed access, `typeof`...).
    Other {
        #[serde(default)]
        syntax_kind: String,
        text: String,
    },
}

impl TypeNode {
    pub fn keyword(text: &str) -> Self {
        TypeNode::Keyword {
            text: text.to_string(),
        }
    }

    pub fn reference(name: &str) -> Self {
        TypeNode::TypeReference {
            name: name.to_string(),
            type_arguments: Vec::new(),
        }
    }

    pub fn literal(text: &str) -> Self {
        TypeNode::Literal {
            text: text.to_string(),
        }
    }

    pub fn parenthesized(inner: TypeNode) -> Self {
        TypeNode::Parenthesized {
            inner: Box::new(inner),
        }
    }

    pub fn union(types: Vec<TypeNode>) -> Self {
        TypeNode::Union { types }
    }

    pub fn function(signature: SignatureNode) -> Self {
        TypeNode::Function(Box::new(signature))
    }

    pub fn array(element: TypeNode) -> Self {
        TypeNode::Array {
            element: Box::new(element),
        }
    }

    pub fn render(&self) -> String {
        match self {
            TypeNode::Keyword { text } | TypeNode::Literal { text } => text.clone(),
            TypeNode::TypeReference {
                name,
                type_arguments,
            } => {
                if type_arguments.is_empty() {
                    name.clone()
                } else {
                    format!("{}<{}>", name, join_rendered(type_arguments, ", "))
                }
            }
            TypeNode::Parenthesized { inner } => format!("({})", inner.render()),
            TypeNode::Function(sig) => {
                let ret = sig
                    .return_type
                    .as_ref()
                    .map(|t| t.render())
                    .unwrap_or_else(|| "void".to_string());
                format!("{}({}) => {}", sig.render_type_parameters(), sig.render_parameters(), ret)
            }
            TypeNode::TypeLiteral(lit) => lit.render(),
            TypeNode::Union { types } => join_rendered(types, " | "),
            TypeNode::Intersection { types } => join_rendered(types, " & "),
            TypeNode::Array { element } => format!("{}[]", element.render()),
            TypeNode::Tuple { elements } => format!("[{}]", join_rendered(elements, ", ")),
            TypeNode::Other { text, .. } => text.clone(),
        }
    }
}

fn join_rendered(types: &[TypeNode], sep: &str) -> String {
    types
        .iter()
        .map(|t| t.render())
        .collect::<Vec<_>>()
        .join(sep)
}

/// A parameter of a function-like node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterNode {
    #[serde(default)]
    pub name: Option<PropertyName>,
    #[serde(default)]
    pub question_token: bool,
    #[serde(default)]
    pub dot_dot_dot: bool,
    #[serde(default)]
    pub type_annotation: Option<TypeNode>,
}

impl ParameterNode {
    pub fn new(name: &str, type_annotation: TypeNode) -> Self {
        ParameterNode {
            name: Some(PropertyName::identifier(name)),
            question_token: false,
            dot_dot_dot: false,
            type_annotation: Some(type_annotation),
        }
    }

    pub fn optional(mut self) -> Self {
        self.question_token = true;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.dot_dot_dot {
            out.push_str("...");
        }
        if let Some(name) = &self.name {
            out.push_str(&name.render());
        }
        if self.question_token {
            out.push('?');
        }
        if let Some(ty) = &self.type_annotation {
            out.push_str(": ");
            out.push_str(&ty.render());
        }
        out
    }
}

/// Property signature in an interface/type literal, or property declaration
/// in a class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyNode {
    #[serde(default)]
    pub name: Option<PropertyName>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub question_token: bool,
    #[serde(default)]
    pub type_annotation: Option<TypeNode>,
}

impl PropertyNode {
    pub fn new(name: PropertyName, type_annotation: TypeNode) -> Self {
        PropertyNode {
            name: Some(name),
            modifiers: Vec::new(),
            question_token: false,
            type_annotation: Some(type_annotation),
        }
    }

    pub fn optional(mut self) -> Self {
        self.question_token = true;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for m in &self.modifiers {
            out.push_str(&m.render());
            out.push(' ');
        }
        if let Some(name) = &self.name {
            out.push_str(&name.render());
        }
        if self.question_token {
            out.push('?');
        }
        if let Some(ty) = &self.type_annotation {
            out.push_str(": ");
            out.push_str(&ty.render());
        }
        out
    }
}

/// Anything with a parameter list: function declarations, methods, call and
/// construct signatures, constructors and function types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignatureNode {
    #[serde(default)]
    pub name: Option<PropertyName>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Method signatures only: `bar?(): void`.
    #[serde(default)]
    pub question_token: bool,
    /// Raw generic parameter declarations, e.g. `T extends object`.
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterNode>,
    #[serde(default)]
    pub return_type: Option<TypeNode>,
}

impl SignatureNode {
    pub fn new(name: &str) -> Self {
        SignatureNode {
            name: Some(PropertyName::identifier(name)),
            ..SignatureNode::default()
        }
    }

    /// A signature without a name (call signature, function type).
    pub fn anonymous() -> Self {
        SignatureNode::default()
    }

    pub fn with_modifier(mut self, modifier: &str) -> Self {
        self.modifiers.push(Modifier::new(modifier));
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterNode) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn returning(mut self, return_type: TypeNode) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn render_parameters(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.render())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn render_type_parameters(&self) -> String {
        if self.type_parameters.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.type_parameters.join(", "))
        }
    }

    /// Render in member position: `[modifiers] name?<T>(params): ret`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for m in &self.modifiers {
            out.push_str(&m.render());
            out.push(' ');
        }
        if let Some(name) = &self.name {
            out.push_str(&name.render());
        }
        if self.question_token {
            out.push('?');
        }
        out.push_str(&self.render_type_parameters());
        out.push('(');
        out.push_str(&self.render_parameters());
        out.push(')');
        if let Some(ret) = &self.return_type {
            out.push_str(": ");
            out.push_str(&ret.render());
        }
        out
    }
}

/// A member of an interface body or type literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TypeElement {
    PropertySignature(PropertyNode),
    MethodSignature(SignatureNode),
    CallSignature(SignatureNode),
    /// `new (x: X): T`
    ConstructSignature(SignatureNode),
    /// `[key: string]: T`
    IndexSignature { text: String },
    Other {
        #[serde(default)]
        syntax_kind: String,
        text: String,
    },
}

impl TypeElement {
    pub fn render(&self) -> String {
        match self {
            TypeElement::PropertySignature(p) => p.render(),
            TypeElement::MethodSignature(s) | TypeElement::CallSignature(s) => s.render(),
            TypeElement::ConstructSignature(s) => format!("new {}", s.render()),
            TypeElement::IndexSignature { text } | TypeElement::Other { text, .. } => text.clone(),
        }
    }
}

/// An inline object type `{ ... }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeLiteralNode {
    #[serde(default)]
    pub members: Vec<TypeElement>,
}

impl TypeLiteralNode {
    pub fn render(&self) -> String {
        if self.members.is_empty() {
            return "{}".to_string();
        }
        let mut out = String::from("{ ");
        for m in &self.members {
            out.push_str(&m.render());
            out.push_str("; ");
        }
        out.push('}');
        out
    }
}

/// A member of a class body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ClassElement {
    Constructor(SignatureNode),
    Method(SignatureNode),
    Property(PropertyNode),
    GetAccessor(SignatureNode),
    SetAccessor(SignatureNode),
    IndexSignature { text: String },
    Other {
        #[serde(default)]
        syntax_kind: String,
        text: String,
    },
}

impl ClassElement {
    pub fn render(&self) -> String {
        match self {
            ClassElement::Constructor(s) => {
                // The source name of a constructor is whatever the parser saw.
                let mut s = s.clone();
                if s.name.is_none() {
                    s.name = Some(PropertyName::identifier("constructor"));
                }
                s.render()
            }
            ClassElement::Method(s) => s.render(),
            ClassElement::GetAccessor(s) => format!("get {}", s.render()),
            ClassElement::SetAccessor(s) => format!("set {}", s.render()),
            ClassElement::Property(p) => p.render(),
            ClassElement::IndexSignature { text } | ClassElement::Other { text, .. } => {
                text.clone()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InterfaceDeclaration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub members: Vec<TypeElement>,
}

impl InterfaceDeclaration {
    pub fn new(name: &str) -> Self {
        InterfaceDeclaration {
            name: Some(name.to_string()),
            ..InterfaceDeclaration::default()
        }
    }

    pub fn with_member(mut self, member: TypeElement) -> Self {
        self.members.push(member);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassDeclaration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub members: Vec<ClassElement>,
}

impl ClassDeclaration {
    pub fn new(name: &str) -> Self {
        ClassDeclaration {
            name: Some(name.to_string()),
            ..ClassDeclaration::default()
        }
    }

    pub fn with_member(mut self, member: ClassElement) -> Self {
        self.members.push(member);
        self
    }
}

/// `declare namespace A { ... }` / `declare module "a" { ... }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    /// Unquoted name text.
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub body: Vec<Statement>,
}

/// A top-level or namespace-level statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Statement {
    Module(ModuleDeclaration),
    Function(SignatureNode),
    Interface(InterfaceDeclaration),
    Class(ClassDeclaration),
    /// Variables, type aliases, enums, imports, exports...
    Other {
        #[serde(default)]
        syntax_kind: String,
        text: String,
    },
}

/// A parsed declaration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub statements: Vec<Statement>,
}
