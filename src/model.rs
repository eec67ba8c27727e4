use serde::Serialize;
use std::fmt;

/// Type keywords that `PrimitiveKeyword` may carry besides opaque text.
const TYPE_KEYWORDS: &[&str] = &[
    "any",
    "unknown",
    "never",
    "void",
    "undefined",
    "null",
    "string",
    "number",
    "bigint",
    "boolean",
    "symbol",
    "object",
    "this",
];

/// The type of a property or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropertyType {
    /// A keyword type, or any type expression without a dedicated variant,
    /// stored as its source text.
    PrimitiveKeyword(String),
    FunctionType(Function),
    /// An inline object type.
    LiteralTypeObject(Interface),
    /// `'x'`, `42`, `true`
    LiteralValue(String),
    /// Members in source order, duplicates kept.
    Union(Vec<PropertyType>),
    Array(Box<PropertyType>),
}

impl PropertyType {
    pub fn primitive(text: &str) -> Self {
        PropertyType::PrimitiveKeyword(text.to_string())
    }

    pub fn literal(text: &str) -> Self {
        PropertyType::LiteralValue(text.to_string())
    }

    pub fn array(element: PropertyType) -> Self {
        PropertyType::Array(Box::new(element))
    }

    /// The keyword this type names, if it is a plain keyword type.
    pub fn keyword(&self) -> Option<&str> {
        match self {
            PropertyType::PrimitiveKeyword(text) => {
                let text = text.trim();
                TYPE_KEYWORDS.iter().find(|k| **k == text).copied()
            }
            _ => None,
        }
    }

    fn needs_parens_in_array(&self) -> bool {
        matches!(self, PropertyType::Union(_) | PropertyType::FunctionType(_))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::PrimitiveKeyword(text) | PropertyType::LiteralValue(text) => {
                write!(f, "{}", text)
            }
            PropertyType::FunctionType(func) => {
                let ret = if func.return_type.is_empty() {
                    "void"
                } else {
                    func.return_type.as_str()
                };
                write!(f, "({}) => {}", func.parameter_list(), ret)
            }
            PropertyType::LiteralTypeObject(iface) => write!(f, "{}", iface.body()),
            PropertyType::Union(members) => {
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    if matches!(m, PropertyType::FunctionType(_)) {
                        write!(f, "({})", m)?;
                    } else {
                        write!(f, "{}", m)?;
                    }
                }
                Ok(())
            }
            PropertyType::Array(element) => {
                if element.needs_parens_in_array() {
                    write!(f, "({})[]", element)
                } else {
                    write!(f, "{}[]", element)
                }
            }
        }
    }
}

/// A parameter, or a property of an interface, class or object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub property_type: PropertyType,
    pub optional: bool,
}

impl Property {
    pub fn new(name: &str, property_type: PropertyType, optional: bool) -> Self {
        Property {
            name: name.to_string(),
            property_type,
            optional,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.optional {
            write!(f, "?")?;
        }
        let ty = self.property_type.to_string();
        if !ty.is_empty() {
            write!(f, ": {}", ty)?;
        }
        Ok(())
    }
}

/// A function declaration, method, call signature, constructor or function type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Function {
    /// Empty for call signatures and function types; `constructor` for constructors.
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<Property>,
    /// Raw modifier tokens in source order.
    pub modifiers: Vec<String>,
}

impl Function {
    pub fn new(name: &str, return_type: &str) -> Self {
        Function {
            name: name.to_string(),
            return_type: return_type.to_string(),
            parameters: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn add_parameter(&mut self, parameter: Property) {
        self.parameters.push(parameter);
    }

    pub fn add_modifier(&mut self, modifier: &str) {
        self.modifiers.push(modifier.to_string());
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{} ", m)?;
        }
        write!(f, "{}({})", self.name, self.parameter_list())?;
        if !self.return_type.is_empty() {
            write!(f, ": {}", self.return_type)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Interface {
    pub name: String,
    pub properties: Vec<Property>,
    pub methods: Vec<Function>,
    /// Signatures without a name: `(x: number): string`.
    pub call_signatures: Vec<Function>,
}

impl Interface {
    pub fn new(name: &str) -> Self {
        Interface {
            name: name.to_string(),
            ..Interface::default()
        }
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn add_method(&mut self, method: Function) {
        self.methods.push(method);
    }

    pub fn add_call_signature(&mut self, signature: Function) {
        self.call_signatures.push(signature);
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&Function> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Object-type rendering of the members: `{ a: T; m(): R; }`.
    fn body(&self) -> String {
        let mut members: Vec<String> = Vec::new();
        members.extend(self.properties.iter().map(|p| p.to_string()));
        members.extend(self.methods.iter().map(|m| m.to_string()));
        members.extend(self.call_signatures.iter().map(|c| c.to_string()));
        if members.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {}; }}", members.join("; "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Class {
    pub name: String,
    pub constructor: Option<Function>,
    pub methods: Vec<Function>,
    pub properties: Vec<Property>,
}

impl Class {
    pub fn new(name: &str) -> Self {
        Class {
            name: name.to_string(),
            ..Class::default()
        }
    }

    /// Set the constructor, replacing an earlier one (overloads: last wins).
    pub fn add_constructor(&mut self, constructor: Function) -> &mut Function {
        self.constructor.insert(constructor)
    }

    pub fn add_method(&mut self, method: Function) {
        self.methods.push(method);
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&Function> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A namespace and the declarations made directly inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Namespace {
    /// Dotted qualified name; empty for the global scope.
    pub name: String,
    pub functions: Vec<Function>,
    pub interfaces: Vec<Interface>,
    pub classes: Vec<Class>,
}

impl Namespace {
    pub fn new(name: &str) -> Self {
        Namespace {
            name: name.to_string(),
            ..Namespace::default()
        }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// All declared constructs: functions, then interfaces, then classes,
    /// each in declaration order.
    pub fn constructs(&self) -> impl Iterator<Item = Construct<'_>> {
        self.functions
            .iter()
            .map(Construct::Function)
            .chain(self.interfaces.iter().map(Construct::Interface))
            .chain(self.classes.iter().map(Construct::Class))
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.interfaces.is_empty() && self.classes.is_empty()
    }
}

/// A borrowed top-level declaration of a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct<'a> {
    Function(&'a Function),
    Interface(&'a Interface),
    Class(&'a Class),
}

impl<'a> Construct<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Construct::Function(f) => &f.name,
            Construct::Interface(i) => &i.name,
            Construct::Class(c) => &c.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Construct::Function(_) => "function",
            Construct::Interface(_) => "interface",
            Construct::Class(_) => "class",
        }
    }
}

/// Every namespace of a build pass, in first-encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeclarationMap {
    pub namespaces: Vec<Namespace>,
}

impl DeclarationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|n| n.name == name)
    }

    /// The namespace holding declarations made outside any namespace.
    pub fn global(&self) -> Option<&Namespace> {
        self.namespace("")
    }
}

// ── Containers ──────────────────────────────────────────────────────
//
// Each `add_*` stores the entity in the container and hands back the stored
// copy, so the caller can keep adjusting it in place.

pub trait AddFunction {
    fn add_function(&mut self, function: Function) -> &mut Function;
}

pub trait AddInterface {
    fn add_interface(&mut self, interface: Interface) -> &mut Interface;
}

pub trait AddClass {
    fn add_class(&mut self, class: Class) -> &mut Class;
}

/// Get-or-create: a namespace seen twice is reopened, never replaced.
pub trait AddNamespace {
    fn add_namespace(&mut self, name: &str) -> &mut Namespace;
}

impl AddFunction for Namespace {
    fn add_function(&mut self, function: Function) -> &mut Function {
        let idx = self.functions.len();
        self.functions.push(function);
        &mut self.functions[idx]
    }
}

impl AddInterface for Namespace {
    fn add_interface(&mut self, interface: Interface) -> &mut Interface {
        let idx = self.interfaces.len();
        self.interfaces.push(interface);
        &mut self.interfaces[idx]
    }
}

impl AddClass for Namespace {
    fn add_class(&mut self, class: Class) -> &mut Class {
        let idx = self.classes.len();
        self.classes.push(class);
        &mut self.classes[idx]
    }
}

impl AddNamespace for DeclarationMap {
    fn add_namespace(&mut self, name: &str) -> &mut Namespace {
        let idx = match self.namespaces.iter().position(|n| n.name == name) {
            Some(idx) => idx,
            None => {
                self.namespaces.push(Namespace::new(name));
                self.namespaces.len() - 1
            }
        };
        &mut self.namespaces[idx]
    }
}
