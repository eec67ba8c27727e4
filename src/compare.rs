use crate::difference::*;
use crate::model::*;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

// ── Options ─────────────────────────────────────────────────────────

/// How parameters of two signatures are paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Alignment {
    /// Pair parameters with the same name; anonymous parameters pair by position.
    #[default]
    ByName,
    /// Pair the n-th reference parameter with the n-th candidate parameter.
    ByPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompareOptions {
    pub alignment: Alignment,
}

// ── Type relation ───────────────────────────────────────────────────

/// How two property types relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRelation {
    /// Same type, up to whitespace and union member order.
    Equivalent,
    /// Different, but some value inhabits both.
    Overlapping,
    /// No value inhabits both.
    Disjoint,
}

static PUNCT_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([<>()\[\]{},;:|&?=])\s*").expect("valid regex"));
static RUN_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Canonical spelling of opaque type text: no whitespace around punctuation,
/// single spaces elsewhere.
pub fn normalize_type_text(text: &str) -> String {
    let tight = PUNCT_SPACE.replace_all(text.trim(), "$1");
    RUN_SPACE.replace_all(&tight, " ").into_owned()
}

pub fn type_relation(expected: &PropertyType, actual: &PropertyType) -> TypeRelation {
    if types_equivalent(expected, actual) {
        TypeRelation::Equivalent
    } else if types_overlap(expected, actual) {
        TypeRelation::Overlapping
    } else {
        TypeRelation::Disjoint
    }
}

fn types_equivalent(a: &PropertyType, b: &PropertyType) -> bool {
    use PropertyType::*;
    match (a, b) {
        (PrimitiveKeyword(x), PrimitiveKeyword(y)) => {
            normalize_type_text(x) == normalize_type_text(y)
        }
        (LiteralValue(x), LiteralValue(y)) => canonical_literal(x) == canonical_literal(y),
        (FunctionType(f), FunctionType(g)) => signatures_equivalent(f, g),
        (LiteralTypeObject(i), LiteralTypeObject(j)) => object_types_equivalent(i, j),
        (Array(x), Array(y)) => types_equivalent(x, y),
        (Union(xs), Union(ys)) => {
            xs.iter().all(|x| ys.iter().any(|y| types_equivalent(x, y)))
                && ys.iter().all(|y| xs.iter().any(|x| types_equivalent(x, y)))
        }
        // `A | A` against `A`
        (Union(xs), other) | (other, Union(xs)) => {
            !xs.is_empty() && xs.iter().all(|x| types_equivalent(x, other))
        }
        _ => false,
    }
}

/// Parameter names are irrelevant for function types; order, optionality and
/// types are not.
fn signatures_equivalent(f: &Function, g: &Function) -> bool {
    canonical_return_type(&f.return_type) == canonical_return_type(&g.return_type)
        && f.parameters.len() == g.parameters.len()
        && f.parameters.iter().zip(&g.parameters).all(|(p, q)| {
            p.optional == q.optional && types_equivalent(&p.property_type, &q.property_type)
        })
}

fn object_types_equivalent(i: &Interface, j: &Interface) -> bool {
    let properties = i.properties.len() == j.properties.len()
        && i.properties.iter().all(|p| match j.property(&p.name) {
            Some(q) => {
                p.optional == q.optional && types_equivalent(&p.property_type, &q.property_type)
            }
            None => false,
        });
    let methods = i.methods.len() == j.methods.len()
        && i.methods.iter().all(|m| match j.method(&m.name) {
            Some(n) => signatures_equivalent(m, n),
            None => false,
        });
    let calls = i.call_signatures.len() == j.call_signatures.len()
        && i
            .call_signatures
            .iter()
            .zip(&j.call_signatures)
            .all(|(c, d)| signatures_equivalent(c, d));
    properties && methods && calls
}

/// `any`, `unknown`, and a missing annotation (implicitly `any`).
fn is_top(t: &PropertyType) -> bool {
    match t {
        PropertyType::PrimitiveKeyword(text) if text.trim().is_empty() => true,
        _ => matches!(t.keyword(), Some("any") | Some("unknown")),
    }
}

fn is_object_keyword(text: &str) -> bool {
    matches!(text.trim(), "object" | "Object")
}

const STRING_QUOTES: &[char] = &['\'', '"', '`'];

/// The keyword type a literal type belongs to.
fn literal_base(text: &str) -> Option<&'static str> {
    let text = text.trim();
    if text.starts_with(STRING_QUOTES) {
        return Some("string");
    }
    match text {
        "true" | "false" => return Some("boolean"),
        "null" => return Some("null"),
        "undefined" => return Some("undefined"),
        _ => {}
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if let Some(big) = digits.strip_suffix('n') {
        if !big.is_empty() && big.chars().all(|c| c.is_ascii_digit() || c == '_') {
            return Some("bigint");
        }
    }
    if digits.replace('_', "").parse::<f64>().is_ok() {
        return Some("number");
    }
    None
}

/// Top-level union members of return-type text, sorted and deduplicated, so
/// `A | B` and `B | A` compare equal.
fn canonical_return_type(text: &str) -> Vec<String> {
    let text = normalize_type_text(text);
    let mut members: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut prev = '\0';
    for (i, ch) in text.char_indices() {
        match ch {
            '<' | '(' | '[' | '{' => depth += 1,
            // a top-level function type takes the rest of the text as its return type
            '>' if prev == '=' && depth == 0 => break,
            '>' if prev == '=' => {}
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                members.push(text[start..i].to_string());
                start = i + 1;
            }
            _ => {}
        }
        prev = ch;
    }
    members.push(text[start..].to_string());
    members.sort_unstable();
    members.dedup();
    members
}

/// String literals compare by content, whatever quote they were written with.
fn canonical_literal(text: &str) -> String {
    let text = text.trim();
    if literal_base(text) == Some("string") {
        let content = text.strip_prefix(STRING_QUOTES).unwrap_or(text);
        let content = content.strip_suffix(STRING_QUOTES).unwrap_or(content);
        format!("\"{}\"", content)
    } else {
        normalize_type_text(text)
    }
}

/// Element text of `Array<T>` / `ReadonlyArray<T>` spelled as a reference.
fn generic_array_element(text: &str) -> Option<String> {
    let text = normalize_type_text(text);
    let inner = text
        .strip_prefix("Array<")
        .or_else(|| text.strip_prefix("ReadonlyArray<"))?
        .strip_suffix('>')?;
    Some(inner.to_string())
}

fn types_overlap(a: &PropertyType, b: &PropertyType) -> bool {
    use PropertyType::*;
    if a.keyword() == Some("never") || b.keyword() == Some("never") {
        return false;
    }
    if is_top(a) || is_top(b) {
        return true;
    }
    match (a, b) {
        (Union(xs), other) | (other, Union(xs)) => xs.iter().any(|x| types_overlap(x, other)),
        (PrimitiveKeyword(x), PrimitiveKeyword(y)) => {
            let (x, y) = (normalize_type_text(x), normalize_type_text(y));
            if x == y {
                return true;
            }
            // A named type may well be an object type.
            (is_object_keyword(&x) && a.keyword().is_some() && b.keyword().is_none())
                || (is_object_keyword(&y) && b.keyword().is_some() && a.keyword().is_none())
        }
        (LiteralValue(x), LiteralValue(y)) => canonical_literal(x) == canonical_literal(y),
        (LiteralValue(lit), prim @ PrimitiveKeyword(_))
        | (prim @ PrimitiveKeyword(_), LiteralValue(lit)) => {
            literal_base(lit).is_some() && literal_base(lit) == prim.keyword()
        }
        (Array(x), Array(y)) => types_overlap(x, y),
        (Array(element), PrimitiveKeyword(text)) | (PrimitiveKeyword(text), Array(element)) => {
            if is_object_keyword(text) {
                return true;
            }
            match generic_array_element(text) {
                Some(inner) => types_overlap(element, &PropertyType::PrimitiveKeyword(inner)),
                None => false,
            }
        }
        (FunctionType(_), FunctionType(_)) => true,
        (FunctionType(_), PrimitiveKeyword(text)) | (PrimitiveKeyword(text), FunctionType(_)) => {
            is_object_keyword(text) || text.trim() == "Function"
        }
        (LiteralTypeObject(i), LiteralTypeObject(j)) => i.properties.iter().all(|p| {
            j.property(&p.name)
                .map_or(true, |q| types_overlap(&p.property_type, &q.property_type))
        }),
        (LiteralTypeObject(_), PrimitiveKeyword(text))
        | (PrimitiveKeyword(text), LiteralTypeObject(_)) => is_object_keyword(text),
        (LiteralTypeObject(iface), FunctionType(_))
        | (FunctionType(_), LiteralTypeObject(iface)) => !iface.call_signatures.is_empty(),
        _ => false,
    }
}

// ── Alignment ───────────────────────────────────────────────────────

/// A reference item paired with its candidate counterpart, or left alone.
/// The index is the item's position in its own list (the reference list for
/// `Both`).
enum Pairing<'a, T> {
    Both(usize, &'a T, &'a T),
    Missing(usize, &'a T),
    Extra(usize, &'a T),
}

/// Pair items: reference order first (missing ones in place), then
/// candidate-only items in candidate order.
fn align<'a, T>(
    reference: &'a [T],
    candidate: &'a [T],
    mut counterpart: impl FnMut(usize, &T, &[bool]) -> Option<usize>,
) -> Vec<Pairing<'a, T>> {
    let mut used = vec![false; candidate.len()];
    let mut pairs = Vec::with_capacity(reference.len().max(candidate.len()));

    for (i, r) in reference.iter().enumerate() {
        match counterpart(i, r, &used) {
            Some(j) => {
                used[j] = true;
                pairs.push(Pairing::Both(i, r, &candidate[j]));
            }
            None => pairs.push(Pairing::Missing(i, r)),
        }
    }
    for (j, c) in candidate.iter().enumerate() {
        if !used[j] {
            pairs.push(Pairing::Extra(j, c));
        }
    }
    pairs
}

fn align_properties<'a>(
    reference: &'a [Property],
    candidate: &'a [Property],
    alignment: Alignment,
) -> Vec<Pairing<'a, Property>> {
    align(reference, candidate, |i, r, used| match alignment {
        Alignment::ByPosition => (i < candidate.len()).then_some(i),
        Alignment::ByName if r.name.is_empty() => {
            (i < candidate.len() && !used[i] && candidate[i].name.is_empty()).then_some(i)
        }
        Alignment::ByName => {
            (0..candidate.len()).find(|&j| !used[j] && candidate[j].name == r.name)
        }
    })
}

/// Same-named functions pair up in declaration order, so the n-th overload
/// meets the n-th overload.
fn align_functions<'a>(
    reference: &'a [Function],
    candidate: &'a [Function],
) -> Vec<Pairing<'a, Function>> {
    align(reference, candidate, |_, r, used| {
        (0..candidate.len()).find(|&j| !used[j] && candidate[j].name == r.name)
    })
}

fn align_call_signatures<'a>(
    reference: &'a [Function],
    candidate: &'a [Function],
) -> Vec<Pairing<'a, Function>> {
    align(reference, candidate, |i, _, _| (i < candidate.len()).then_some(i))
}

// ── Construct comparison ────────────────────────────────────────────

#[instrument(level = "debug", skip_all, fields(template = %reference.name))]
pub fn compare_functions(
    reference: &Function,
    candidate: &Function,
    options: &CompareOptions,
) -> ResultComparison {
    let mut result = ResultComparison::new(&reference.name);
    diff_functions(reference, candidate, &[], options, &mut result.differences);
    debug!(differences = result.differences.len(), "compared function");
    result
}

#[instrument(level = "debug", skip_all, fields(template = %reference.name))]
pub fn compare_interfaces(
    reference: &Interface,
    candidate: &Interface,
    options: &CompareOptions,
) -> ResultComparison {
    let mut result = ResultComparison::new(&reference.name);
    let out = &mut result.differences;
    diff_properties(&reference.properties, &candidate.properties, &[], out);
    diff_methods(&reference.methods, &candidate.methods, &[], options, out);
    diff_call_signatures(&reference.call_signatures, &candidate.call_signatures, options, out);
    debug!(differences = result.differences.len(), "compared interface");
    result
}

#[instrument(level = "debug", skip_all, fields(template = %reference.name))]
pub fn compare_classes(
    reference: &Class,
    candidate: &Class,
    options: &CompareOptions,
) -> ResultComparison {
    let mut result = ResultComparison::new(&reference.name);
    let out = &mut result.differences;

    match (&reference.constructor, &candidate.constructor) {
        (Some(r), Some(c)) => diff_functions(r, c, &[r.name.clone()], options, out),
        (Some(r), None) => out.push(Difference::template(
            vec![r.name.clone()],
            "constructor missing".to_string(),
        )),
        (None, Some(c)) => out.push(Difference::template(
            vec![c.name.clone()],
            "unexpected constructor".to_string(),
        )),
        (None, None) => {}
    }
    diff_methods(&reference.methods, &candidate.methods, &[], options, out);
    diff_properties(&reference.properties, &candidate.properties, &[], out);

    debug!(differences = result.differences.len(), "compared class");
    result
}

/// Compare two constructs that share a name. Different kinds (a function
/// against an interface, say) are a single template difference.
pub fn compare_constructs(
    reference: Construct<'_>,
    candidate: Construct<'_>,
    options: &CompareOptions,
) -> ResultComparison {
    match (reference, candidate) {
        (Construct::Function(r), Construct::Function(c)) => compare_functions(r, c, options),
        (Construct::Interface(r), Construct::Interface(c)) => compare_interfaces(r, c, options),
        (Construct::Class(r), Construct::Class(c)) => compare_classes(r, c, options),
        (r, c) => {
            let mut result = ResultComparison::new(r.name());
            result.push(Difference::template(
                Vec::new(),
                format!("declared as a {}, expected a {}", c.kind(), r.kind()),
            ));
            result
        }
    }
}

fn child_path(path: &[String], name: &str) -> Vec<String> {
    let mut child = path.to_vec();
    child.push(name.to_string());
    child
}

fn diff_functions(
    reference: &Function,
    candidate: &Function,
    path: &[String],
    options: &CompareOptions,
    out: &mut Vec<Difference>,
) {
    if canonical_return_type(&reference.return_type)
        != canonical_return_type(&candidate.return_type)
    {
        out.push(Difference::template(
            path.to_vec(),
            format!(
                "return type \"{}\" differs from expected \"{}\"",
                candidate.return_type, reference.return_type
            ),
        ));
    }

    let label = |i: usize, p: &Property| {
        if p.name.is_empty() {
            child_path(path, &format!("[{}]", i))
        } else {
            child_path(path, &p.name)
        }
    };
    let pairs = align_properties(&reference.parameters, &candidate.parameters, options.alignment);
    for pairing in pairs {
        match pairing {
            Pairing::Both(i, r, c) => diff_property(r, c, label(i, r), out),
            Pairing::Missing(i, r) => {
                out.push(Difference::missing(label(i, r), effective_type_text(r)))
            }
            Pairing::Extra(j, c) => {
                out.push(Difference::extra(label(j, c), effective_type_text(c)))
            }
        }
    }
}

fn diff_properties(
    reference: &[Property],
    candidate: &[Property],
    path: &[String],
    out: &mut Vec<Difference>,
) {
    for pairing in align_properties(reference, candidate, Alignment::ByName) {
        match pairing {
            Pairing::Both(_, r, c) => diff_property(r, c, child_path(path, &r.name), out),
            Pairing::Missing(_, r) => {
                out.push(Difference::missing(child_path(path, &r.name), effective_type_text(r)))
            }
            Pairing::Extra(_, c) => {
                out.push(Difference::extra(child_path(path, &c.name), effective_type_text(c)))
            }
        }
    }
}

fn diff_methods(
    reference: &[Function],
    candidate: &[Function],
    path: &[String],
    options: &CompareOptions,
    out: &mut Vec<Difference>,
) {
    for pairing in align_functions(reference, candidate) {
        match pairing {
            Pairing::Both(_, r, c) => {
                diff_functions(r, c, &child_path(path, &r.name), options, out)
            }
            Pairing::Missing(_, r) => out.push(Difference::template(
                child_path(path, &r.name),
                format!("method \"{}\" missing", r),
            )),
            Pairing::Extra(_, c) => out.push(Difference::template(
                child_path(path, &c.name),
                format!("unexpected method \"{}\"", c),
            )),
        }
    }
}

fn diff_call_signatures(
    reference: &[Function],
    candidate: &[Function],
    options: &CompareOptions,
    out: &mut Vec<Difference>,
) {
    let path = |i: usize| vec![format!("[{}]", i)];
    for pairing in align_call_signatures(reference, candidate) {
        match pairing {
            Pairing::Both(i, r, c) => diff_functions(r, c, &path(i), options, out),
            Pairing::Missing(i, r) => out.push(Difference::template(
                path(i),
                format!("call signature \"{}\" missing", r),
            )),
            Pairing::Extra(j, c) => out.push(Difference::template(
                path(j),
                format!("unexpected call signature \"{}\"", c),
            )),
        }
    }
}

/// Optional members read as `T | undefined` in messages.
fn effective_type_text(p: &Property) -> String {
    let ty = p.property_type.to_string();
    if p.optional {
        format!("{} | undefined", ty)
    } else {
        ty
    }
}

fn diff_property(
    reference: &Property,
    candidate: &Property,
    path: Vec<String>,
    out: &mut Vec<Difference>,
) {
    let expected = effective_type_text(reference);
    let actual = effective_type_text(candidate);
    match type_relation(&reference.property_type, &candidate.property_type) {
        // `T` and `T | undefined` share every value of `T`.
        TypeRelation::Equivalent if reference.optional != candidate.optional => {
            out.push(Difference::type_overlap(path, expected, actual))
        }
        TypeRelation::Equivalent => {}
        TypeRelation::Overlapping => out.push(Difference::type_overlap(path, expected, actual)),
        TypeRelation::Disjoint => out.push(Difference::type_disjoint(path, expected, actual)),
    }
}

// ── Namespace comparison ────────────────────────────────────────────

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Compare every construct of two namespaces, pairing them by name.
///
/// A construct present on one side only yields a result holding a single
/// template difference. Reference constructs come first in declaration
/// order, then candidate-only constructs.
pub fn compare_namespaces(
    reference: &Namespace,
    candidate: &Namespace,
    options: &CompareOptions,
) -> Vec<ResultComparison> {
    let ref_items: Vec<Construct<'_>> = reference.constructs().collect();
    let cand_items: Vec<Construct<'_>> = candidate.constructs().collect();
    let mut used = vec![false; cand_items.len()];
    let mut results = Vec::with_capacity(ref_items.len());

    for r in &ref_items {
        let find = |same_kind: bool| {
            (0..cand_items.len()).find(|&j| {
                !used[j]
                    && cand_items[j].name() == r.name()
                    && (!same_kind || cand_items[j].kind() == r.kind())
            })
        };
        let mut result = match find(true).or_else(|| find(false)) {
            Some(j) => {
                used[j] = true;
                compare_constructs(*r, cand_items[j], options)
            }
            None => {
                let mut missing = ResultComparison::new(r.name());
                missing.push(Difference::template(
                    Vec::new(),
                    format!("{} \"{}\" has no counterpart in the candidate", r.kind(), r.name()),
                ));
                missing
            }
        };
        result.template = qualify(&reference.name, &result.template);
        results.push(result);
    }

    for (j, c) in cand_items.iter().enumerate() {
        if used[j] {
            continue;
        }
        let mut extra = ResultComparison::new(&qualify(&candidate.name, c.name()));
        extra.push(Difference::template(
            Vec::new(),
            format!("{} \"{}\" has no counterpart in the reference", c.kind(), c.name()),
        ));
        results.push(extra);
    }

    results
}

/// Compare two whole build passes, namespace by namespace.
pub fn compare_declarations(
    reference: &DeclarationMap,
    candidate: &DeclarationMap,
    options: &CompareOptions,
) -> Vec<ResultComparison> {
    let mut results = Vec::new();

    for r in &reference.namespaces {
        match candidate.namespace(&r.name) {
            Some(c) => results.extend(compare_namespaces(r, c, options)),
            None => results.extend(compare_namespaces(r, &Namespace::new(&r.name), options)),
        }
    }
    for c in &candidate.namespaces {
        if reference.namespace(&c.name).is_none() {
            results.extend(compare_namespaces(&Namespace::new(&c.name), c, options));
        }
    }

    debug!(results = results.len(), "compared declaration maps");
    results
}
