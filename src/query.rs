//! Statements, domains and multi-clause queries.
//!
//! Every builder serializes through `Display`; composition with `/` sequences
//! the clauses of a query, one per line:
//!
//! ```
//! use aqlclad::filter::{clause, filter};
//! use aqlclad::query::{ret, select, sort};
//! let q = select("s").in_("students")
//!     / filter(clause("s.age").gt(20))
//!     / sort().asc("s._key")
//!     / ret("s");
//! assert_eq!(q.to_string(), "FOR s IN students\n\tFILTER s.age > 20\n\tSORT s._key ASC\n\tRETURN s");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Div, RangeInclusive};

use serde_json::Value;

use crate::assign::Assignment;
use crate::datatype::{write_quoted, Tagged};
use crate::error::Result;
use crate::filter::{Clause, Condition, Filter, Junction};

/// Anything that can be sent to the server as query text.
///
/// `validate` is checked before the text leaves the process, so predicates
/// with an empty key or value never reach the server as well-formed syntax.
pub trait Aql: fmt::Display {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
    fn to_aql(&self) -> Result<String> {
        self.validate()?;
        Ok(self.to_string())
    }
}

impl Aql for str {}
impl Aql for String {}
impl Aql for Clause {
    fn validate(&self) -> Result<()> {
        Clause::validate(self)
    }
}
impl Aql for Junction {
    fn validate(&self) -> Result<()> {
        Junction::validate(self)
    }
}
impl Aql for Condition {
    fn validate(&self) -> Result<()> {
        Condition::validate(self)
    }
}
impl Aql for Filter {
    fn validate(&self) -> Result<()> {
        Filter::validate(self)
    }
}
impl<T: Aql + ?Sized> Aql for &T {
    fn validate(&self) -> Result<()> {
        (**self).validate()
    }
}

// ------------- Action -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select,
    Insert,
    Update,
    Replace,
    Collect,
    Remove,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Select => "FOR",
            Action::Insert => "INSERT",
            Action::Update => "UPDATE",
            Action::Replace => "REPLACE",
            Action::Collect => "COLLECT",
            Action::Remove => "REMOVE",
        }
    }
    pub fn preposition(&self) -> &'static str {
        match self {
            Action::Insert | Action::Collect => "INTO",
            _ => "IN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Any,
    Inbound,
    Outbound,
}
impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Any => f.write_str("ANY"),
            Direction::Inbound => f.write_str("INBOUND"),
            Direction::Outbound => f.write_str("OUTBOUND"),
        }
    }
}

// ------------- Domain -------------
/// What a statement iterates over or writes into.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    Collection(String),
    Range(i64, i64),
    Literal(Value),
    /// A graph walk starting at `base`. Edges keep their insertion order.
    Traversal {
        base: Box<Domain>,
        edges: Vec<(String, Direction)>,
        depth: Option<(u32, u32)>,
    },
}

impl Domain {
    /// The start of a traversal, or the domain itself.
    pub fn target(&self) -> &Domain {
        match self {
            Domain::Traversal { base, .. } => base.target(),
            other => other,
        }
    }
    pub fn edges(&self) -> &[(String, Direction)] {
        match self {
            Domain::Traversal { edges, .. } => edges,
            _ => &[],
        }
    }
    pub fn depth(&self) -> Option<(u32, u32)> {
        match self {
            Domain::Traversal { depth, .. } => *depth,
            _ => None,
        }
    }
    fn into_traversal(self) -> Domain {
        match self {
            traversal @ Domain::Traversal { .. } => traversal,
            base => Domain::Traversal {
                base: Box::new(base),
                edges: Vec::new(),
                depth: None,
            },
        }
    }
    /// Adds an edge collection; naming an edge twice replaces its direction in place.
    pub fn edge(self, name: impl Into<String>, direction: Direction) -> Domain {
        let name = name.into();
        match self.into_traversal() {
            Domain::Traversal { base, mut edges, depth } => {
                match edges.iter_mut().find(|(existing, _)| *existing == name) {
                    Some(edge) => edge.1 = direction,
                    None => edges.push((name, direction)),
                }
                Domain::Traversal { base, edges, depth }
            }
            other => other,
        }
    }
    pub fn with_depth(self, min: u32, max: u32) -> Domain {
        match self.into_traversal() {
            Domain::Traversal { base, edges, .. } => Domain::Traversal {
                base,
                edges,
                depth: Some((min, max)),
            },
            other => other,
        }
    }
    /// `N` for a fixed depth, `N..M` for a range, nothing when unset or not positive.
    pub fn depth_token(&self) -> String {
        match self.depth() {
            Some((min, max)) if min == max && min > 0 => min.to_string(),
            Some((min, max)) if min > 0 && max > 0 => format!("{}..{}", min, max),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Domain::Collection(name) => f.write_str(name),
            Domain::Range(from, to) => write!(f, "{}..{}", from, to),
            Domain::Literal(value) => write!(f, "{}", value),
            Domain::Traversal { base, .. } => write!(f, "{}", base),
        }
    }
}

impl From<&str> for Domain {
    fn from(name: &str) -> Self {
        Domain::Collection(name.to_owned())
    }
}
impl From<String> for Domain {
    fn from(name: String) -> Self {
        Domain::Collection(name)
    }
}
impl From<(i64, i64)> for Domain {
    fn from((from, to): (i64, i64)) -> Self {
        Domain::Range(from, to)
    }
}
impl From<RangeInclusive<i64>> for Domain {
    fn from(range: RangeInclusive<i64>) -> Self {
        Domain::Range(*range.start(), *range.end())
    }
}
impl From<Value> for Domain {
    fn from(value: Value) -> Self {
        Domain::Literal(value)
    }
}

// ------------- Element -------------
/// The subject of a statement: a variable, a range, a literal or a document patch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Element {
    #[default]
    Empty,
    Name(String),
    Range(i64, i64),
    Literal(Value),
    Document(Assignment),
}

impl Element {
    pub fn is_empty(&self) -> bool {
        match self {
            Element::Empty => true,
            Element::Name(name) => name.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Element::Empty => Ok(()),
            Element::Name(name) => f.write_str(name),
            Element::Range(from, to) => write!(f, "{}..{}", from, to),
            Element::Literal(value) => write!(f, "{}", value),
            Element::Document(assignment) => write!(f, "{}", assignment),
        }
    }
}

impl From<&str> for Element {
    fn from(name: &str) -> Self {
        Element::Name(name.to_owned())
    }
}
impl From<String> for Element {
    fn from(name: String) -> Self {
        Element::Name(name)
    }
}
impl From<(i64, i64)> for Element {
    fn from((from, to): (i64, i64)) -> Self {
        Element::Range(from, to)
    }
}
impl From<RangeInclusive<i64>> for Element {
    fn from(range: RangeInclusive<i64>) -> Self {
        Element::Range(*range.start(), *range.end())
    }
}
impl From<Value> for Element {
    fn from(value: Value) -> Self {
        Element::Literal(value)
    }
}
impl From<Assignment> for Element {
    fn from(assignment: Assignment) -> Self {
        Element::Document(assignment)
    }
}

// ------------- Payload -------------
/// A With/Options value. Strings are emitted bare since they name
/// variables or keywords (`COLLECT WITH COUNT INTO n`).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Value(Tagged),
    Document(Assignment),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Payload::Value(value) => f.write_str(&value.bare()),
            Payload::Document(assignment) => write!(f, "{}", assignment),
        }
    }
}

impl From<Assignment> for Payload {
    fn from(assignment: Assignment) -> Self {
        Payload::Document(assignment)
    }
}
impl From<Tagged> for Payload {
    fn from(value: Tagged) -> Self {
        Payload::Value(value)
    }
}
macro_rules! payload_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Payload {
                fn from(value: $t) -> Self {
                    Payload::Value(Tagged::from(value))
                }
            }
        )*
    };
}
payload_from!(&str, String, bool, i32, i64, u32, u64, f64, Value);

// ------------- Statement -------------
/// An action and its element, waiting for a domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    action: Action,
    element: Element,
    with: Option<Payload>,
}

fn primary(action: Action, element: impl Into<Element>) -> Pending {
    Pending {
        action,
        element: element.into(),
        with: None,
    }
}

/// `FOR element IN domain`
pub fn select(element: impl Into<Element>) -> Pending {
    primary(Action::Select, element)
}
pub fn insert(element: impl Into<Element>) -> Pending {
    primary(Action::Insert, element)
}
pub fn update(element: impl Into<Element>) -> Pending {
    primary(Action::Update, element)
}
pub fn replace(element: impl Into<Element>) -> Pending {
    primary(Action::Replace, element)
}
pub fn collect(element: impl Into<Element>) -> Pending {
    primary(Action::Collect, element)
}
/// `COLLECT` without a grouping element, e.g. `COLLECT WITH COUNT INTO n`.
pub fn collect_all() -> Pending {
    primary(Action::Collect, Element::Empty)
}
pub fn remove(element: impl Into<Element>) -> Pending {
    primary(Action::Remove, element)
}

impl Pending {
    pub fn with(mut self, with: impl Into<Payload>) -> Self {
        self.with = Some(with.into());
        self
    }
    pub fn in_(self, domain: impl Into<Domain>) -> Statement {
        Statement {
            action: self.action,
            element: self.element,
            domain: domain.into(),
            with: self.with,
            options: None,
        }
    }
    pub fn in_range(self, from: i64, to: i64) -> Statement {
        self.in_(Domain::Range(from, to))
    }
}

/// One action clause of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    action: Action,
    element: Element,
    domain: Domain,
    with: Option<Payload>,
    options: Option<Payload>,
}

impl Statement {
    pub fn action(&self) -> Action {
        self.action
    }
    pub fn element(&self) -> &Element {
        &self.element
    }
    pub fn domain(&self) -> &Domain {
        &self.domain
    }
    pub fn with_payload(&self) -> Option<&Payload> {
        self.with.as_ref()
    }
    pub fn options_payload(&self) -> Option<&Payload> {
        self.options.as_ref()
    }
    fn edge(mut self, name: impl Into<String>, direction: Direction) -> Self {
        self.domain = self.domain.edge(name, direction);
        self
    }
    pub fn outbound(self, name: impl Into<String>) -> Self {
        self.edge(name, Direction::Outbound)
    }
    pub fn inbound(self, name: impl Into<String>) -> Self {
        self.edge(name, Direction::Inbound)
    }
    pub fn any(self, name: impl Into<String>) -> Self {
        self.edge(name, Direction::Any)
    }
    pub fn depth(self, depth: u32) -> Self {
        self.depth_range(depth, depth)
    }
    pub fn depth_range(mut self, min: u32, max: u32) -> Self {
        self.domain = self.domain.with_depth(min, max);
        self
    }
    pub fn options(mut self, options: impl Into<Payload>) -> Self {
        self.options = Some(options.into());
        self
    }

    fn push_head(&self, tokens: &mut Vec<String>) {
        tokens.push(self.action.label().to_owned());
        if !self.element.is_empty() {
            tokens.push(self.element.to_string());
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut tokens = Vec::new();
        let edges = self.domain.edges();
        if edges.is_empty() {
            self.push_head(&mut tokens);
            if let Some(with) = &self.with {
                tokens.push(format!("WITH {}", with));
            }
            tokens.push(self.action.preposition().to_owned());
            tokens.push(self.domain.to_string());
        } else {
            // in a traversal the WITH clause names collections and leads the statement
            if let Some(with) = &self.with {
                tokens.push(format!("WITH {}", with));
            }
            self.push_head(&mut tokens);
            tokens.push(self.action.preposition().to_owned());
            let depth = self.domain.depth_token();
            if !depth.is_empty() {
                tokens.push(depth);
            }
            tokens.push("ANY".to_owned());
            let target = self.domain.target().to_string();
            if target.contains('/') {
                tokens.push(Tagged::text(target).to_string());
            } else {
                tokens.push(target);
            }
            let edges = edges
                .iter()
                .map(|(name, direction)| format!("{} {}", direction, name))
                .collect::<Vec<_>>()
                .join(", ");
            tokens.push(edges);
        }
        if let Some(options) = &self.options {
            tokens.push(format!("OPTIONS {}", options));
        }
        f.write_str(&tokens.join(" "))
    }
}

impl Aql for Statement {}

// ------------- Let -------------
#[derive(Debug, Clone, PartialEq)]
pub enum LetValue {
    /// A sub query, emitted in parentheses.
    Query(Box<Query>),
    /// A string literal, emitted in quotes.
    Text(String),
    /// A bare expression such as `DATE_NOW()`.
    Bare(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    name: String,
    value: LetValue,
}

pub struct LetBinding {
    name: String,
}

pub fn let_(name: impl Into<String>) -> LetBinding {
    LetBinding { name: name.into() }
}

impl LetBinding {
    pub fn be(self, query: impl Into<Query>) -> Let {
        Let {
            name: self.name,
            value: LetValue::Query(Box::new(query.into())),
        }
    }
    pub fn text(self, text: impl Into<String>) -> Let {
        Let {
            name: self.name,
            value: LetValue::Text(text.into()),
        }
    }
    pub fn bare(self, expression: impl Into<String>) -> Let {
        Let {
            name: self.name,
            value: LetValue::Bare(expression.into()),
        }
    }
}

impl Let {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn value(&self) -> &LetValue {
        &self.value
    }
}

impl fmt::Display for Let {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.value {
            LetValue::Query(query) => write!(f, "LET {} = ({})", self.name, query),
            LetValue::Text(text) => {
                write!(f, "LET {} = ", self.name)?;
                write_quoted(f, text)
            }
            LetValue::Bare(expression) => write!(f, "LET {} = {}", self.name, expression),
        }
    }
}

// ------------- Return -------------
#[derive(Debug, Clone, PartialEq)]
pub enum Return {
    Expr(String),
    Document(Assignment),
    /// Key/value pairs whose values are expressions.
    Object(Vec<(String, String)>),
}

pub fn ret(value: impl Into<Return>) -> Return {
    value.into()
}

impl Return {
    pub fn object<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Return
    where
        K: Into<String>,
        V: Into<String>,
    {
        Return::Object(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Return::Expr(expression) => write!(f, "RETURN {}", expression),
            Return::Document(assignment) => write!(f, "RETURN {}", assignment),
            Return::Object(pairs) => {
                f.write_str("RETURN {")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Return {
    fn from(expression: &str) -> Self {
        Return::Expr(expression.to_owned())
    }
}
impl From<String> for Return {
    fn from(expression: String) -> Self {
        Return::Expr(expression)
    }
}
impl From<Assignment> for Return {
    fn from(assignment: Assignment) -> Self {
        Return::Document(assignment)
    }
}
impl<V: Into<String>> From<BTreeMap<String, V>> for Return {
    fn from(map: BTreeMap<String, V>) -> Self {
        Return::object(map)
    }
}

// ------------- Upsert -------------
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert {
    search: Payload,
    insert: Payload,
    update: Payload,
    collection: String,
}

pub struct UpsertSearch {
    search: Payload,
}
pub struct UpsertInsert {
    search: Payload,
    insert: Payload,
}
pub struct UpsertUpdate {
    search: Payload,
    insert: Payload,
    update: Payload,
}

/// `UPSERT search INSERT document UPDATE patch IN collection`
pub fn upsert(search: impl Into<Payload>) -> UpsertSearch {
    UpsertSearch { search: search.into() }
}

impl UpsertSearch {
    pub fn insert(self, document: impl Into<Payload>) -> UpsertInsert {
        UpsertInsert {
            search: self.search,
            insert: document.into(),
        }
    }
}
impl UpsertInsert {
    pub fn update(self, patch: impl Into<Payload>) -> UpsertUpdate {
        UpsertUpdate {
            search: self.search,
            insert: self.insert,
            update: patch.into(),
        }
    }
}
impl UpsertUpdate {
    pub fn in_(self, collection: impl Into<String>) -> Upsert {
        Upsert {
            search: self.search,
            insert: self.insert,
            update: self.update,
            collection: collection.into(),
        }
    }
}

impl fmt::Display for Upsert {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "UPSERT {} INSERT {} UPDATE {} IN {}",
            self.search, self.insert, self.update, self.collection
        )
    }
}

// ------------- Options -------------
#[derive(Debug, Clone, PartialEq)]
pub struct Options(Payload);

pub fn options(store: impl Into<Payload>) -> Options {
    Options(store.into())
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OPTIONS {}", self.0)
    }
}

// ------------- Sort -------------
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sort {
    fields: Vec<(String, bool)>, // true is ASC, false is DESC
}

pub fn sort() -> Sort {
    Sort::default()
}

impl Sort {
    pub fn asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), true));
        self
    }
    pub fn desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), false));
        self
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("SORT")?;
        for (i, (field, ascending)) in self.fields.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            let order = if *ascending { "ASC" } else { "DESC" };
            write!(f, "{}{} {}", separator, field, order)?;
        }
        Ok(())
    }
}

// ------------- Query -------------
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Statement(Statement),
    Filter(Filter),
    Sort(Sort),
    Let(Let),
    Return(Return),
    Upsert(Upsert),
    Options(Options),
}

impl Part {
    fn validate(&self) -> Result<()> {
        match self {
            Part::Filter(filter) => filter.validate(),
            Part::Let(Let {
                value: LetValue::Query(query),
                ..
            }) => query.validate(),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Part::Statement(p) => write!(f, "{}", p),
            Part::Filter(p) => write!(f, "{}", p),
            Part::Sort(p) => write!(f, "{}", p),
            Part::Let(p) => write!(f, "{}", p),
            Part::Return(p) => write!(f, "{}", p),
            Part::Upsert(p) => write!(f, "{}", p),
            Part::Options(p) => write!(f, "{}", p),
        }
    }
}

/// A sequence of clauses, rendered one per line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    parts: Vec<Part>,
}

impl Query {
    pub const SEPARATOR: &'static str = "\n\t";

    pub fn new() -> Self {
        Self::default()
    }
    pub fn then(mut self, next: impl Into<Query>) -> Self {
        self.parts.extend(next.into().parts);
        self
    }
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
    pub fn len(&self) -> usize {
        self.parts.len()
    }
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(Self::SEPARATOR)?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl Aql for Query {
    fn validate(&self) -> Result<()> {
        self.parts.iter().try_for_each(Part::validate)
    }
}

impl<R: Into<Query>> Div<R> for Query {
    type Output = Query;
    fn div(self, next: R) -> Query {
        self.then(next)
    }
}

macro_rules! query_parts {
    ($($t:ident),*) => {
        $(
            impl From<$t> for Part {
                fn from(part: $t) -> Self {
                    Part::$t(part)
                }
            }
            impl From<$t> for Query {
                fn from(part: $t) -> Self {
                    Query { parts: vec![Part::$t(part)] }
                }
            }
            impl<R: Into<Query>> Div<R> for $t {
                type Output = Query;
                fn div(self, next: R) -> Query {
                    Query::from(self).then(next)
                }
            }
        )*
    };
}
query_parts!(Statement, Filter, Sort, Let, Return, Upsert, Options);

impl From<Part> for Query {
    fn from(part: Part) -> Self {
        Query { parts: vec![part] }
    }
}
