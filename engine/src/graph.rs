//! Triple graph model.
//!
//! A [`Graph`] is an ordered set of [`Triple`]s. Ordering is total and derived
//! from the terms themselves, so iteration (and every rendering built on it)
//! is byte-stable for equal graphs regardless of insertion order.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// An absolute or package-relative IRI.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(String);

impl Iri {
    /// Wraps an IRI string without validation.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

/// A subject or node-valued object: a named resource or a labelled blank node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// A named resource.
    Iri(Iri),
    /// An unnamed node, identified only within one graph by its label.
    Blank(String),
}

impl Node {
    /// Returns the IRI if this node is named.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Node::Iri(iri) => Some(iri),
            Node::Blank(_) => None,
        }
    }

    /// Returns true for blank nodes.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(label) => write!(f, "_:{label}"),
        }
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Node::Iri(iri)
    }
}

impl From<&Iri> for Node {
    fn from(iri: &Iri) -> Self {
        Node::Iri(iri.clone())
    }
}

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

/// Language or datatype annotation of a literal. The two are exclusive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LiteralTag {
    /// A simple literal.
    Plain,
    /// A language-tagged string (e.g., `en`).
    Language(String),
    /// A typed literal.
    Datatype(Iri),
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    value: String,
    tag: LiteralTag,
}

impl Literal {
    /// A simple literal.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: LiteralTag::Plain,
        }
    }

    /// A language-tagged string.
    pub fn lang(value: impl Into<String>, language: &str) -> Self {
        Self {
            value: value.into(),
            tag: LiteralTag::Language(language.to_owned()),
        }
    }

    /// A literal typed with the given datatype IRI.
    pub fn typed(value: impl Into<String>, datatype: &str) -> Self {
        Self {
            value: value.into(),
            tag: LiteralTag::Datatype(Iri::new(datatype)),
        }
    }

    /// Returns the lexical value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the annotation.
    #[must_use]
    pub fn tag(&self) -> &LiteralTag {
        &self.tag
    }

    /// Returns the language tag, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match &self.tag {
            LiteralTag::Language(lang) => Some(lang),
            _ => None,
        }
    }

    /// Returns the datatype IRI, if any.
    #[must_use]
    pub fn datatype(&self) -> Option<&Iri> {
        match &self.tag {
            LiteralTag::Datatype(dt) => Some(dt),
            _ => None,
        }
    }
}

/// The object position of a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// A node-valued object.
    Node(Node),
    /// A literal-valued object.
    Literal(Literal),
}

impl Term {
    /// Returns the node if this term is one.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Term::Node(node) => Some(node),
            Term::Literal(_) => None,
        }
    }

    /// Returns the literal if this term is one.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            Term::Node(_) => None,
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Term::Node(node)
    }
}

impl From<&Node> for Term {
    fn from(node: &Node) -> Self {
        Term::Node(node.clone())
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Node(Node::Iri(iri))
    }
}

impl From<&Iri> for Term {
    fn from(iri: &Iri) -> Self {
        Term::Node(Node::Iri(iri.clone()))
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// A subject–predicate–object statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    /// Subject.
    pub subject: Node,
    /// Predicate.
    pub predicate: Iri,
    /// Object.
    pub object: Term,
}

impl Triple {
    /// Builds a triple.
    pub fn new(subject: impl Into<Node>, predicate: &str, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: Iri::new(predicate),
            object: object.into(),
        }
    }

    fn lower_bound(subject: &Node) -> Self {
        Self {
            subject: subject.clone(),
            predicate: Iri(String::new()),
            object: Term::Node(Node::Iri(Iri(String::new()))),
        }
    }
}

/// An ordered set of triples with wildcard pattern lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    triples: BTreeSet<Triple>,
    blank_ordinals: BTreeMap<String, usize>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a triple; returns false if it was already present.
    pub fn add(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Builds and inserts a triple; returns false if it was already present.
    pub fn insert(
        &mut self,
        subject: impl Into<Node>,
        predicate: &str,
        object: impl Into<Term>,
    ) -> bool {
        self.add(Triple::new(subject, predicate, object))
    }

    /// Returns true if the exact triple is present.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Returns true if the statement `(subject, predicate, object)` is present.
    pub fn holds(
        &self,
        subject: impl Into<Node>,
        predicate: &str,
        object: impl Into<Term>,
    ) -> bool {
        self.contains(&Triple::new(subject, predicate, object))
    }

    /// Returns true if any triple has `subject` as its subject.
    #[must_use]
    pub fn has_subject(&self, subject: &Node) -> bool {
        self.about(subject).next().is_some()
    }

    /// Iterates over all triples whose subject is `subject`, in order.
    pub fn about<'a>(&'a self, subject: &'a Node) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples
            .range(Triple::lower_bound(subject)..)
            .take_while(move |t| &t.subject == subject)
    }

    /// Iterates over triples matching a pattern; `None` is a wildcard.
    pub fn triples<'a>(
        &'a self,
        subject: Option<&'a Node>,
        predicate: Option<&'a str>,
        object: Option<&'a Term>,
    ) -> Box<dyn Iterator<Item = &'a Triple> + 'a> {
        let rest = move |t: &&Triple| {
            predicate.map_or(true, |p| t.predicate.as_str() == p)
                && object.map_or(true, |o| &t.object == o)
        };
        match subject {
            Some(s) => Box::new(self.about(s).filter(rest)),
            None => Box::new(self.triples.iter().filter(rest)),
        }
    }

    /// Iterates over the objects of `(subject, predicate, *)`.
    pub fn objects<'a>(
        &'a self,
        subject: &'a Node,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.about(subject)
            .filter(move |t| t.predicate.as_str() == predicate)
            .map(|t| &t.object)
    }

    /// Returns the distinct subjects in order.
    #[must_use]
    pub fn subjects(&self) -> Vec<&Node> {
        let mut out: Vec<&Node> = Vec::new();
        for triple in &self.triples {
            if out.last() != Some(&&triple.subject) {
                out.push(&triple.subject);
            }
        }
        out
    }

    /// Mints a new blank node labelled after its owner.
    ///
    /// Labels are `<hint>_<n>` with `n` counting per hint from 1, so they only
    /// depend on what the owner creates, not on unrelated graph content.
    pub fn fresh_blank(&mut self, hint: &str) -> Node {
        let hint: String = hint
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let ordinal = self.blank_ordinals.entry(hint.clone()).or_insert(0);
        *ordinal += 1;
        Node::Blank(format!("{hint}_{ordinal}"))
    }

    /// Iterates over all triples in order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Number of triples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph holds no triples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
