//! [In-memory implementation](Graph) of [RDF graphs](https://www.w3.org/TR/rdf11-concepts/#dfn-graph).
//!
//! Usage example:
//! ```
//! use oxmem::*;
//!
//! let mut graph = Graph::default();
//!
//! // insertion
//! let ex = NamedNodeRef::new("http://example.com")?;
//! let triple = TripleRef::new(ex, ex, ex);
//! graph.insert(triple);
//!
//! // simple filter
//! let results: Vec<_> = graph.triples_matching(Some(ex.into()), None, None).collect();
//! assert_eq!(vec![triple.into_owned()], results);
//! # Result::<_,Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::named_node::NamedNodeRef;
use crate::term::{Subject, SubjectRef, Term, TermRef, Triple, TripleRef};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::fmt;

/// An in-memory [RDF graph](https://www.w3.org/TR/rdf11-concepts/#dfn-graph):
/// a set of [`Triple`]s (duplicates collapse) with multi-way indexed lookup.
///
/// Terms are interned once and the triple set is kept in three key orders
/// (SPO, POS and OSP), so [`Graph::triples_matching`] can answer any
/// combination of bound subject/predicate/object in time proportional to the
/// matching subset rather than the whole graph.
///
/// The graph is a single-writer structure: every mutation takes `&mut self`,
/// so the borrow checker already serializes writers against readers.
/// Beware: it interns the terms and does not do any garbage collection yet:
/// if you insert and remove a lot of different terms, memory will grow without any reduction.
///
/// Usage example:
/// ```
/// use oxmem::*;
///
/// let mut graph = Graph::default();
///
/// // insertion
/// let ex = NamedNodeRef::new("http://example.com")?;
/// let triple = TripleRef::new(ex, ex, ex);
/// graph.insert(triple);
///
/// // simple filter
/// let results: Vec<_> = graph.triples_matching(Some(ex.into()), None, None).collect();
/// assert_eq!(vec![triple.into_owned()], results);
/// # Result::<_,Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
pub struct Graph {
    interner: Interner,
    spo: BTreeSet<(usize, usize, usize)>,
    pos: BTreeSet<(usize, usize, usize)>,
    osp: BTreeSet<(usize, usize, usize)>,
}

impl Graph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all the triples contained by the graph.
    pub fn iter(&self) -> impl Iterator<Item = Triple> + '_ {
        self.spo.iter().map(|&key| self.decode_triple(key))
    }

    /// Checks if the graph contains the given triple.
    pub fn contains<'a>(&self, triple: impl Into<TripleRef<'a>>) -> bool {
        let triple = triple.into();
        let Some(key) = self.encode_triple(triple) else {
            return false;
        };
        self.spo.contains(&key)
    }

    /// Returns the number of triples in this graph.
    pub fn len(&self) -> usize {
        self.spo.len()
    }

    /// Checks if this graph contains a triple.
    pub fn is_empty(&self) -> bool {
        self.spo.is_empty()
    }

    /// Adds a triple to the graph.
    ///
    /// Returns `true` if the triple was not already present.
    pub fn insert<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> bool {
        let triple = triple.into();
        let s = self
            .interner
            .get_or_intern(TermRef::from(triple.subject).into_owned());
        let p = self
            .interner
            .get_or_intern(TermRef::from(triple.predicate).into_owned());
        let o = self.interner.get_or_intern(triple.object.into_owned());
        let new_spo = self.spo.insert((s, p, o));
        let new_pos = self.pos.insert((p, o, s));
        let new_osp = self.osp.insert((o, s, p));
        // The three indexes must hold exactly the same triple set. A divergence
        // is an internal corruption, not a condition a caller can recover from.
        assert!(
            new_spo == new_pos && new_pos == new_osp,
            "triple store indexes diverged during insert"
        );
        new_spo
    }

    /// Removes a concrete triple from the graph.
    ///
    /// Returns `true` if the triple was present.
    pub fn remove<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> bool {
        let triple = triple.into();
        let Some((s, p, o)) = self.encode_triple(triple) else {
            return false;
        };
        let was_spo = self.spo.remove(&(s, p, o));
        let was_pos = self.pos.remove(&(p, o, s));
        let was_osp = self.osp.remove(&(o, s, p));
        assert!(
            was_spo == was_pos && was_pos == was_osp,
            "triple store indexes diverged during remove"
        );
        was_spo
    }

    /// Clears the graph.
    pub fn clear(&mut self) {
        self.spo.clear();
        self.pos.clear();
        self.osp.clear();
        self.interner = Interner::default();
    }

    /// Returns every triple whose bound fields are equal to the given terms.
    ///
    /// Unbound (`None`) fields match anything. Each of the eight combinations
    /// routes to the index whose leading key(s) are bound, so the cost is
    /// proportional to the number of matching triples.
    ///
    /// ```
    /// use oxmem::vocab::rdf;
    /// use oxmem::*;
    ///
    /// let ex = NamedNodeRef::new("http://example.com")?;
    /// let mut graph = Graph::new();
    /// graph.insert(TripleRef::new(ex, rdf::TYPE, ex));
    ///
    /// let with_predicate: Vec<_> = graph
    ///     .triples_matching(None, Some(rdf::TYPE), None)
    ///     .collect();
    /// assert_eq!(with_predicate.len(), 1);
    /// # Result::<_,Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn triples_matching<'a>(
        &'a self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> impl Iterator<Item = Triple> + 'a {
        let keys = self
            .encode_pattern(subject, predicate, object)
            .map(|(s, p, o)| self.matching_keys(s, p, o))
            .unwrap_or_default();
        keys.into_iter().map(move |key| self.decode_triple(key))
    }

    /// Encodes the bound pattern fields, or `None` if some bound term
    /// is not interned (then nothing can match).
    fn encode_pattern(
        &self,
        subject: Option<SubjectRef<'_>>,
        predicate: Option<NamedNodeRef<'_>>,
        object: Option<TermRef<'_>>,
    ) -> Option<(Option<usize>, Option<usize>, Option<usize>)> {
        let s = match subject {
            Some(subject) => Some(self.interner.get(TermRef::from(subject))?),
            None => None,
        };
        let p = match predicate {
            Some(predicate) => Some(self.interner.get(TermRef::from(predicate))?),
            None => None,
        };
        let o = match object {
            Some(object) => Some(self.interner.get(object)?),
            None => None,
        };
        Some((s, p, o))
    }

    /// Collects the matching keys in (s, p, o) order from the best index.
    fn matching_keys(
        &self,
        s: Option<usize>,
        p: Option<usize>,
        o: Option<usize>,
    ) -> Vec<(usize, usize, usize)> {
        const MAX: usize = usize::MAX;
        match (s, p, o) {
            (Some(s), Some(p), Some(o)) => {
                if self.spo.contains(&(s, p, o)) {
                    vec![(s, p, o)]
                } else {
                    Vec::new()
                }
            }
            (Some(s), Some(p), None) => self
                .spo
                .range((s, p, 0)..=(s, p, MAX))
                .copied()
                .collect(),
            (Some(s), None, None) => self
                .spo
                .range((s, 0, 0)..=(s, MAX, MAX))
                .copied()
                .collect(),
            (Some(s), None, Some(o)) => self
                .osp
                .range((o, s, 0)..=(o, s, MAX))
                .map(|&(o, s, p)| (s, p, o))
                .collect(),
            (None, Some(p), Some(o)) => self
                .pos
                .range((p, o, 0)..=(p, o, MAX))
                .map(|&(p, o, s)| (s, p, o))
                .collect(),
            (None, Some(p), None) => self
                .pos
                .range((p, 0, 0)..=(p, MAX, MAX))
                .map(|&(p, o, s)| (s, p, o))
                .collect(),
            (None, None, Some(o)) => self
                .osp
                .range((o, 0, 0)..=(o, MAX, MAX))
                .map(|&(o, s, p)| (s, p, o))
                .collect(),
            (None, None, None) => self.spo.iter().copied().collect(),
        }
    }

    fn encode_triple(&self, triple: TripleRef<'_>) -> Option<(usize, usize, usize)> {
        Some((
            self.interner.get(TermRef::from(triple.subject))?,
            self.interner.get(TermRef::from(triple.predicate))?,
            self.interner.get(triple.object)?,
        ))
    }

    fn decode_triple(&self, (s, p, o): (usize, usize, usize)) -> Triple {
        let subject = match self.interner.resolve(s) {
            Term::NamedNode(node) => Subject::NamedNode(node.clone()),
            Term::BlankNode(node) => Subject::BlankNode(node.clone()),
            Term::Literal(_) => unreachable!("corrupted index: literal in subject position"),
        };
        let predicate = match self.interner.resolve(p) {
            Term::NamedNode(node) => node.clone(),
            Term::BlankNode(_) | Term::Literal(_) => {
                unreachable!("corrupted index: non-IRI in predicate position")
            }
        };
        Triple {
            subject,
            predicate,
            object: self.interner.resolve(o).clone(),
        }
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t.as_ref()))
    }
}

impl Eq for Graph {}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut g = Self::new();
        g.extend(iter);
        g
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for t in iter {
            self.insert(t.as_ref());
        }
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for t in self.iter() {
            writeln!(f, "{t} .")?;
        }
        Ok(())
    }
}

/// Maps each distinct [`Term`] to a dense id usable as a `BTreeSet` key.
#[derive(Debug, Default, Clone)]
struct Interner {
    terms: Vec<Term>,
    ids: FxHashMap<Term, usize>,
}

impl Interner {
    fn get_or_intern(&mut self, term: Term) -> usize {
        if let Some(&id) = self.ids.get(&term) {
            return id;
        }
        let id = self.terms.len();
        self.terms.push(term.clone());
        self.ids.insert(term, id);
        id
    }

    fn get(&self, term: TermRef<'_>) -> Option<usize> {
        self.ids.get(&term.into_owned()).copied()
    }

    fn resolve(&self, id: usize) -> &Term {
        &self.terms[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::named_node::NamedNode;
    use std::collections::HashSet;

    fn node(name: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.com/{name}"))
    }

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(node(s), node(p), node(o))
    }

    #[test]
    fn insert_is_idempotent() {
        let mut graph = Graph::new();
        assert!(graph.insert(triple("s", "p", "o").as_ref()));
        assert_eq!(graph.len(), 1);
        assert!(!graph.insert(triple("s", "p", "o").as_ref()));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn remove_unknown_triple_is_a_no_op() {
        let mut graph = Graph::new();
        graph.insert(triple("s", "p", "o").as_ref());
        assert!(!graph.remove(triple("s", "p", "x").as_ref()));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn matches_agree_with_reference_set_under_mixed_operations() {
        // Drive the store and a plain set through the same operation sequence
        // and compare the full match result after every step.
        let names = ["a", "b", "c"];
        let mut graph = Graph::new();
        let mut reference = HashSet::new();
        let mut step = 0_usize;
        for round in 0..3 {
            for s in names {
                for p in names {
                    for o in names {
                        let t = triple(s, p, o);
                        // Alternate inserts and removes in a fixed but uneven pattern
                        if (step + round) % 3 == 0 {
                            assert_eq!(graph.remove(t.as_ref()), reference.remove(&t));
                        } else {
                            assert_eq!(graph.insert(t.as_ref()), reference.insert(t.clone()));
                        }
                        step += 1;
                    }
                }
            }
            let from_graph: HashSet<_> =
                graph.triples_matching(None, None, None).collect();
            assert_eq!(from_graph, reference);
            assert_eq!(graph.len(), reference.len());
        }
    }

    #[test]
    fn all_eight_patterns_route_to_the_same_answers() {
        let mut graph = Graph::new();
        for (s, p, o) in [("s1", "p1", "o1"), ("s1", "p2", "o2"), ("s2", "p1", "o1")] {
            graph.insert(triple(s, p, o).as_ref());
        }
        let s1 = node("s1");
        let p1 = node("p1");
        let o1 = node("o1");

        let count = |s: Option<&NamedNode>, p: Option<&NamedNode>, o: Option<&NamedNode>| {
            graph
                .triples_matching(
                    s.map(SubjectRef::from),
                    p.map(NamedNode::as_ref),
                    o.map(TermRef::from),
                )
                .count()
        };

        assert_eq!(count(Some(&s1), Some(&p1), Some(&o1)), 1);
        assert_eq!(count(Some(&s1), Some(&p1), None), 1);
        assert_eq!(count(Some(&s1), None, Some(&o1)), 1);
        assert_eq!(count(Some(&s1), None, None), 2);
        assert_eq!(count(None, Some(&p1), Some(&o1)), 2);
        assert_eq!(count(None, Some(&p1), None), 2);
        assert_eq!(count(None, None, Some(&o1)), 2);
        assert_eq!(count(None, None, None), 3);
    }

    #[test]
    fn unknown_term_in_pattern_matches_nothing() {
        let mut graph = Graph::new();
        graph.insert(triple("s", "p", "o").as_ref());
        let stranger = node("stranger");
        assert_eq!(
            graph
                .triples_matching(Some(SubjectRef::from(&stranger)), None, None)
                .count(),
            0
        );
    }
}
