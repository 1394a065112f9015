//! The built-in [RDFS](https://www.w3.org/TR/rdf11-mt/#rdfs-entailment) and
//! [OWL 2 RL](https://www.w3.org/TR/owl2-profiles/#Reasoning_in_OWL_2_RL_and_RDF_Graphs_using_Rules)
//! subset rule table.
//!
//! Rules are plain data interpreted by the engine, adding one is a matter of
//! adding a table entry.

use oxmem::{NamedNodeRef, Variable};
use sparmatch::{TermPattern, TriplePattern};

/// A forward-chaining rule: when every `body` pattern matches, `head` is
/// instantiated under the resulting bindings and asserted.
#[derive(Debug, Clone)]
pub struct Rule {
    name: &'static str,
    body: Vec<TriplePattern>,
    head: TriplePattern,
}

impl Rule {
    pub fn new(name: &'static str, body: Vec<TriplePattern>, head: TriplePattern) -> Self {
        let rule = Self { name, body, head };
        debug_assert!(
            rule.head_variables_are_bound(),
            "the head of rule {name} uses a variable its body does not bind"
        );
        rule
    }

    /// The rule id, following the W3C OWL 2 RL naming where one exists.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn body(&self) -> &[TriplePattern] {
        &self.body
    }

    pub fn head(&self) -> &TriplePattern {
        &self.head
    }

    fn head_variables_are_bound(&self) -> bool {
        pattern_variables(&self.head).all(|head_var| {
            self.body
                .iter()
                .flat_map(pattern_variables)
                .any(|body_var| body_var == head_var)
        })
    }
}

fn pattern_variables(pattern: &TriplePattern) -> impl Iterator<Item = &Variable> {
    [&pattern.subject, &pattern.predicate, &pattern.object]
        .into_iter()
        .filter_map(|term| {
            if let TermPattern::Variable(variable) = term {
                Some(variable)
            } else {
                None
            }
        })
}

/// An ordered list of rules applied together until fixpoint.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The RDFS schema rules plus the `owl:TransitiveProperty`,
    /// `owl:SymmetricProperty`, `owl:inverseOf` and `owl:equivalentClass`
    /// fragment of OWL 2 RL.
    pub fn rdfs_owl_rl() -> Self {
        use oxmem::vocab::{owl, rdf, rdfs};

        Self::new(vec![
            Rule::new(
                "scm-sco",
                vec![
                    pattern(var("c1"), rdfs::SUB_CLASS_OF, var("c2")),
                    pattern(var("c2"), rdfs::SUB_CLASS_OF, var("c3")),
                ],
                pattern(var("c1"), rdfs::SUB_CLASS_OF, var("c3")),
            ),
            Rule::new(
                "cax-sco",
                vec![
                    pattern(var("c1"), rdfs::SUB_CLASS_OF, var("c2")),
                    pattern(var("x"), rdf::TYPE, var("c1")),
                ],
                pattern(var("x"), rdf::TYPE, var("c2")),
            ),
            Rule::new(
                "scm-spo",
                vec![
                    pattern(var("p1"), rdfs::SUB_PROPERTY_OF, var("p2")),
                    pattern(var("p2"), rdfs::SUB_PROPERTY_OF, var("p3")),
                ],
                pattern(var("p1"), rdfs::SUB_PROPERTY_OF, var("p3")),
            ),
            Rule::new(
                "prp-spo1",
                vec![
                    pattern(var("p1"), rdfs::SUB_PROPERTY_OF, var("p2")),
                    TriplePattern::new(var("x"), var("p1"), var("y")),
                ],
                TriplePattern::new(var("x"), var("p2"), var("y")),
            ),
            Rule::new(
                "prp-dom",
                vec![
                    pattern(var("p"), rdfs::DOMAIN, var("c")),
                    TriplePattern::new(var("x"), var("p"), var("y")),
                ],
                pattern(var("x"), rdf::TYPE, var("c")),
            ),
            Rule::new(
                "prp-rng",
                vec![
                    pattern(var("p"), rdfs::RANGE, var("c")),
                    TriplePattern::new(var("x"), var("p"), var("y")),
                ],
                pattern(var("y"), rdf::TYPE, var("c")),
            ),
            Rule::new(
                "scm-eqc1",
                vec![pattern(var("c1"), owl::EQUIVALENT_CLASS, var("c2"))],
                pattern(var("c1"), rdfs::SUB_CLASS_OF, var("c2")),
            ),
            Rule::new(
                "scm-eqc2",
                vec![pattern(var("c1"), owl::EQUIVALENT_CLASS, var("c2"))],
                pattern(var("c2"), rdfs::SUB_CLASS_OF, var("c1")),
            ),
            Rule::new(
                "prp-trp",
                vec![
                    pattern(var("p"), rdf::TYPE, owl::TRANSITIVE_PROPERTY),
                    TriplePattern::new(var("x"), var("p"), var("y")),
                    TriplePattern::new(var("y"), var("p"), var("z")),
                ],
                TriplePattern::new(var("x"), var("p"), var("z")),
            ),
            Rule::new(
                "prp-symp",
                vec![
                    pattern(var("p"), rdf::TYPE, owl::SYMMETRIC_PROPERTY),
                    TriplePattern::new(var("x"), var("p"), var("y")),
                ],
                TriplePattern::new(var("y"), var("p"), var("x")),
            ),
            Rule::new(
                "prp-inv1",
                vec![
                    pattern(var("p1"), owl::INVERSE_OF, var("p2")),
                    TriplePattern::new(var("x"), var("p1"), var("y")),
                ],
                TriplePattern::new(var("y"), var("p2"), var("x")),
            ),
        ])
    }
}

fn var(name: &str) -> TermPattern {
    Variable::new_unchecked(name).into()
}

fn pattern(
    subject: TermPattern,
    predicate: NamedNodeRef<'static>,
    object: impl Into<TermPattern>,
) -> TriplePattern {
    TriplePattern::new(subject, predicate.into_owned(), object)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_rules_bind_their_head_variables() {
        for rule in RuleSet::rdfs_owl_rl().rules() {
            assert!(
                rule.head_variables_are_bound(),
                "rule {} has a free head variable",
                rule.name()
            );
        }
    }

    #[test]
    #[should_panic(expected = "does not bind")]
    #[cfg(debug_assertions)]
    fn free_head_variable_is_rejected() {
        Rule::new(
            "broken",
            vec![TriplePattern::new(var("x"), var("p"), var("y"))],
            TriplePattern::new(var("x"), var("p"), var("unbound")),
        );
    }
}
