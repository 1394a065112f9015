use crate::algebra::{
    AggregateExpression, Expression, GraphPattern, OrderExpression, TermPattern, TriplePattern,
};
use crate::error::{ExpressionError, QueryEvaluationError};
use crate::solution::QuerySolution;
use oxmem::vocab::xsd;
use oxmem::{Graph, Literal, SubjectRef, Term, Triple};
use regex::Regex;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Evaluates [`GraphPattern`]s against a [`Graph`].
///
/// ```
/// use oxmem::{Graph, NamedNode, Triple, Variable};
/// use sparmatch::{GraphPattern, QueryEvaluator, TriplePattern};
///
/// let mut graph = Graph::new();
/// let ex = NamedNode::new("http://example.com")?;
/// graph.insert(&Triple::new(ex.clone(), ex.clone(), ex.clone()));
///
/// let s = Variable::new("s")?;
/// let solutions = QueryEvaluator::new().evaluate(
///     &graph,
///     &GraphPattern::Bgp {
///         patterns: vec![TriplePattern::new(s.clone(), ex.clone(), ex)],
///     },
/// )?;
/// assert_eq!(solutions.len(), 1);
/// assert!(solutions[0].contains("s"));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Default)]
pub struct QueryEvaluator {}

impl QueryEvaluator {
    pub fn new() -> Self {
        Self {}
    }

    /// Evaluates the pattern and returns all its solutions.
    pub fn evaluate(
        &self,
        graph: &Graph,
        pattern: &GraphPattern,
    ) -> Result<Vec<QuerySolution>, QueryEvaluationError> {
        self.eval_pattern(graph, pattern, &QuerySolution::default())
    }

    /// Evaluates the pattern under an already bound solution.
    ///
    /// Variables bound by `from` keep their value and constrain the match,
    /// which makes correlated evaluation possible without rewriting the
    /// pattern.
    pub fn evaluate_with(
        &self,
        graph: &Graph,
        pattern: &GraphPattern,
        from: &QuerySolution,
    ) -> Result<Vec<QuerySolution>, QueryEvaluationError> {
        self.eval_pattern(graph, pattern, from)
    }

    fn eval_pattern(
        &self,
        graph: &Graph,
        pattern: &GraphPattern,
        from: &QuerySolution,
    ) -> Result<Vec<QuerySolution>, QueryEvaluationError> {
        match pattern {
            GraphPattern::Bgp { patterns } => {
                let mut solutions = vec![from.clone()];
                for pattern in patterns {
                    let mut extended = Vec::new();
                    for solution in &solutions {
                        Self::match_triple_pattern(graph, pattern, solution, &mut extended);
                    }
                    solutions = extended;
                }
                Ok(solutions)
            }
            GraphPattern::Join { left, right } => {
                let mut results = Vec::new();
                for solution in self.eval_pattern(graph, left, from)? {
                    results.extend(self.eval_pattern(graph, right, &solution)?);
                }
                Ok(results)
            }
            GraphPattern::LeftJoin {
                left,
                right,
                expression,
            } => {
                let mut results = Vec::new();
                for solution in self.eval_pattern(graph, left, from)? {
                    let mut extended = self.eval_pattern(graph, right, &solution)?;
                    if let Some(expression) = expression {
                        let mut kept = Vec::new();
                        for candidate in extended {
                            match self.effective_boolean_value(graph, expression, &candidate) {
                                Ok(true) => kept.push(candidate),
                                Ok(false) => (),
                                Err(error) => Self::scope_expression_error(error)?,
                            }
                        }
                        extended = kept;
                    }
                    if extended.is_empty() {
                        // the optional part did not match, the left solution survives
                        results.push(solution);
                    } else {
                        results.append(&mut extended);
                    }
                }
                Ok(results)
            }
            GraphPattern::Filter { expression, inner } => {
                let mut results = Vec::new();
                for solution in self.eval_pattern(graph, inner, from)? {
                    match self.effective_boolean_value(graph, expression, &solution) {
                        Ok(true) => results.push(solution),
                        Ok(false) => (),
                        Err(error) => Self::scope_expression_error(error)?,
                    }
                }
                Ok(results)
            }
            GraphPattern::Union { left, right } => {
                let mut results = self.eval_pattern(graph, left, from)?;
                results.extend(self.eval_pattern(graph, right, from)?);
                Ok(results)
            }
            GraphPattern::Minus { left, right } => {
                // the right side is evaluated independently of each left
                // solution, which is what sets MINUS apart from NOT EXISTS
                let removals = self.eval_pattern(graph, right, from)?;
                Ok(self
                    .eval_pattern(graph, left, from)?
                    .into_iter()
                    .filter(|solution| {
                        !removals
                            .iter()
                            .any(|removal| are_compatible_and_not_disjointed(solution, removal))
                    })
                    .collect())
            }
            GraphPattern::Extend {
                inner,
                variable,
                expression,
            } => {
                let mut results = Vec::new();
                for mut solution in self.eval_pattern(graph, inner, from)? {
                    match self.eval_expression(graph, expression, &solution) {
                        Ok(value) => {
                            solution.bindings.insert(variable.clone(), value);
                            results.push(solution);
                        }
                        Err(error) => Self::scope_expression_error(error)?,
                    }
                }
                Ok(results)
            }
            GraphPattern::Group {
                inner,
                variables,
                aggregates,
            } => {
                let solutions = self.eval_pattern(graph, inner, from)?;
                let mut groups = BTreeMap::<Vec<Option<Term>>, Vec<QuerySolution>>::new();
                if solutions.is_empty() && variables.is_empty() {
                    // aggregate-only queries yield a single group even when
                    // there is nothing to group
                    groups.insert(Vec::new(), Vec::new());
                }
                for solution in solutions {
                    let key = variables
                        .iter()
                        .map(|variable| solution.bindings.get(variable).cloned())
                        .collect();
                    groups.entry(key).or_default().push(solution);
                }
                let mut results = Vec::with_capacity(groups.len());
                for (key, members) in groups {
                    let mut result = QuerySolution::default();
                    for (variable, value) in variables.iter().zip(key) {
                        if let Some(value) = value {
                            result.bindings.insert(variable.clone(), value);
                        }
                    }
                    for (variable, aggregate) in aggregates {
                        if let Some(value) = self.eval_aggregate(graph, aggregate, &members)? {
                            result.bindings.insert(variable.clone(), value);
                        }
                    }
                    results.push(result);
                }
                Ok(results)
            }
            GraphPattern::OrderBy { inner, expression } => {
                let mut solutions = self.eval_pattern(graph, inner, from)?;
                // sort_by is stable so ties keep their original order
                solutions.sort_by(|a, b| {
                    for comparator in expression {
                        let (e, reverse) = match comparator {
                            OrderExpression::Asc(e) => (e, false),
                            OrderExpression::Desc(e) => (e, true),
                        };
                        let key_a = self.eval_expression(graph, e, a).ok();
                        let key_b = self.eval_expression(graph, e, b).ok();
                        // an unbound key sorts before every bound one
                        let mut ordering = key_a.cmp(&key_b);
                        if reverse {
                            ordering = ordering.reverse();
                        }
                        if ordering != Ordering::Equal {
                            return ordering;
                        }
                    }
                    Ordering::Equal
                });
                Ok(solutions)
            }
            GraphPattern::Slice {
                inner,
                start,
                length,
            } => {
                let solutions = self.eval_pattern(graph, inner, from)?;
                let solutions = solutions.into_iter().skip(*start);
                Ok(if let Some(length) = length {
                    solutions.take(*length).collect()
                } else {
                    solutions.collect()
                })
            }
            GraphPattern::Project { inner, variables } => Ok(self
                .eval_pattern(graph, inner, from)?
                .into_iter()
                .map(|solution| {
                    variables
                        .iter()
                        .filter_map(|variable| {
                            solution
                                .bindings
                                .get(variable)
                                .map(|term| (variable.clone(), term.clone()))
                        })
                        .collect()
                })
                .collect()),
            GraphPattern::Distinct { inner } => {
                let mut seen = FxHashSet::default();
                Ok(self
                    .eval_pattern(graph, inner, from)?
                    .into_iter()
                    .filter(|solution| seen.insert(solution.clone()))
                    .collect())
            }
        }
    }

    fn match_triple_pattern(
        graph: &Graph,
        pattern: &TriplePattern,
        solution: &QuerySolution,
        results: &mut Vec<QuerySolution>,
    ) {
        let subject = pattern_value(&pattern.subject, solution);
        let predicate = pattern_value(&pattern.predicate, solution);
        let object = pattern_value(&pattern.object, solution);

        let subject_ref = match &subject {
            None => None,
            Some(Term::NamedNode(node)) => Some(SubjectRef::from(node)),
            Some(Term::BlankNode(node)) => Some(SubjectRef::from(node)),
            Some(Term::Literal(_)) => return, // a literal is never a subject
        };
        let predicate_ref = match &predicate {
            None => None,
            Some(Term::NamedNode(node)) => Some(node.as_ref()),
            Some(_) => return, // only IRIs occur in predicate position
        };
        let object_ref = object.as_ref().map(Term::as_ref);

        for triple in graph.triples_matching(subject_ref, predicate_ref, object_ref) {
            let Triple {
                subject,
                predicate,
                object,
            } = triple;
            let mut extended = solution.clone();
            if unify(&pattern.subject, &Term::from(subject), &mut extended)
                && unify(&pattern.predicate, &Term::from(predicate), &mut extended)
                && unify(&pattern.object, &object, &mut extended)
            {
                results.push(extended);
            }
        }
    }

    fn eval_aggregate(
        &self,
        graph: &Graph,
        aggregate: &AggregateExpression,
        members: &[QuerySolution],
    ) -> Result<Option<Term>, QueryEvaluationError> {
        Ok(match aggregate {
            AggregateExpression::Count {
                expr: None,
                distinct,
            } => {
                let count = if *distinct {
                    members.iter().collect::<FxHashSet<_>>().len()
                } else {
                    members.len()
                };
                Some(Literal::from(i64::try_from(count).unwrap_or(i64::MAX)).into())
            }
            AggregateExpression::Count {
                expr: Some(expr),
                distinct,
            } => {
                let values = self.aggregate_values(graph, expr, *distinct, members)?;
                Some(Literal::from(i64::try_from(values.len()).unwrap_or(i64::MAX)).into())
            }
            AggregateExpression::Sum { expr, distinct } => self
                .aggregate_values(graph, expr, *distinct, members)?
                .iter()
                .try_fold(Numeric::Integer(0), |sum, value| {
                    sum.checked_add(numeric_term(value)?)
                })
                .map(|sum| sum.into_literal().into()),
            AggregateExpression::Avg { expr, distinct } => {
                let values = self.aggregate_values(graph, expr, *distinct, members)?;
                if values.is_empty() {
                    Some(Literal::from(0.).into())
                } else {
                    let mut sum = 0.;
                    for value in &values {
                        let Some(value) = numeric_term(value) else {
                            return Ok(None); // non-numeric input, the whole aggregate is unbound
                        };
                        sum += value.as_f64();
                    }
                    #[allow(clippy::cast_precision_loss)]
                    let avg = sum / values.len() as f64;
                    Some(Literal::from(avg).into())
                }
            }
            AggregateExpression::Min { expr, distinct } => self
                .aggregate_values(graph, expr, *distinct, members)?
                .into_iter()
                .min(),
            AggregateExpression::Max { expr, distinct } => self
                .aggregate_values(graph, expr, *distinct, members)?
                .into_iter()
                .max(),
        })
    }

    fn aggregate_values(
        &self,
        graph: &Graph,
        expr: &Expression,
        distinct: bool,
        members: &[QuerySolution],
    ) -> Result<Vec<Term>, QueryEvaluationError> {
        let mut values = Vec::new();
        for member in members {
            match self.eval_expression(graph, expr, member) {
                Ok(value) => values.push(value),
                Err(error) => Self::scope_expression_error(error)?,
            }
        }
        if distinct {
            let mut seen = FxHashSet::default();
            values.retain(|value| seen.insert(value.clone()));
        }
        Ok(values)
    }

    fn eval_expression(
        &self,
        graph: &Graph,
        expression: &Expression,
        solution: &QuerySolution,
    ) -> Result<Term, ExpressionError> {
        Ok(match expression {
            Expression::NamedNode(node) => node.clone().into(),
            Expression::Literal(literal) => literal.clone().into(),
            Expression::Variable(variable) => solution
                .bindings
                .get(variable)
                .cloned()
                .ok_or_else(|| ExpressionError::UnresolvedVariable(variable.clone()))?,
            Expression::Or(a, b) => match self.effective_boolean_value(graph, a, solution) {
                Ok(true) => Literal::from(true).into(),
                Ok(false) => {
                    Literal::from(self.effective_boolean_value(graph, b, solution)?).into()
                }
                Err(error) => {
                    // three-valued logic: error || true is still true
                    if self
                        .effective_boolean_value(graph, b, solution)
                        .is_ok_and(|value| value)
                    {
                        Literal::from(true).into()
                    } else {
                        return Err(error);
                    }
                }
            },
            Expression::And(a, b) => match self.effective_boolean_value(graph, a, solution) {
                Ok(false) => Literal::from(false).into(),
                Ok(true) => {
                    Literal::from(self.effective_boolean_value(graph, b, solution)?).into()
                }
                Err(error) => {
                    // three-valued logic: error && false is still false
                    if self
                        .effective_boolean_value(graph, b, solution)
                        .is_ok_and(|value| !value)
                    {
                        Literal::from(false).into()
                    } else {
                        return Err(error);
                    }
                }
            },
            Expression::Not(inner) => {
                Literal::from(!self.effective_boolean_value(graph, inner, solution)?).into()
            }
            Expression::Equal(a, b) => {
                let a = self.eval_expression(graph, a, solution)?;
                let b = self.eval_expression(graph, b, solution)?;
                Literal::from(operand_eq(&a, &b)).into()
            }
            Expression::SameTerm(a, b) => {
                let a = self.eval_expression(graph, a, solution)?;
                let b = self.eval_expression(graph, b, solution)?;
                Literal::from(a == b).into()
            }
            Expression::Greater(a, b) => {
                Literal::from(self.compare(graph, a, b, solution)? == Ordering::Greater).into()
            }
            Expression::GreaterOrEqual(a, b) => {
                Literal::from(self.compare(graph, a, b, solution)? != Ordering::Less).into()
            }
            Expression::Less(a, b) => {
                Literal::from(self.compare(graph, a, b, solution)? == Ordering::Less).into()
            }
            Expression::LessOrEqual(a, b) => {
                Literal::from(self.compare(graph, a, b, solution)? != Ordering::Greater).into()
            }
            Expression::Bound(variable) => {
                Literal::from(solution.bindings.contains_key(variable)).into()
            }
            Expression::Exists(pattern) => {
                Literal::from(!self.eval_pattern(graph, pattern, solution)?.is_empty()).into()
            }
            Expression::Str(inner) => match self.eval_expression(graph, inner, solution)? {
                Term::NamedNode(node) => Literal::new_simple_literal(node.into_string()).into(),
                Term::Literal(literal) => Literal::new_simple_literal(literal.value()).into(),
                Term::BlankNode(_) => return Err(ExpressionError::Type),
            },
            Expression::StrStarts(a, b) => {
                let (a, b) = self.string_args(graph, a, b, solution)?;
                Literal::from(a.starts_with(&b)).into()
            }
            Expression::StrEnds(a, b) => {
                let (a, b) = self.string_args(graph, a, b, solution)?;
                Literal::from(a.ends_with(&b)).into()
            }
            Expression::Contains(a, b) => {
                let (a, b) = self.string_args(graph, a, b, solution)?;
                Literal::from(a.contains(&b)).into()
            }
            Expression::Regex(text, pattern) => {
                let (text, pattern) = self.string_args(graph, text, pattern, solution)?;
                let regex = Regex::new(&pattern)?;
                Literal::from(regex.is_match(&text)).into()
            }
        })
    }

    fn effective_boolean_value(
        &self,
        graph: &Graph,
        expression: &Expression,
        solution: &QuerySolution,
    ) -> Result<bool, ExpressionError> {
        let Term::Literal(literal) = self.eval_expression(graph, expression, solution)? else {
            return Err(ExpressionError::Type);
        };
        let datatype = literal.datatype();
        if datatype == xsd::BOOLEAN {
            match literal.value() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ExpressionError::Type),
            }
        } else if datatype == xsd::STRING || literal.language().is_some() {
            Ok(!literal.value().is_empty())
        } else if datatype == xsd::INTEGER {
            literal
                .value()
                .parse::<i64>()
                .map(|value| value != 0)
                .map_err(|_| ExpressionError::Type)
        } else if datatype == xsd::DOUBLE {
            literal
                .value()
                .parse::<f64>()
                .map(|value| !(value == 0. || value.is_nan()))
                .map_err(|_| ExpressionError::Type)
        } else {
            Err(ExpressionError::Type)
        }
    }

    fn compare(
        &self,
        graph: &Graph,
        a: &Expression,
        b: &Expression,
        solution: &QuerySolution,
    ) -> Result<Ordering, ExpressionError> {
        let a = self.eval_expression(graph, a, solution)?;
        let b = self.eval_expression(graph, b, solution)?;
        let (Term::Literal(a), Term::Literal(b)) = (&a, &b) else {
            return Err(ExpressionError::Type);
        };
        if let (Some(a), Some(b)) = (numeric_literal(a), numeric_literal(b)) {
            a.as_f64().partial_cmp(&b.as_f64()).ok_or(ExpressionError::Type)
        } else if a.datatype() == b.datatype() && a.language() == b.language() {
            Ok(a.value().cmp(b.value()))
        } else {
            Err(ExpressionError::Type)
        }
    }

    fn string_args(
        &self,
        graph: &Graph,
        a: &Expression,
        b: &Expression,
        solution: &QuerySolution,
    ) -> Result<(String, String), ExpressionError> {
        Ok((
            string_value(self.eval_expression(graph, a, solution)?)?,
            string_value(self.eval_expression(graph, b, solution)?)?,
        ))
    }

    fn scope_expression_error(error: ExpressionError) -> Result<(), QueryEvaluationError> {
        match error {
            ExpressionError::InvalidRegex(error) => Err(QueryEvaluationError::InvalidRegex(error)),
            // scoped to a single solution: that solution is dropped and
            // evaluation goes on
            ExpressionError::UnresolvedVariable(_) | ExpressionError::Type => Ok(()),
        }
    }
}

fn pattern_value(pattern: &TermPattern, solution: &QuerySolution) -> Option<Term> {
    match pattern {
        TermPattern::NamedNode(node) => Some(node.clone().into()),
        TermPattern::BlankNode(node) => Some(node.clone().into()),
        TermPattern::Literal(literal) => Some(literal.clone().into()),
        TermPattern::Variable(variable) => solution.bindings.get(variable).cloned(),
    }
}

fn unify(pattern: &TermPattern, term: &Term, solution: &mut QuerySolution) -> bool {
    match pattern {
        TermPattern::Variable(variable) => match solution.bindings.get(variable) {
            Some(bound) => bound == term,
            None => {
                solution.bindings.insert(variable.clone(), term.clone());
                true
            }
        },
        TermPattern::NamedNode(node) => matches!(term, Term::NamedNode(t) if t == node),
        TermPattern::BlankNode(node) => matches!(term, Term::BlankNode(t) if t == node),
        TermPattern::Literal(literal) => matches!(term, Term::Literal(t) if t == literal),
    }
}

/// [Compatible mappings](https://www.w3.org/TR/sparql11-query/#defn_algCompatibleMapping)
/// that share at least one variable, as MINUS requires.
fn are_compatible_and_not_disjointed(a: &QuerySolution, b: &QuerySolution) -> bool {
    let mut found_intersection = false;
    for (variable, term) in &a.bindings {
        if let Some(other) = b.bindings.get(variable) {
            if other != term {
                return false;
            }
            found_intersection = true;
        }
    }
    found_intersection
}

fn operand_eq(a: &Term, b: &Term) -> bool {
    if let (Term::Literal(a), Term::Literal(b)) = (a, b) {
        if let (Some(a), Some(b)) = (numeric_literal(a), numeric_literal(b)) {
            #[allow(clippy::float_cmp)]
            return a.as_f64() == b.as_f64();
        }
    }
    a == b
}

fn string_value(term: Term) -> Result<String, ExpressionError> {
    match term {
        Term::Literal(literal)
            if literal.datatype() == xsd::STRING || literal.language().is_some() =>
        {
            Ok(literal.destruct().0)
        }
        _ => Err(ExpressionError::Type),
    }
}

fn numeric_term(term: &Term) -> Option<Numeric> {
    if let Term::Literal(literal) = term {
        numeric_literal(literal)
    } else {
        None
    }
}

fn numeric_literal(literal: &Literal) -> Option<Numeric> {
    let datatype = literal.datatype();
    if datatype == xsd::INTEGER {
        literal.value().parse().ok().map(Numeric::Integer)
    } else if datatype == xsd::DOUBLE {
        literal.value().parse().ok().map(Numeric::Double)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug)]
enum Numeric {
    Integer(i64),
    Double(f64),
}

impl Numeric {
    fn checked_add(self, other: Self) -> Option<Self> {
        Some(match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => Self::Integer(a.checked_add(b)?),
            (a, b) => Self::Double(a.as_f64() + b.as_f64()),
        })
    }

    fn as_f64(self) -> f64 {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(value) => value as f64,
            Self::Double(value) => value,
        }
    }

    fn into_literal(self) -> Literal {
        match self {
            Self::Integer(value) => value.into(),
            Self::Double(value) => value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic_in_result_fn)]

    use super::*;
    use oxmem::{NamedNode, Variable};

    fn named(suffix: &str) -> NamedNode {
        NamedNode::new(format!("http://example.com/{suffix}")).unwrap()
    }

    fn var(name: &str) -> Variable {
        Variable::new(name).unwrap()
    }

    fn sample_graph() -> Graph {
        let mut graph = Graph::new();
        for (s, p, o) in [
            ("alice", "knows", "bob"),
            ("alice", "knows", "carol"),
            ("bob", "knows", "carol"),
        ] {
            graph.insert(&Triple::new(named(s), named(p), named(o)));
        }
        graph
    }

    fn bgp(patterns: Vec<TriplePattern>) -> GraphPattern {
        GraphPattern::Bgp { patterns }
    }

    #[test]
    fn bgp_joins_on_shared_variables() -> Result<(), QueryEvaluationError> {
        let graph = sample_graph();
        // ?x knows ?y . ?y knows ?z
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &bgp(vec![
                TriplePattern::new(var("x"), named("knows"), var("y")),
                TriplePattern::new(var("y"), named("knows"), var("z")),
            ]),
        )?;
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].get("x"), Some(&named("alice").into()));
        assert_eq!(solutions[0].get("z"), Some(&named("carol").into()));
        Ok(())
    }

    #[test]
    fn repeated_variable_must_match_the_same_term() -> Result<(), QueryEvaluationError> {
        let mut graph = sample_graph();
        graph.insert(&Triple::new(named("dan"), named("knows"), named("dan")));
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &bgp(vec![TriplePattern::new(var("x"), named("knows"), var("x"))]),
        )?;
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].get("x"), Some(&named("dan").into()));
        Ok(())
    }

    #[test]
    fn optional_keeps_solutions_without_a_match() -> Result<(), QueryEvaluationError> {
        let mut graph = sample_graph();
        graph.insert(&Triple::new(
            named("bob"),
            named("age"),
            Literal::from(42_i64),
        ));
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::LeftJoin {
                left: Box::new(bgp(vec![TriplePattern::new(
                    named("alice"),
                    named("knows"),
                    var("who"),
                )])),
                right: Box::new(bgp(vec![TriplePattern::new(
                    var("who"),
                    named("age"),
                    var("age"),
                )])),
                expression: None,
            },
        )?;
        assert_eq!(solutions.len(), 2);
        let bob = solutions
            .iter()
            .find(|s| s.get("who") == Some(&named("bob").into()))
            .unwrap();
        assert_eq!(bob.get("age"), Some(&Literal::from(42_i64).into()));
        let carol = solutions
            .iter()
            .find(|s| s.get("who") == Some(&named("carol").into()))
            .unwrap();
        assert!(!carol.contains("age"));
        Ok(())
    }

    #[test]
    fn filter_drops_solutions_its_expression_fails_for() -> Result<(), QueryEvaluationError> {
        let graph = sample_graph();
        // ?missing is never bound, so every solution errors and is dropped
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::Filter {
                expression: Expression::Greater(
                    Box::new(var("missing").into()),
                    Box::new(Literal::from(0_i64).into()),
                ),
                inner: Box::new(bgp(vec![TriplePattern::new(
                    var("x"),
                    named("knows"),
                    var("y"),
                )])),
            },
        )?;
        assert!(solutions.is_empty());
        Ok(())
    }

    #[test]
    fn minus_requires_a_shared_binding() -> Result<(), QueryEvaluationError> {
        let graph = sample_graph();
        // the right side binds only ?other, disjoint from ?x/?y, so
        // MINUS removes nothing
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::Minus {
                left: Box::new(bgp(vec![TriplePattern::new(
                    var("x"),
                    named("knows"),
                    var("y"),
                )])),
                right: Box::new(bgp(vec![TriplePattern::new(
                    var("other"),
                    named("knows"),
                    named("carol"),
                )])),
            },
        )?;
        assert_eq!(solutions.len(), 3);

        // NOT EXISTS over the same inner pattern removes everything instead
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::Filter {
                expression: Expression::Not(Box::new(Expression::Exists(Box::new(bgp(vec![
                    TriplePattern::new(var("other"), named("knows"), named("carol")),
                ]))))),
                inner: Box::new(bgp(vec![TriplePattern::new(
                    var("x"),
                    named("knows"),
                    var("y"),
                )])),
            },
        )?;
        assert!(solutions.is_empty());
        Ok(())
    }

    #[test]
    fn invalid_regex_aborts_the_query() {
        let graph = sample_graph();
        let result = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::Filter {
                expression: Expression::Regex(
                    Box::new(Literal::new_simple_literal("abc").into()),
                    Box::new(Literal::new_simple_literal("(unclosed").into()),
                ),
                inner: Box::new(bgp(vec![TriplePattern::new(
                    var("x"),
                    named("knows"),
                    var("y"),
                )])),
            },
        );
        assert!(matches!(
            result,
            Err(QueryEvaluationError::InvalidRegex(_))
        ));
    }

    #[test]
    fn or_is_true_when_one_side_errors_and_the_other_is_true(
    ) -> Result<(), QueryEvaluationError> {
        let graph = sample_graph();
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::Filter {
                expression: Expression::Or(
                    Box::new(var("missing").into()),
                    Box::new(true.into()),
                ),
                inner: Box::new(bgp(vec![TriplePattern::new(
                    var("x"),
                    named("knows"),
                    var("y"),
                )])),
            },
        )?;
        assert_eq!(solutions.len(), 3);
        Ok(())
    }

    #[test]
    fn count_distinct_collapses_duplicates() -> Result<(), QueryEvaluationError> {
        let graph = sample_graph();
        // two people know carol, three edges in total
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::Group {
                inner: Box::new(bgp(vec![TriplePattern::new(
                    var("x"),
                    named("knows"),
                    var("y"),
                )])),
                variables: Vec::new(),
                aggregates: vec![
                    (
                        var("edges"),
                        AggregateExpression::Count {
                            expr: None,
                            distinct: false,
                        },
                    ),
                    (
                        var("targets"),
                        AggregateExpression::Count {
                            expr: Some(Box::new(var("y").into())),
                            distinct: true,
                        },
                    ),
                ],
            },
        )?;
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].get("edges"), Some(&Literal::from(3_i64).into()));
        assert_eq!(
            solutions[0].get("targets"),
            Some(&Literal::from(2_i64).into())
        );
        Ok(())
    }

    #[test]
    fn sum_of_mixed_numeric_types_is_a_double() -> Result<(), QueryEvaluationError> {
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            named("a"),
            named("value"),
            Literal::from(1_i64),
        ));
        graph.insert(&Triple::new(named("b"), named("value"), Literal::from(2.5)));
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::Group {
                inner: Box::new(bgp(vec![TriplePattern::new(
                    var("x"),
                    named("value"),
                    var("v"),
                )])),
                variables: Vec::new(),
                aggregates: vec![(
                    var("total"),
                    AggregateExpression::Sum {
                        expr: Box::new(var("v").into()),
                        distinct: false,
                    },
                )],
            },
        )?;
        assert_eq!(solutions[0].get("total"), Some(&Literal::from(3.5).into()));
        Ok(())
    }

    #[test]
    fn slice_applies_after_ordering() -> Result<(), QueryEvaluationError> {
        let mut graph = Graph::new();
        for (name, age) in [("alice", 31_i64), ("bob", 12), ("carol", 25)] {
            graph.insert(&Triple::new(named(name), named("age"), Literal::from(age)));
        }
        let solutions = QueryEvaluator::new().evaluate(
            &graph,
            &GraphPattern::Slice {
                inner: Box::new(GraphPattern::OrderBy {
                    inner: Box::new(bgp(vec![TriplePattern::new(
                        var("x"),
                        named("age"),
                        var("age"),
                    )])),
                    expression: vec![OrderExpression::Desc(var("age").into())],
                }),
                start: 1,
                length: Some(1),
            },
        )?;
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].get("x"), Some(&named("carol").into()));
        Ok(())
    }
}
