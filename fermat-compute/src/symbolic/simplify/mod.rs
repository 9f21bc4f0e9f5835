//! The simplification engine.
//!
//! [`Simplifier::simplify`] walks the tree from the top down. Each grouping is simplified in
//! *passes*:
//!
//! 1. If the cache already has a result for the grouping, that result is used.
//! 2. If the operation of the grouping belongs to a commutative focus (`+` and `-` belong to `+`,
//!    `*` and `/` belong to `*`), the grouping is [unfolded](super::fold::unfold) into a flat
//!    list of terms. Constant terms are folded into one constant, and the remaining terms are
//!    simplified (if there is one) or [gathered](super::gather::gather) (if there are several).
//!    The two parts are combined again, and each side of the result is simplified.
//! 3. Otherwise, each side of the grouping is simplified.
//! 4. A grouping of two constants is evaluated.
//! 5. The first matching [identity rule](rules) is applied, and each side of the result is
//!    simplified once more.
//!
//! If a pass ends with a tree whose children hash differently from the children of the tree it
//! started with, the result is a *candidate*: it may simplify further, so it goes through another
//! pass. Candidates are explored on a copy of the cache, and the loop stops at the first
//! candidate that was already seen, or that a pass leaves unchanged.
//!
//! Because that loop stops at the first repeat, a rewrite cycle (`x^-2` becomes `1/x^2`, which
//! becomes `(x^2)^(-1)`) would settle on whichever member it reached first. The result of a
//! whole simplification is therefore simplified again with an empty cache until a result
//! repeats, and the same member of the cycle is picked no matter where the cycle was entered.
//! This makes [`Simplifier::simplify`] idempotent.
//!
//! Both loops are bounded by [`SimplifyOptions::max_iterations`], and the nesting depth of the
//! walk by [`SimplifyOptions::max_depth`].
//!
//! ```
//! use fermat_compute::{operand::Operand, registry::Registry, symbolic::simplify::Simplifier};
//! use fermat_parser::parser::{ast::Expr, Parser};
//!
//! let registry = Registry::standard();
//! let ast = Parser::new("2 + 6 + 5*(x-x) + 6/y*y + 5^(z*z) - 12").try_parse_full::<Expr>().unwrap();
//! let operand = Operand::from_ast(&ast, &registry).unwrap();
//!
//! let simplified = Simplifier::new(&registry).simplify(&operand).unwrap();
//! assert_eq!(simplified.display(&registry).to_string(), "2 + 5^z^2");
//! ```

pub mod cache;
pub mod options;
pub mod rules;

pub use cache::{CacheEntry, SimplifyCache};
pub use options::{CollisionPolicy, SimplifyOptions, SimplifyOptionsBuilder};

use crate::{
    error::{DidNotConverge, EmptyFold, Error},
    operand::{BinaryGrouping, Operand},
    registry::{OpId, Registry, Role},
    symbolic::{
        fold::{fold, unfold},
        gather::gather,
        hash::{distance, hash, ExpressionHash},
        step::Step,
        step_collector::StepCollector,
    },
};
use log::{debug, trace};

/// The outcome of a single pass over a grouping.
enum Pass {
    /// The grouping is fully simplified.
    Settled(Operand),

    /// The grouping was rewritten into a candidate that may simplify further.
    Rewritten(Operand),
}

/// Simplifies expression trees using the operations of a [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct Simplifier<'a> {
    registry: &'a Registry,
    options: SimplifyOptions,
}

impl<'a> Simplifier<'a> {
    /// Creates a simplifier with the default options.
    pub fn new(registry: &'a Registry) -> Self {
        Self::with_options(registry, SimplifyOptions::default())
    }

    /// Creates a simplifier with the given options.
    pub fn with_options(registry: &'a Registry, options: SimplifyOptions) -> Self {
        Self { registry, options }
    }

    /// Returns the options of the simplifier.
    pub fn options(&self) -> &SimplifyOptions {
        &self.options
    }

    /// Simplifies the operand.
    pub fn simplify(&self, operand: &Operand) -> Result<Operand, Error> {
        self.simplify_with_cache(operand, &mut SimplifyCache::new())
    }

    /// Simplifies the operand, reusing and extending the given cache.
    ///
    /// Sharing a cache between calls makes repeated subexpressions simplify identically, but
    /// under [`CollisionPolicy::BestEffort`] it also lets hash collisions between the calls
    /// produce wrong results.
    pub fn simplify_with_cache(&self, operand: &Operand, cache: &mut SimplifyCache) -> Result<Operand, Error> {
        self.simplify_with_steps(operand, cache, &mut ())
    }

    /// Simplifies the operand, reusing and extending the given cache, and reporting every rule
    /// applied to the step collector.
    pub fn simplify_with_steps(
        &self,
        operand: &Operand,
        cache: &mut SimplifyCache,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Operand, Error> {
        let mut current = self.simplify_at(operand, cache, 0, step_collector)?;
        let mut orbit: Vec<Operand> = Vec::new();

        // resimplify from scratch until a result repeats, then settle on one member of the cycle
        let result = loop {
            if let Some(start) = orbit.iter().position(|seen| *seen == current) {
                break self.representative(&orbit[start..]).unwrap_or(current);
            }

            if orbit.len() > self.options.max_iterations {
                return Err(Error::spanless(DidNotConverge { limit: self.options.max_iterations, depth: false }));
            }

            let next = self.simplify_at(&current, &mut SimplifyCache::new(), 0, step_collector)?;
            orbit.push(current);
            current = next;
        };

        debug!("simplified {} into {}", operand.display(self.registry), result.display(self.registry));
        Ok(result)
    }

    /// Picks the member of a rewrite cycle that every entry into the cycle settles on: the one
    /// with the shortest hash, then the smallest hash, then the smallest display text.
    fn representative(&self, cycle: &[Operand]) -> Option<Operand> {
        cycle
            .iter()
            .min_by_key(|member| {
                let ExpressionHash(tokens) = hash(member);
                (tokens.len(), tokens, member.display(self.registry).to_string())
            })
            .cloned()
    }

    /// Simplifies an operand found at the given nesting depth.
    fn simplify_at(
        &self,
        operand: &Operand,
        cache: &mut SimplifyCache,
        depth: usize,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Operand, Error> {
        if depth > self.options.max_depth {
            return Err(Error::spanless(DidNotConverge { limit: self.options.max_depth, depth: true }));
        }

        match operand.as_grouping() {
            Some(BinaryGrouping::Degenerate(inner)) => self.simplify_at(inner, cache, depth + 1, step_collector),
            Some(BinaryGrouping::Binary { .. }) => self.simplify_grouping(operand, cache, depth, step_collector),
            None => Ok(operand.clone()),
        }
    }

    /// Runs passes over a grouping until one settles, or until a candidate repeats.
    fn simplify_grouping(
        &self,
        node: &Operand,
        cache: &mut SimplifyCache,
        depth: usize,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Operand, Error> {
        let mut current = node.clone();
        let mut branch: Option<SimplifyCache> = None;
        let mut allow_lookup = true;
        let mut iterations = 0;

        loop {
            let active = match branch.as_mut() {
                Some(branch) => branch,
                None => &mut *cache,
            };

            let candidate = match self.pass(&current, active, allow_lookup, depth, step_collector)? {
                Pass::Settled(result) => {
                    cache.record(node.clone(), result.clone());
                    return Ok(result);
                },
                Pass::Rewritten(candidate) => candidate,
            };

            let seen = branch.as_ref().unwrap_or(&*cache).contains(&candidate);
            if seen || candidate == current {
                trace!("reached fixed point {}", candidate.display(self.registry));
                cache.record(node.clone(), candidate.clone());
                return Ok(candidate);
            }

            if iterations == self.options.max_iterations {
                return Err(Error::spanless(DidNotConverge { limit: self.options.max_iterations, depth: false }));
            }
            iterations += 1;

            trace!("rewrote {} into {}", current.display(self.registry), candidate.display(self.registry));
            let explored = branch.get_or_insert_with(|| cache.clone());
            explored.record(candidate.clone(), candidate.clone());
            current = candidate;
            allow_lookup = false;
        }
    }

    /// Simplifies a child of a grouping.
    fn child(
        &self,
        operand: &Operand,
        cache: &mut SimplifyCache,
        depth: usize,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Operand, Error> {
        self.simplify_at(operand, cache, depth + 1, step_collector)
    }

    /// Runs one pass over a non-degenerate grouping.
    fn pass(
        &self,
        node: &Operand,
        cache: &mut SimplifyCache,
        allow_lookup: bool,
        depth: usize,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Pass, Error> {
        if allow_lookup {
            if let Some(result) = cache.lookup(node, self.options.collision_policy) {
                trace!("cache hit for {}", node.display(self.registry));
                return Ok(Pass::Settled(result));
            }
        }

        let Some((op, node_left, node_right)) = node.as_binary() else {
            return Ok(Pass::Settled(node.clone()));
        };

        let focus = self.registry.focus(op);
        let rebuilt = if self.registry.is_commutative(focus) {
            let combined = self.combine_terms(focus, node, cache, depth, step_collector)?;
            let (combined_op, left, right) = match combined.as_grouping() {
                None => return self.child(&combined, cache, depth, step_collector).map(Pass::Settled),
                Some(BinaryGrouping::Degenerate(inner)) => {
                    return self.child(inner, cache, depth, step_collector).map(Pass::Settled);
                },
                Some(BinaryGrouping::Binary { op, left, right }) => (*op, left, right),
            };

            let left = self.child(left, cache, depth, step_collector)?;
            let right = self.child(right, cache, depth, step_collector)?;
            Operand::binary(combined_op, left, right)
        } else {
            let left = self.child(node_left, cache, depth, step_collector)?;
            let right = self.child(node_right, cache, depth, step_collector)?;
            Operand::binary(op, left, right)
        };

        if let Some((rebuilt_op, left, right)) = rebuilt.as_binary() {
            if left.is_constant() && right.is_constant() {
                step_collector.push(Step::EvaluateConstants);
                return self.registry.evaluate(rebuilt_op, left, right).map(Pass::Settled);
            }
        }

        cache.record(node.clone(), rebuilt.clone());

        let rewritten = rules::all(self.registry, &rebuilt, step_collector).unwrap_or(rebuilt);
        let Some((rewritten_op, left, right)) = rewritten.as_binary() else {
            return Ok(Pass::Settled(rewritten));
        };

        let left = self.child(left, cache, depth, step_collector)?;
        let right = self.child(right, cache, depth, step_collector)?;

        // a pass that moved the children is not known to be final
        let moved = distance(&hash(&left), &hash(node_left))
            .saturating_add(distance(&hash(&right), &hash(node_right)));

        let result = Operand::binary(rewritten_op, left, right);
        if moved == 0 {
            Ok(Pass::Settled(result))
        } else {
            Ok(Pass::Rewritten(result))
        }
    }

    /// Flattens a grouping along its focus, folds its constant terms, and simplifies or gathers
    /// the rest, returning the recombined tree.
    fn combine_terms(
        &self,
        focus: OpId,
        node: &Operand,
        cache: &mut SimplifyCache,
        depth: usize,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Operand, Error> {
        let (constants, unresolved): (Vec<_>, Vec<_>) = unfold(self.registry, focus, node)?
            .into_iter()
            .partition(Operand::is_constant);

        let mut constant = if constants.is_empty() {
            None
        } else {
            Some(fold(self.registry, focus, constants)?)
        };

        let residue = match unresolved.len() {
            0 => None,
            1 => Some(self.child(&unresolved[0], cache, depth, step_collector)?),
            count => {
                let gathered = gather(self.registry, focus, unresolved)?;
                if gathered.len() < count {
                    step_collector.push(match self.registry.role(focus) {
                        Some(Role::Product) => Step::CombineLikeFactors,
                        _ => Step::CombineLikeTerms,
                    });
                }
                Some(fold(self.registry, focus, gathered)?)
            },
        };

        // a residue that simplified to a constant joins the folded constant
        let residue = match (residue, constant.take()) {
            (Some(residue), Some(c)) if residue.is_constant() => {
                constant = Some(self.registry.evaluate(focus, &c, &residue)?);
                None
            },
            (residue, c) => {
                constant = c;
                residue
            },
        };

        match (constant, residue) {
            (Some(constant), Some(residue)) => Ok(Operand::binary(focus, constant, residue)),
            (Some(only), None) | (None, Some(only)) => Ok(only),
            (None, None) => Err(Error::spanless(EmptyFold)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::DivisionByZero, test_util::{int, parse, var, Ops}};
    use pretty_assertions::assert_eq;
    use super::*;

    fn simplify(input: &str) -> String {
        let registry = Registry::standard();
        let operand = parse(input, &registry);
        Simplifier::new(&registry).simplify(&operand).unwrap().display(&registry).to_string()
    }

    #[test]
    fn leaves_are_unchanged() {
        let registry = Registry::standard();
        let simplifier = Simplifier::new(&registry);
        assert_eq!(simplifier.simplify(&var("x")).unwrap(), var("x"));
        assert_eq!(simplifier.simplify(&int(3)).unwrap(), int(3));
        assert_eq!(simplifier.simplify(&Operand::Blank).unwrap(), Operand::Blank);
        assert_eq!(simplifier.simplify(&parse("((x))", &registry)).unwrap(), var("x"));
    }

    #[test]
    fn constant_folding() {
        assert_eq!(simplify("2 + 3"), "5");
        assert_eq!(simplify("2*3 + 4"), "10");
        assert_eq!(simplify("6/2"), "3.0");
        assert_eq!(simplify("2^10 - 24"), "1000");
    }

    #[test]
    fn identities() {
        assert_eq!(simplify("x + 0"), "x");
        assert_eq!(simplify("x*1"), "x");
        assert_eq!(simplify("x*0"), "0");
        assert_eq!(simplify("x^0"), "1");
        assert_eq!(simplify("x^1"), "x");
    }

    #[test]
    fn inverse_cancellation() {
        assert_eq!(simplify("x - x"), "0");
        assert_eq!(simplify("5*(x-x)"), "0");
        assert_eq!(simplify("6/y*y"), "6");
    }

    #[test]
    fn gathering() {
        assert_eq!(simplify("x + x"), "2*x");
        assert_eq!(simplify("x*x"), "x^2");
    }

    #[test]
    fn reciprocals() {
        assert_eq!(simplify("x^-1"), "x^(-1)");
        assert_eq!(simplify("1/x"), "x^(-1)");
        assert_eq!(simplify("x^-2"), "(x^2)^(-1)");
        assert_eq!(simplify("1/x^2"), "(x^2)^(-1)");
    }

    #[test]
    fn golden() {
        let registry = Registry::standard();
        let Ops { add, exp, .. } = Ops::of(&registry);
        let operand = parse("2 + 6 + 5*(x-x) + 6/y*y + 5^(z*z) - 12", &registry);
        let simplified = Simplifier::new(&registry).simplify(&operand).unwrap();

        assert_eq!(
            simplified,
            Operand::binary(add, int(2), Operand::binary(exp, int(5), Operand::binary(exp, var("z"), int(2)))),
        );
        assert_eq!(simplified.display(&registry).to_string(), "2 + 5^z^2");
    }

    #[test]
    fn idempotence() {
        let registry = Registry::standard();
        let simplifier = Simplifier::new(&registry);
        let inputs = [
            "x + x",
            "x*x",
            "2*3 + 4",
            "1/x",
            "(x*x)^(x*x)",
            "2 + 6 + 5*(x-x) + 6/y*y + 5^(z*z) - 12",
            "x^-2",
            "x^-0.5",
            "(x+y)^-2",
            "(x^-2)^-2",
            "1/x^2",
        ];

        for input in inputs {
            let once = simplifier.simplify(&parse(input, &registry)).unwrap();
            let twice = simplifier.simplify(&once).unwrap();
            assert_eq!(once, twice, "simplifying {} twice", input);
        }
    }

    #[test]
    fn long_sums() {
        assert_eq!(simplify(&vec!["x"; 3000].join(" + ")), "3000*x");
    }

    #[test]
    fn cycles_settle_on_one_member() {
        let registry = Registry::standard();
        let Ops { div, exp, .. } = Ops::of(&registry);
        let simplifier = Simplifier::new(&registry);
        let square = Operand::binary(exp, var("x"), int(2));
        let cycle = [
            Operand::binary(div, int(1), square.clone()),
            Operand::binary(exp, square.clone(), int(-1)),
        ];

        let forward = simplifier.representative(&cycle);
        let backward = simplifier.representative(&[cycle[1].clone(), cycle[0].clone()]);
        assert_eq!(forward, backward);
        assert_eq!(simplifier.representative(&[]), None);
    }

    #[test]
    fn repeated_subexpressions_simplify_identically() {
        let registry = Registry::standard();
        let Ops { exp, .. } = Ops::of(&registry);
        let simplified = Simplifier::new(&registry).simplify(&parse("(x*x)^(x*x)", &registry)).unwrap();

        let (op, left, right) = simplified.as_binary().unwrap();
        assert_eq!(op, exp);
        assert_eq!(left, right);
        assert_eq!(*left, Operand::binary(exp, var("x"), int(2)));
    }

    #[test]
    fn steps() {
        let registry = Registry::standard();
        let mut steps = Vec::new();
        Simplifier::new(&registry)
            .simplify_with_steps(&parse("x - x + y*1", &registry), &mut SimplifyCache::new(), &mut steps)
            .unwrap();

        assert!(steps.contains(&Step::CombineLikeTerms));
        assert!(steps.contains(&Step::MultiplyOne));
    }

    #[test]
    fn iteration_limit() {
        let registry = Registry::standard();
        let options = SimplifyOptionsBuilder::new().max_iterations(0).build();
        let err = Simplifier::with_options(&registry, options)
            .simplify(&parse("x^-1", &registry))
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<DidNotConverge>(),
            Some(&DidNotConverge { limit: 0, depth: false }),
        );
    }

    #[test]
    fn depth_limit() {
        let registry = Registry::standard();
        let options = SimplifyOptionsBuilder::new().max_depth(2).build();
        let err = Simplifier::with_options(&registry, options)
            .simplify(&parse("((((x))))", &registry))
            .unwrap_err();

        assert_eq!(
            err.downcast_ref::<DidNotConverge>(),
            Some(&DidNotConverge { limit: 2, depth: true }),
        );
    }

    #[test]
    fn evaluation_errors_propagate() {
        let registry = Registry::standard();
        let err = Simplifier::new(&registry).simplify(&parse("x + 1/0", &registry)).unwrap_err();
        assert!(err.is::<DivisionByZero>());
    }

    #[test]
    fn hash_collisions() {
        let registry = Registry::standard();
        let Ops { mul, .. } = Ops::of(&registry);
        let first = Operand::binary(mul, var("x"), int(121));
        let second = Operand::binary(mul, int(120), var("y"));

        let strict = Simplifier::new(&registry);
        let mut cache = SimplifyCache::new();
        strict.simplify_with_cache(&first, &mut cache).unwrap();
        assert_eq!(strict.simplify_with_cache(&second, &mut cache).unwrap().display(&registry).to_string(), "120*y");

        // the best-effort policy reuses the result cached for `x*121`
        let options = SimplifyOptionsBuilder::new().collision_policy(CollisionPolicy::BestEffort).build();
        let best_effort = Simplifier::with_options(&registry, options);
        let mut cache = SimplifyCache::new();
        best_effort.simplify_with_cache(&first, &mut cache).unwrap();
        assert_eq!(best_effort.simplify_with_cache(&second, &mut cache).unwrap().display(&registry).to_string(), "121*x");
    }
}
