use std::fmt;

use super::Formula;

/// Outcome of expanding a formula by its tableau rule.
///
/// Conjunctive results all hold on the branch the rule is applied to;
/// disjunctive results split the branch in two, one per disjunct. The
/// disjunctive case is the only source of branching in a tableau.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduction {
    Conjunctive(Vec<Formula>),
    Disjunctive(Formula, Formula),
}

/// `reduce` was invoked on a literal (`Var`, `Bot`, `Top` or `Not(Var)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotReducible;

impl fmt::Display for NotReducible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "formula is not reducible")
    }
}

impl Formula {
    /// Whether the formula has an expansion rule. Literals — atoms, the
    /// constants and directly negated atoms — do not.
    pub fn reducible(&self) -> bool {
        match self {
            Formula::Var(_) | Formula::Bot | Formula::Top => false,
            Formula::Not(arg) => !matches!(**arg, Formula::Var(_)),
            _ => true,
        }
    }
}

/// Expands a formula by the unique rule matching its shape.
pub fn reduce(f: &Formula) -> Result<Reduction, NotReducible> {
    use Formula::*;
    Ok(match f {
        Var(_) | Bot | Top => return Err(NotReducible),
        And(l, r) => Reduction::Conjunctive(vec![(**l).clone(), (**r).clone()]),
        Or(l, r) => Reduction::Disjunctive((**l).clone(), (**r).clone()),
        Impl(l, r) => Reduction::Disjunctive(Formula::not((**l).clone()), (**r).clone()),
        Not(arg) => match &**arg {
            Var(_) => return Err(NotReducible),
            Not(a) => Reduction::Conjunctive(vec![(**a).clone()]),
            And(l, r) => Reduction::Disjunctive(
                Formula::not((**l).clone()),
                Formula::not((**r).clone()),
            ),
            Or(l, r) => Reduction::Conjunctive(vec![
                Formula::not((**l).clone()),
                Formula::not((**r).clone()),
            ]),
            Impl(l, r) => {
                Reduction::Conjunctive(vec![(**l).clone(), Formula::not((**r).clone())])
            }
            Bot => Reduction::Conjunctive(vec![Top]),
            Top => Reduction::Conjunctive(vec![Bot]),
        },
    })
}

fn negates(f1: &Formula, f2: &Formula) -> bool {
    matches!(f2, Formula::Not(arg) if **arg == *f1)
}

/// Whether one formula is the structural negation of the other. `Bot` on a
/// branch is a contradiction on its own and is not covered here.
pub fn is_contradiction_pair(f1: &Formula, f2: &Formula) -> bool {
    negates(f1, f2) || negates(f2, f1)
}
