//! Automatic tautology check.
//!
//! Unlike the interactive [`Tableau`](crate::tableau::Tableau) this works on
//! flat branch lists with no path bookkeeping: a reduced formula is replaced
//! by its expansion and never reconsidered, so no applied-set is needed.

use crate::logic::reduce::{reduce, Reduction};
use crate::logic::{is_contradiction_pair, Formula};

fn has_contradiction(branch: &[Formula]) -> bool {
    if branch.iter().any(|f| matches!(f, Formula::Bot)) {
        return true;
    }

    for (i, f1) in branch.iter().enumerate() {
        for f2 in &branch[i + 1..] {
            if is_contradiction_pair(f1, f2) {
                return true;
            }
        }
    }

    false
}

fn first_reducible(branch: &[Formula]) -> Option<(usize, Reduction)> {
    branch
        .iter()
        .enumerate()
        .find_map(|(i, f)| reduce(f).ok().map(|r| (i, r)))
}

/// Decides whether `f` holds under every assignment by expanding the tableau
/// for `¬f` to exhaustion: `f` is a tautology iff every branch closes.
///
/// Branches are explored depth first, always expanding the first reducible
/// formula in slot order; a fully expanded open branch is a countermodel and
/// ends the search immediately.
pub fn is_tautology(f: &Formula) -> bool {
    let mut branches: Vec<Vec<Formula>> = vec![vec![Formula::not(f.clone())]];

    while let Some(mut branch) = branches.pop() {
        if has_contradiction(&branch) {
            continue;
        }
        match first_reducible(&branch) {
            None => return false,
            Some((i, Reduction::Conjunctive(conjuncts))) => {
                branch.splice(i..=i, conjuncts);
                branches.push(branch);
            }
            Some((i, Reduction::Disjunctive(first, second))) => {
                let mut fork = branch.clone();
                branch[i] = first;
                fork[i] = second;
                branches.push(fork);
                branches.push(branch);
            }
        }
    }

    true
}
