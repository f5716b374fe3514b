use std::collections::{BTreeSet, HashMap};
use std::fmt;

use rand::prelude::*;

use super::Formula;
use crate::solver::is_tautology;

pub type RandomResult<T> = Result<T, Err>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Err {
    NoVariables,
}

impl fmt::Display for Err {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Err::NoVariables => write!(
                f,
                "cannot sample constant-free leaves from an empty variable pool"
            ),
        }
    }
}

const ALPHABET_LEN: u8 = 26;
// Sampled variables are named p, q, r, ... so that small formulas read the
// way hand-written examples do.
const FIRST_LETTER: u8 = b'p';

/// Samples a formula whose tree has exactly `depth` levels of connectives on
/// every root-to-leaf path. Inner nodes are drawn uniformly from
/// and/or/implies/not; leaves are drawn from `var_bound` variables plus, when
/// `no_constants` is unset, the two constants.
///
/// Variables actually used are renamed to a dense canonical sequence, so the
/// output is independent of which raw indices the RNG happened to pick.
pub fn random_formula<R: Rng + ?Sized>(
    rng: &mut R,
    var_bound: u32,
    depth: u32,
    no_constants: bool,
) -> RandomResult<Formula> {
    if no_constants && var_bound == 0 {
        return Err(Err::NoVariables);
    }

    let mut used = BTreeSet::new();
    let raw = sample(rng, var_bound, depth, no_constants, &mut used);

    let names: HashMap<String, String> = used
        .iter()
        .enumerate()
        .map(|(rank, idx)| (idx.to_string(), canonical_name(rank)))
        .collect();

    Ok(rename(raw, &names))
}

/// Resamples via [`random_formula`] until a tautology turns up, giving up
/// after `max_attempts` tries. `None` is the ordinary no-luck outcome of a
/// probabilistic search, not an error.
pub fn random_tautology<R: Rng + ?Sized>(
    rng: &mut R,
    var_bound: u32,
    depth: u32,
    no_constants: bool,
    max_attempts: u32,
) -> RandomResult<Option<Formula>> {
    for _ in 0..max_attempts {
        let f = random_formula(rng, var_bound, depth, no_constants)?;
        if is_tautology(&f) {
            return Ok(Some(f));
        }
    }
    Ok(None)
}

fn sample<R: Rng + ?Sized>(
    rng: &mut R,
    var_bound: u32,
    depth: u32,
    no_constants: bool,
    used: &mut BTreeSet<u32>,
) -> Formula {
    if depth == 0 {
        let idx = if no_constants {
            rng.gen_range(0..var_bound)
        } else {
            match rng.gen_range(0..var_bound + 2) {
                0 => return Formula::Bot,
                1 => return Formula::Top,
                r => r - 2,
            }
        };
        used.insert(idx);
        return Formula::Var(idx.to_string());
    }

    match rng.gen_range(0..4) {
        0 => Formula::and(
            sample(rng, var_bound, depth - 1, no_constants, used),
            sample(rng, var_bound, depth - 1, no_constants, used),
        ),
        1 => Formula::or(
            sample(rng, var_bound, depth - 1, no_constants, used),
            sample(rng, var_bound, depth - 1, no_constants, used),
        ),
        2 => Formula::implies(
            sample(rng, var_bound, depth - 1, no_constants, used),
            sample(rng, var_bound, depth - 1, no_constants, used),
        ),
        _ => Formula::not(sample(rng, var_bound, depth - 1, no_constants, used)),
    }
}

// Rank 0 maps to the first letter, later ranks walk the alphabet cyclically
// and gain a tick mark per completed cycle: p, q, ..., z, a, ..., o, p', ...
fn canonical_name(rank: usize) -> String {
    let offset = (FIRST_LETTER - b'a') as usize + rank % ALPHABET_LEN as usize;
    let letter = (b'a' + (offset % ALPHABET_LEN as usize) as u8) as char;
    let ticks = rank / ALPHABET_LEN as usize;
    let mut name = letter.to_string();
    name.push_str(&"'".repeat(ticks));
    name
}

fn rename(f: Formula, names: &HashMap<String, String>) -> Formula {
    match f {
        Formula::Var(raw) => match names.get(&raw) {
            Some(name) => Formula::Var(name.clone()),
            None => Formula::Var(raw),
        },
        Formula::Not(arg) => Formula::not(rename(*arg, names)),
        Formula::And(l, r) => Formula::and(rename(*l, names), rename(*r, names)),
        Formula::Or(l, r) => Formula::or(rename(*l, names), rename(*r, names)),
        Formula::Impl(l, r) => Formula::implies(rename(*l, names), rename(*r, names)),
        Formula::Bot => Formula::Bot,
        Formula::Top => Formula::Top,
    }
}
