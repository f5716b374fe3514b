pub mod calculus;

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::logic::reduce::{self, Reduction};
use crate::logic::{is_contradiction_pair, Formula};

pub type TabResult<T> = Result<T, Err>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Err {
    InvalidPath(char),
    IndexOutOfBounds(TableauIndex),
    InvalidFormula(FormulaIndex),
    TargetNotLeaf(TableauIndex),
    AlreadyApplied(FormulaIndex),
    NotReducible(FormulaIndex),
    NotBot(FormulaIndex),
    NotContradiction(FormulaIndex, FormulaIndex),
    NotSameBranch(TableauIndex, TableauIndex),
}

impl fmt::Display for Err {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Err::InvalidPath(c) => write!(f, "'{}' is not a valid branch marker", c),
            Err::IndexOutOfBounds(idx) => {
                write!(f, "Tableau index '{}' references a node past a leaf", idx)
            }
            Err::InvalidFormula(idx) => write!(f, "No formula at index '{}'", idx),
            Err::TargetNotLeaf(idx) => write!(f, "Tableau index '{}' is not a branch leaf", idx),
            Err::AlreadyApplied(idx) => write!(
                f,
                "Formula '{}' has already been applied on the given branch",
                idx
            ),
            Err::NotReducible(idx) => write!(f, "Formula '{}' is not reducible", idx),
            Err::NotBot(idx) => write!(f, "Formula '{}' is not the constant ⊥", idx),
            Err::NotContradiction(idx1, idx2) => write!(
                f,
                "Formulas '{}' and '{}' are not a contradiction pair",
                idx1, idx2
            ),
            Err::NotSameBranch(idx1, idx2) => write!(
                f,
                "Tableau indices '{}' and '{}' do not share a branch",
                idx1, idx2
            ),
        }
    }
}

/// One step down a binary branch split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "L"),
            Side::Right => write!(f, "R"),
        }
    }
}

/// A root-to-node path, written as a word over `L`/`R`; the empty word is
/// the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TableauIndex(Vec<Side>);

impl TableauIndex {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sides(&self) -> &[Side] {
        &self.0
    }

    pub fn child(&self, side: Side) -> Self {
        let mut sides = self.0.clone();
        sides.push(side);
        TableauIndex(sides)
    }

    /// Whether `prefix` lies on the path from the root to this node
    /// (inclusive).
    pub fn starts_with(&self, prefix: &TableauIndex) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// All proper prefixes, nearest (longest) first, ending with the root.
    pub fn ancestors(&self) -> Vec<TableauIndex> {
        (0..self.0.len())
            .rev()
            .map(|i| TableauIndex(self.0[..i].to_vec()))
            .collect()
    }
}

impl fmt::Display for TableauIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for side in &self.0 {
            write!(f, "{}", side)?;
        }
        Ok(())
    }
}

impl FromStr for TableauIndex {
    type Err = Err;

    fn from_str(s: &str) -> TabResult<Self> {
        s.chars()
            .map(|c| match c {
                'L' => Ok(Side::Left),
                'R' => Ok(Side::Right),
                _ => Err(Err::InvalidPath(c)),
            })
            .collect::<TabResult<Vec<Side>>>()
            .map(TableauIndex)
    }
}

impl Serialize for TableauIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TableauIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IndexVisitor;

        impl Visitor<'_> for IndexVisitor {
            type Value = TableauIndex;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string over the branch markers 'L' and 'R'")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse().map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_str(IndexVisitor)
    }
}

/// Addresses one formula slot in one node: the node's path plus the slot
/// position in that node's insertion-ordered formula list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormulaIndex {
    pub tableau: TableauIndex,
    pub formula: usize,
}

impl FormulaIndex {
    pub fn new(tableau: TableauIndex, formula: usize) -> Self {
        Self { tableau, formula }
    }
}

impl fmt::Display for FormulaIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tableau, self.formula)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Children {
    left: Rc<Tableau>,
    right: Rc<Tableau>,
}

/// An immutable tableau node. Every update returns a new tree that shares
/// all untouched subtrees with its predecessor, so earlier proof states stay
/// valid and cheap to keep around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tableau {
    formulas: Vec<Formula>,
    applied: Vec<FormulaIndex>,
    is_closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Children>,
}

impl Tableau {
    /// A single open root node holding the goal formula.
    pub fn initial(formula: Formula) -> Self {
        Tableau {
            formulas: vec![formula],
            applied: vec![],
            is_closed: false,
            children: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    /// The node's formula slots in insertion order.
    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    /// Formulas already expanded on this branch.
    pub fn applied(&self) -> &[FormulaIndex] {
        &self.applied
    }

    pub fn children(&self) -> Option<(&Tableau, &Tableau)> {
        self.children.as_ref().map(|c| (&*c.left, &*c.right))
    }

    pub fn tableau_at(&self, idx: &TableauIndex) -> TabResult<&Tableau> {
        let mut node = self;
        for side in idx.sides() {
            let c = node
                .children
                .as_ref()
                .ok_or_else(|| Err::IndexOutOfBounds(idx.clone()))?;
            node = match side {
                Side::Left => &c.left,
                Side::Right => &c.right,
            };
        }
        Ok(node)
    }

    pub fn formula_at(&self, idx: &FormulaIndex) -> TabResult<&Formula> {
        self.tableau_at(&idx.tableau)?
            .formulas
            .get(idx.formula)
            .ok_or_else(|| Err::InvalidFormula(idx.clone()))
    }

    /// Every leaf of the tree, left to right, with its path.
    pub fn leaves(&self) -> Vec<(TableauIndex, &Tableau)> {
        fn walk<'t>(
            node: &'t Tableau,
            path: TableauIndex,
            out: &mut Vec<(TableauIndex, &'t Tableau)>,
        ) {
            match node.children() {
                None => out.push((path, node)),
                Some((l, r)) => {
                    walk(l, path.child(Side::Left), out);
                    walk(r, path.child(Side::Right), out);
                }
            }
        }

        let mut out = vec![];
        walk(self, TableauIndex::root(), &mut out);
        out
    }

    /// The open leaves on which the given formula may still be expanded:
    /// descendants of (or equal to) the formula's own node that have not
    /// applied it yet. These are exactly the valid targets for
    /// [`reduce_formula`](Self::reduce_formula).
    pub fn applicable_branches(&self, idx: &FormulaIndex) -> Vec<TableauIndex> {
        self.leaves()
            .into_iter()
            .filter(|(path, leaf)| {
                !leaf.is_closed && path.starts_with(&idx.tableau) && !leaf.applied.contains(idx)
            })
            .map(|(path, _)| path)
            .collect()
    }

    /// True once no open branch can still use the formula; the UI greys the
    /// formula out at that point.
    pub fn is_formula_fully_applied(&self, idx: &FormulaIndex) -> bool {
        self.applicable_branches(idx).is_empty()
    }

    /// The paths of all nodes strictly below `idx`, in left-to-right
    /// pre-order.
    pub fn descendants(&self, idx: &TableauIndex) -> TabResult<Vec<TableauIndex>> {
        fn walk(node: &Tableau, base: &TableauIndex, out: &mut Vec<TableauIndex>) {
            if let Some((l, r)) = node.children() {
                let li = base.child(Side::Left);
                let ri = base.child(Side::Right);
                out.push(li.clone());
                walk(l, &li, out);
                out.push(ri.clone());
                walk(r, &ri, out);
            }
        }

        let node = self.tableau_at(idx)?;
        let mut out = vec![];
        walk(node, idx, &mut out);
        Ok(out)
    }

    /// Expands the formula at `formula_idx` onto the leaf at `target`.
    ///
    /// Conjunctive expansions append to the leaf's formula list and record
    /// the source formula as applied there. Disjunctive expansions replace
    /// the leaf with two single-formula children, each inheriting the leaf's
    /// applied set plus the source formula.
    pub fn reduce_formula(
        &self,
        formula_idx: &FormulaIndex,
        target: &TableauIndex,
    ) -> TabResult<Tableau> {
        if !target.starts_with(&formula_idx.tableau) {
            return Err(Err::NotSameBranch(
                formula_idx.tableau.clone(),
                target.clone(),
            ));
        }

        let formula = self.formula_at(formula_idx)?.clone();
        let reduction =
            reduce::reduce(&formula).map_err(|_| Err::NotReducible(formula_idx.clone()))?;

        self.update_at(target, |leaf| {
            if !leaf.is_leaf() {
                return Err(Err::TargetNotLeaf(target.clone()));
            }
            if leaf.applied.contains(formula_idx) {
                return Err(Err::AlreadyApplied(formula_idx.clone()));
            }

            Ok(match reduction {
                Reduction::Conjunctive(conjuncts) => {
                    let mut formulas = leaf.formulas.clone();
                    formulas.extend(conjuncts);
                    let mut applied = leaf.applied.clone();
                    applied.push(formula_idx.clone());
                    Tableau {
                        formulas,
                        applied,
                        is_closed: leaf.is_closed,
                        children: None,
                    }
                }
                Reduction::Disjunctive(first, second) => {
                    let mut applied = leaf.applied.clone();
                    applied.push(formula_idx.clone());
                    let branch = |f: Formula| {
                        Rc::new(Tableau {
                            formulas: vec![f],
                            applied: applied.clone(),
                            is_closed: leaf.is_closed,
                            children: None,
                        })
                    };
                    Tableau {
                        formulas: leaf.formulas.clone(),
                        applied: leaf.applied.clone(),
                        is_closed: leaf.is_closed,
                        children: Some(Children {
                            left: branch(first),
                            right: branch(second),
                        }),
                    }
                }
            })
        })
    }

    /// Closes the branch holding the referenced formula, which must be the
    /// constant ⊥.
    pub fn close_branch_with_bot(&self, idx: &FormulaIndex) -> TabResult<Tableau> {
        let formula = self.formula_at(idx)?;
        if *formula != Formula::Bot {
            return Err(Err::NotBot(idx.clone()));
        }
        self.close_branch(&idx.tableau)
    }

    /// Closes a branch carrying two formulas that structurally contradict
    /// each other. The two indices must share a branch; the branch of the
    /// deeper one is closed.
    pub fn close_branch_with_contradiction(
        &self,
        idx1: &FormulaIndex,
        idx2: &FormulaIndex,
    ) -> TabResult<Tableau> {
        let deeper = if idx2.tableau.starts_with(&idx1.tableau) {
            idx2
        } else if idx1.tableau.starts_with(&idx2.tableau) {
            idx1
        } else {
            return Err(Err::NotSameBranch(
                idx1.tableau.clone(),
                idx2.tableau.clone(),
            ));
        };

        let f1 = self.formula_at(idx1)?;
        let f2 = self.formula_at(idx2)?;
        if !is_contradiction_pair(f1, f2) {
            return Err(Err::NotContradiction(idx1.clone(), idx2.clone()));
        }

        self.close_branch(&deeper.tableau)
    }

    // Marks the node at `idx` closed, force-closing any still-open subtree
    // below it, then walks the ancestors nearest-first and closes each one
    // whose children are now both closed, stopping at the first that is not.
    // A set flag is never unset.
    fn close_branch(&self, idx: &TableauIndex) -> TabResult<Tableau> {
        let mut closed = self.update_at(idx, |node| Ok(node.close_subtree()))?;

        for ancestor in idx.ancestors() {
            let node = closed.tableau_at(&ancestor)?;
            let both_closed = match node.children() {
                Some((l, r)) => l.is_closed && r.is_closed,
                None => break,
            };
            if !both_closed {
                break;
            }
            closed = closed.update_at(&ancestor, |node| Ok(node.closed_copy()))?;
        }

        Ok(closed)
    }

    fn close_subtree(&self) -> Tableau {
        let children = self.children.as_ref().map(|c| Children {
            left: if c.left.is_closed {
                Rc::clone(&c.left)
            } else {
                Rc::new(c.left.close_subtree())
            },
            right: if c.right.is_closed {
                Rc::clone(&c.right)
            } else {
                Rc::new(c.right.close_subtree())
            },
        });
        Tableau {
            formulas: self.formulas.clone(),
            applied: self.applied.clone(),
            is_closed: true,
            children,
        }
    }

    fn closed_copy(&self) -> Tableau {
        Tableau {
            formulas: self.formulas.clone(),
            applied: self.applied.clone(),
            is_closed: true,
            children: self.children.clone(),
        }
    }

    // Rebuilds the spine from the root down to `idx`, applying `f` to the
    // addressed node; all subtrees off the spine are shared by reference.
    fn update_at<F>(&self, idx: &TableauIndex, f: F) -> TabResult<Tableau>
    where
        F: FnOnce(&Tableau) -> TabResult<Tableau>,
    {
        self.update_rec(idx, 0, f)
    }

    fn update_rec<F>(&self, idx: &TableauIndex, depth: usize, f: F) -> TabResult<Tableau>
    where
        F: FnOnce(&Tableau) -> TabResult<Tableau>,
    {
        let side = match idx.sides().get(depth) {
            None => return f(self),
            Some(side) => side,
        };
        let c = self
            .children
            .as_ref()
            .ok_or_else(|| Err::IndexOutOfBounds(idx.clone()))?;
        let children = match side {
            Side::Left => Children {
                left: Rc::new(c.left.update_rec(idx, depth + 1, f)?),
                right: Rc::clone(&c.right),
            },
            Side::Right => Children {
                left: Rc::clone(&c.left),
                right: Rc::new(c.right.update_rec(idx, depth + 1, f)?),
            },
        };
        Ok(Tableau {
            formulas: self.formulas.clone(),
            applied: self.applied.clone(),
            is_closed: self.is_closed,
            children: Some(children),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p() -> Formula {
        Formula::var("p")
    }

    fn q() -> Formula {
        Formula::var("q")
    }

    fn path(s: &str) -> TableauIndex {
        s.parse().unwrap()
    }

    fn idx(s: &str, slot: usize) -> FormulaIndex {
        FormulaIndex::new(path(s), slot)
    }

    mod paths {
        use super::*;

        #[test]
        fn parse_and_display() {
            assert!(path("").is_root());
            assert_eq!("LRL", path("LRL").to_string());
            assert_eq!("", TableauIndex::root().to_string());
            assert_eq!(3, path("LRL").len());
        }

        #[test]
        fn rejects_unknown_markers() {
            assert_eq!(Err::InvalidPath('x'), "Lx".parse::<TableauIndex>().unwrap_err());
            assert_eq!(Err::InvalidPath('l'), "l".parse::<TableauIndex>().unwrap_err());
        }

        #[test]
        fn ancestors_nearest_first() {
            let expected = vec![path("LR"), path("L"), path("")];
            assert_eq!(expected, path("LRL").ancestors());
            assert!(TableauIndex::root().ancestors().is_empty());
        }

        #[test]
        fn prefix_relation() {
            assert!(path("LRL").starts_with(&path("LR")));
            assert!(path("LRL").starts_with(&TableauIndex::root()));
            assert!(path("L").starts_with(&path("L")));
            assert!(!path("LRL").starts_with(&path("R")));
            assert!(!path("L").starts_with(&path("LR")));
        }

        #[test]
        fn serde_as_string() {
            let idx = path("LLR");
            let json = serde_json::to_string(&idx).unwrap();
            assert_eq!("\"LLR\"", json);
            assert_eq!(idx, serde_json::from_str::<TableauIndex>(&json).unwrap());
            assert!(serde_json::from_str::<TableauIndex>("\"LQ\"").is_err());
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn root_of_single_node() {
            let t = Tableau::initial(p());
            assert!(t.is_leaf());
            assert!(!t.is_closed());
            assert_eq!(&[p()][..], t.tableau_at(&TableauIndex::root()).unwrap().formulas());
        }

        #[test]
        fn walking_past_a_leaf_fails() {
            let t = Tableau::initial(p());
            assert_eq!(
                Err::IndexOutOfBounds(path("L")),
                t.tableau_at(&path("L")).unwrap_err()
            );
        }

        #[test]
        fn formula_lookup() {
            let t = Tableau::initial(Formula::and(p(), q()));
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            assert_eq!(&p(), t.formula_at(&idx("", 1)).unwrap());
            assert_eq!(&q(), t.formula_at(&idx("", 2)).unwrap());
            assert_eq!(
                Err::InvalidFormula(idx("", 3)),
                t.formula_at(&idx("", 3)).unwrap_err()
            );
        }

        #[test]
        fn leaves_left_to_right() {
            let f = Formula::or(Formula::Bot, Formula::or(Formula::Bot, Formula::Bot));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("R", 0), &path("R")).unwrap();
            let leaf_paths: Vec<String> =
                t.leaves().iter().map(|(p, _)| p.to_string()).collect();
            assert_eq!(vec!["L", "RL", "RR"], leaf_paths);
        }

        #[test]
        fn descendants_of_inner_node() {
            let f = Formula::or(Formula::Bot, Formula::or(Formula::Bot, Formula::Bot));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("R", 0), &path("R")).unwrap();

            assert_eq!(
                vec![path("L"), path("R"), path("RL"), path("RR")],
                t.descendants(&TableauIndex::root()).unwrap()
            );
            assert_eq!(
                vec![path("RL"), path("RR")],
                t.descendants(&path("R")).unwrap()
            );
            assert!(t.descendants(&path("L")).unwrap().is_empty());
            assert_eq!(
                Err::IndexOutOfBounds(path("LL")),
                t.descendants(&path("LL")).unwrap_err()
            );
        }
    }

    mod reduce {
        use super::*;

        #[test]
        fn conjunctive_appends_to_branch() {
            let t = Tableau::initial(Formula::and(p(), q()));
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();

            assert!(t.is_leaf());
            assert_eq!(&[Formula::and(p(), q()), p(), q()][..], t.formulas());
            assert_eq!(&[idx("", 0)][..], t.applied());
        }

        #[test]
        fn double_negation_appends_single_conjunct() {
            let t = Tableau::initial(Formula::not(Formula::not(p())));
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            assert_eq!(&[Formula::not(Formula::not(p())), p()][..], t.formulas());
        }

        #[test]
        fn disjunctive_splits_branch() {
            let t = Tableau::initial(Formula::or(p(), q()));
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();

            assert!(!t.is_leaf());
            // the split node itself is untouched
            assert_eq!(&[Formula::or(p(), q())][..], t.formulas());
            assert!(t.applied().is_empty());

            let (l, r) = t.children().unwrap();
            assert_eq!(&[p()][..], l.formulas());
            assert_eq!(&[q()][..], r.formulas());
            // both children inherit the just-applied formula
            assert_eq!(&[idx("", 0)][..], l.applied());
            assert_eq!(&[idx("", 0)][..], r.applied());
        }

        #[test]
        fn implication_splits_into_negation_and_consequent() {
            let t = Tableau::initial(Formula::implies(p(), q()));
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let (l, r) = t.children().unwrap();
            assert_eq!(&[Formula::not(p())][..], l.formulas());
            assert_eq!(&[q()][..], r.formulas());
        }

        #[test]
        fn applying_twice_on_a_branch_fails() {
            let t = Tableau::initial(Formula::and(p(), q()));
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            assert_eq!(
                Err::AlreadyApplied(idx("", 0)),
                t.reduce_formula(&idx("", 0), &TableauIndex::root())
                    .unwrap_err()
            );
        }

        #[test]
        fn target_must_be_a_leaf() {
            let t = Tableau::initial(Formula::or(p(), q()));
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            assert_eq!(
                Err::TargetNotLeaf(TableauIndex::root()),
                t.reduce_formula(&idx("", 0), &TableauIndex::root())
                    .unwrap_err()
            );
        }

        #[test]
        fn target_must_be_below_the_formula() {
            let f = Formula::or(Formula::and(p(), q()), Formula::and(q(), p()));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            assert_eq!(
                Err::NotSameBranch(path("L"), path("R")),
                t.reduce_formula(&idx("L", 0), &path("R")).unwrap_err()
            );
        }

        #[test]
        fn literals_are_not_reducible() {
            let t = Tableau::initial(p());
            assert_eq!(
                Err::NotReducible(idx("", 0)),
                t.reduce_formula(&idx("", 0), &TableauIndex::root())
                    .unwrap_err()
            );
        }

        #[test]
        fn missing_formula_slot_fails() {
            let t = Tableau::initial(p());
            assert_eq!(
                Err::InvalidFormula(idx("", 4)),
                t.reduce_formula(&idx("", 4), &TableauIndex::root())
                    .unwrap_err()
            );
        }
    }

    mod applicable {
        use super::*;

        // root slots: 0 the conjunction, 1 = p | q, 2 = !!p
        fn conj_disj_tree() -> Tableau {
            let f = Formula::and(Formula::or(p(), q()), Formula::not(Formula::not(p())));
            let t = Tableau::initial(f);
            t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap()
        }

        #[test]
        fn split_consumes_the_formula_everywhere() {
            let t = conj_disj_tree();
            let t = t.reduce_formula(&idx("", 1), &TableauIndex::root()).unwrap();
            assert!(t.applicable_branches(&idx("", 1)).is_empty());
            assert!(t.is_formula_fully_applied(&idx("", 1)));
        }

        #[test]
        fn applying_on_one_branch_keeps_the_other() {
            let t = conj_disj_tree();
            let t = t.reduce_formula(&idx("", 1), &TableauIndex::root()).unwrap();

            assert_eq!(vec![path("L"), path("R")], t.applicable_branches(&idx("", 2)));

            let t = t.reduce_formula(&idx("", 2), &path("L")).unwrap();
            assert_eq!(vec![path("R")], t.applicable_branches(&idx("", 2)));
            assert!(!t.is_formula_fully_applied(&idx("", 2)));

            let t = t.reduce_formula(&idx("", 2), &path("R")).unwrap();
            assert!(t.is_formula_fully_applied(&idx("", 2)));
        }

        #[test]
        fn splitting_excludes_new_descendants() {
            let f = Formula::and(Formula::or(p(), q()), Formula::or(q(), p()));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("", 1), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("", 2), &path("L")).unwrap();

            // the leaves LL and LR both inherited the application of slot 2
            assert_eq!(vec![path("R")], t.applicable_branches(&idx("", 2)));
        }

        #[test]
        fn closed_branches_are_excluded() {
            let f = Formula::and(
                Formula::or(Formula::Bot, q()),
                Formula::not(Formula::not(p())),
            );
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("", 1), &TableauIndex::root()).unwrap();
            let t = t.close_branch_with_bot(&idx("L", 0)).unwrap();

            assert_eq!(vec![path("R")], t.applicable_branches(&idx("", 2)));
        }

        #[test]
        fn branches_outside_the_formula_subtree_are_excluded() {
            let f = Formula::or(Formula::and(p(), q()), Formula::and(q(), p()));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();

            assert_eq!(vec![path("L")], t.applicable_branches(&idx("L", 0)));
            assert_eq!(vec![path("R")], t.applicable_branches(&idx("R", 0)));
        }
    }

    mod close {
        use super::*;

        #[test]
        fn bot_closes_its_branch() {
            let f = Formula::or(Formula::Bot, q());
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.close_branch_with_bot(&idx("L", 0)).unwrap();

            assert!(t.tableau_at(&path("L")).unwrap().is_closed());
            assert!(!t.tableau_at(&path("R")).unwrap().is_closed());
            assert!(!t.is_closed());
        }

        #[test]
        fn bot_close_requires_bot() {
            let t = Tableau::initial(p());
            assert_eq!(
                Err::NotBot(idx("", 0)),
                t.close_branch_with_bot(&idx("", 0)).unwrap_err()
            );
        }

        #[test]
        fn contradiction_within_one_node() {
            let f = Formula::and(p(), Formula::not(p()));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t
                .close_branch_with_contradiction(&idx("", 1), &idx("", 2))
                .unwrap();
            assert!(t.is_closed());
        }

        #[test]
        fn contradiction_closes_the_deeper_branch() {
            let f = Formula::and(p(), Formula::or(q(), Formula::not(p())));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("", 2), &TableauIndex::root()).unwrap();

            let t = t
                .close_branch_with_contradiction(&idx("", 1), &idx("R", 0))
                .unwrap();
            assert!(t.tableau_at(&path("R")).unwrap().is_closed());
            assert!(!t.tableau_at(&path("L")).unwrap().is_closed());
            assert!(!t.is_closed());
        }

        #[test]
        fn contradiction_argument_order_is_irrelevant() {
            let f = Formula::and(p(), Formula::or(q(), Formula::not(p())));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("", 2), &TableauIndex::root()).unwrap();

            let a = t
                .close_branch_with_contradiction(&idx("", 1), &idx("R", 0))
                .unwrap();
            let b = t
                .close_branch_with_contradiction(&idx("R", 0), &idx("", 1))
                .unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn close_rejects_non_contradictions() {
            let f = Formula::and(p(), q());
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            assert_eq!(
                Err::NotContradiction(idx("", 1), idx("", 2)),
                t.close_branch_with_contradiction(&idx("", 1), &idx("", 2))
                    .unwrap_err()
            );
        }

        #[test]
        fn close_rejects_unrelated_branches() {
            let f = Formula::or(p(), Formula::not(p()));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            assert_eq!(
                Err::NotSameBranch(path("L"), path("R")),
                t.close_branch_with_contradiction(&idx("L", 0), &idx("R", 0))
                    .unwrap_err()
            );
        }

        #[test]
        fn parent_closes_when_both_children_close() {
            let f = Formula::or(Formula::Bot, Formula::Bot);
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();

            let t = t.close_branch_with_bot(&idx("L", 0)).unwrap();
            assert!(!t.is_closed());

            let t = t.close_branch_with_bot(&idx("R", 0)).unwrap();
            assert!(t.is_closed());
        }

        #[test]
        fn closure_propagates_up_a_chain() {
            let f = Formula::or(Formula::Bot, Formula::or(Formula::Bot, Formula::Bot));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("R", 0), &path("R")).unwrap();

            let t = t.close_branch_with_bot(&idx("L", 0)).unwrap();
            let t = t.close_branch_with_bot(&idx("RL", 0)).unwrap();
            assert!(!t.tableau_at(&path("R")).unwrap().is_closed());
            assert!(!t.is_closed());
            // L stays closed across unrelated operations
            assert!(t.tableau_at(&path("L")).unwrap().is_closed());

            let t = t.close_branch_with_bot(&idx("RR", 0)).unwrap();
            assert!(t.tableau_at(&path("R")).unwrap().is_closed());
            assert!(t.is_closed());
        }

        #[test]
        fn closing_an_inner_node_force_closes_its_subtree() {
            let f = Formula::and(Formula::Bot, Formula::or(p(), q()));
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("", 2), &TableauIndex::root()).unwrap();

            // the bot sits on the root node, whose branch has open children
            let t = t.close_branch_with_bot(&idx("", 1)).unwrap();
            assert!(t.is_closed());
            assert!(t.tableau_at(&path("L")).unwrap().is_closed());
            assert!(t.tableau_at(&path("R")).unwrap().is_closed());
        }
    }

    mod persistence {
        use super::*;

        #[test]
        fn commands_leave_the_receiver_untouched() {
            let f = Formula::or(Formula::Bot, q());
            let t1 = Tableau::initial(f);
            let t1 = t1.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();

            let t2 = t1.close_branch_with_bot(&idx("L", 0)).unwrap();
            assert!(!t1.tableau_at(&path("L")).unwrap().is_closed());
            assert!(t2.tableau_at(&path("L")).unwrap().is_closed());

            let t3 = t2.reduce_formula(&idx("R", 0), &path("R")).unwrap_err();
            // q is irreducible; the failed command changed nothing
            assert_eq!(Err::NotReducible(idx("R", 0)), t3);
            assert_eq!(&[q()][..], t2.tableau_at(&path("R")).unwrap().formulas());
        }

        #[test]
        fn untouched_subtrees_are_shared() {
            let f = Formula::or(Formula::and(p(), q()), Formula::and(q(), p()));
            let t1 = Tableau::initial(f);
            let t1 = t1.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();

            let t2 = t1.reduce_formula(&idx("L", 0), &path("L")).unwrap();

            let r1 = t1.tableau_at(&path("R")).unwrap();
            let r2 = t2.tableau_at(&path("R")).unwrap();
            assert!(std::ptr::eq(r1, r2));

            let l1 = t1.tableau_at(&path("L")).unwrap();
            let l2 = t2.tableau_at(&path("L")).unwrap();
            assert!(!std::ptr::eq(l1, l2));
        }
    }

    mod serde_round_trip {
        use super::*;

        #[test]
        fn tree_survives_json() {
            let f = Formula::and(Formula::or(Formula::Bot, q()), p());
            let t = Tableau::initial(f);
            let t = t.reduce_formula(&idx("", 0), &TableauIndex::root()).unwrap();
            let t = t.reduce_formula(&idx("", 1), &TableauIndex::root()).unwrap();
            let t = t.close_branch_with_bot(&idx("L", 0)).unwrap();

            let json = serde_json::to_string(&t).unwrap();
            let back: Tableau = serde_json::from_str(&json).unwrap();
            assert_eq!(t, back);
        }

        #[test]
        fn leaf_omits_children() {
            let t = Tableau::initial(p());
            let json = serde_json::to_string(&t).unwrap();
            assert!(!json.contains("children"));
            assert!(json.contains("\"isClosed\":false"));
        }
    }
}
