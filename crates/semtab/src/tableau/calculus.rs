use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

use super::{FormulaIndex, Tableau, TableauIndex};
use crate::calculus::{Calculus, CloseMsg};
use crate::logic::Formula;
use crate::parse::{parse_prop_formula, ParseErr};
use crate::tamper_protect::{seal, ProtectedState};

pub type PropTabResult<T> = Result<T, Err>;

#[derive(Debug, PartialEq, Eq)]
pub enum Err {
    Parse(ParseErr),
    Tableau(super::Err),
    CorruptedState,
}

impl From<ParseErr> for Err {
    fn from(e: ParseErr) -> Self {
        Err::Parse(e)
    }
}

impl From<super::Err> for Err {
    fn from(e: super::Err) -> Self {
        Err::Tableau(e)
    }
}

impl fmt::Display for Err {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Err::Parse(e) => write!(f, "{}", e),
            Err::Tableau(e) => write!(f, "{}", e),
            Err::CorruptedState => write!(
                f,
                "The proof state has been modified outside the calculus and is no longer valid"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Params {
    pub negated: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params { negated: false }
    }
}

/// An interactive tableau proof in flight. The state travels to the client
/// and back between moves, so it is sealed against tampering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    formula: Formula,
    negated: bool,
    tableau: Tableau,
    seal: String,
}

impl State {
    pub fn new(formula: Formula, negated: bool, tableau: Tableau) -> Self {
        let state = State {
            formula,
            negated,
            tableau,
            seal: String::new(),
        };
        state.resealed()
    }

    /// The formula the proof is about, before any negation.
    pub fn formula(&self) -> &Formula {
        &self.formula
    }

    /// Whether the tableau argues about the negation of [`formula`](Self::formula).
    pub fn negated(&self) -> bool {
        self.negated
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn check_seal(&self) -> bool {
        self.verify_seal(&self.seal)
    }

    fn resealed(mut self) -> Self {
        self.seal = seal(self.compute_seal_info());
        self
    }
}

impl ProtectedState for State {
    fn compute_seal_info(&self) -> String {
        format!(
            "tableaustate|{}|{}|{}",
            self.formula,
            self.negated,
            tableau_info(&self.tableau)
        )
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    let mut s = String::new();
    for (i, item) in items.iter().enumerate() {
        s.push_str(&item.to_string());
        if i < items.len() - 1 {
            s.push(',');
        }
    }
    s
}

fn tableau_info(t: &Tableau) -> String {
    let closed = if t.is_closed() { "c" } else { "o" };
    match t.children() {
        None => format!("[{}|{}|{}]", join(t.formulas()), join(t.applied()), closed),
        Some((l, r)) => format!(
            "[{}|{}|{}|{},{}]",
            join(t.formulas()),
            join(t.applied()),
            closed,
            tableau_info(l),
            tableau_info(r)
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    Reduce(FormulaIndex, TableauIndex),
    CloseBot(FormulaIndex),
    CloseContradiction(FormulaIndex, FormulaIndex),
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Reduce(formula, target) => write!(f, "Reduce({},{})", formula, target),
            Move::CloseBot(formula) => write!(f, "CloseBot({})", formula),
            Move::CloseContradiction(first, second) => {
                write!(f, "CloseContradiction({},{})", first, second)
            }
        }
    }
}

pub struct PropTableau<'f> {
    _f: PhantomData<&'f str>,
}

impl<'f> Calculus<'f> for PropTableau<'f> {
    type Params = Params;
    type State = State;
    type Move = Move;
    type Error = Err;

    fn parse_formula(formula: &'f str, params: Option<Self::Params>) -> PropTabResult<State> {
        let Params { negated } = params.unwrap_or_default();
        let parsed = parse_prop_formula(formula)?;
        let goal = if negated {
            Formula::not(parsed.clone())
        } else {
            parsed.clone()
        };
        Ok(State::new(parsed, negated, Tableau::initial(goal)))
    }

    fn apply_move(state: State, mv: Move) -> PropTabResult<State> {
        if !state.check_seal() {
            return Err(Err::CorruptedState);
        }
        let tableau = match &mv {
            Move::Reduce(formula, target) => state.tableau.reduce_formula(formula, target),
            Move::CloseBot(formula) => state.tableau.close_branch_with_bot(formula),
            Move::CloseContradiction(first, second) => {
                state.tableau.close_branch_with_contradiction(first, second)
            }
        }?;
        Ok(State { tableau, ..state }.resealed())
    }

    fn check_close(state: State) -> CloseMsg {
        let closed = state.tableau.is_closed();
        let msg = if !closed {
            "The proof tree is not closed".to_string()
        } else if state.negated {
            format!(
                "Every branch for the negation of {} is contradictory, the formula is a tautology",
                state.formula
            )
        } else {
            format!(
                "Every branch for {} is contradictory, the formula is unsatisfiable",
                state.formula
            )
        };
        CloseMsg { closed, msg }
    }

    fn validate(state: State) -> bool {
        state.check_seal()
    }
}

impl Serialize for Move {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Move::Reduce(formula, target) => {
                let mut s = serializer.serialize_struct("PropTableauMove", 3)?;
                s.serialize_field("type", "reduce")?;
                s.serialize_field("formula", formula)?;
                s.serialize_field("target", target)?;
                s.end()
            }
            Move::CloseBot(formula) => {
                let mut s = serializer.serialize_struct("PropTableauMove", 2)?;
                s.serialize_field("type", "close-bot")?;
                s.serialize_field("formula", formula)?;
                s.end()
            }
            Move::CloseContradiction(first, second) => {
                let mut s = serializer.serialize_struct("PropTableauMove", 3)?;
                s.serialize_field("type", "close-contradiction")?;
                s.serialize_field("first", first)?;
                s.serialize_field("second", second)?;
                s.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Move {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        enum Field {
            #[serde(rename = "type")]
            Ty,
            #[serde(rename = "formula")]
            Formula,
            #[serde(rename = "target")]
            Target,
            #[serde(rename = "first")]
            First,
            #[serde(rename = "second")]
            Second,
        }

        struct MoveVisitor;

        impl<'de> Visitor<'de> for MoveVisitor {
            type Value = Move;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("struct PropTableauMove")
            }

            fn visit_map<V>(self, mut map: V) -> Result<Move, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut ty: Option<String> = None;
                let mut formula: Option<FormulaIndex> = None;
                let mut target: Option<TableauIndex> = None;
                let mut first: Option<FormulaIndex> = None;
                let mut second: Option<FormulaIndex> = None;

                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Ty => {
                            if ty.is_some() {
                                return Err(de::Error::duplicate_field("type"));
                            }
                            ty = Some(map.next_value()?);
                        }
                        Field::Formula => {
                            if formula.is_some() {
                                return Err(de::Error::duplicate_field("formula"));
                            }
                            formula = Some(map.next_value()?);
                        }
                        Field::Target => {
                            if target.is_some() {
                                return Err(de::Error::duplicate_field("target"));
                            }
                            target = Some(map.next_value()?);
                        }
                        Field::First => {
                            if first.is_some() {
                                return Err(de::Error::duplicate_field("first"));
                            }
                            first = Some(map.next_value()?);
                        }
                        Field::Second => {
                            if second.is_some() {
                                return Err(de::Error::duplicate_field("second"));
                            }
                            second = Some(map.next_value()?);
                        }
                    }
                }

                let ty = ty.ok_or_else(|| de::Error::missing_field("type"))?;
                Ok(match ty.as_str() {
                    "reduce" => Move::Reduce(
                        formula.ok_or_else(|| de::Error::missing_field("formula"))?,
                        target.ok_or_else(|| de::Error::missing_field("target"))?,
                    ),
                    "close-bot" => Move::CloseBot(
                        formula.ok_or_else(|| de::Error::missing_field("formula"))?,
                    ),
                    "close-contradiction" => Move::CloseContradiction(
                        first.ok_or_else(|| de::Error::missing_field("first"))?,
                        second.ok_or_else(|| de::Error::missing_field("second"))?,
                    ),
                    other => {
                        return Err(de::Error::unknown_variant(
                            other,
                            &["reduce", "close-bot", "close-contradiction"],
                        ))
                    }
                })
            }
        }

        const FIELDS: &[&str] = &["type", "formula", "target", "first", "second"];
        deserializer.deserialize_struct("PropTableauMove", FIELDS, MoveVisitor)
    }
}
