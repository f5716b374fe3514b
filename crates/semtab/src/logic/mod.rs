pub mod random;
pub mod reduce;

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

pub use reduce::{is_contradiction_pair, reduce, Reduction};

/// A propositional formula. Structural equality (`PartialEq`) compares shape
/// and sub-formulas recursively, never identity.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Formula {
    Var(String),
    Not(Box<Formula>),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Impl(Box<Formula>, Box<Formula>),
    Bot,
    Top,
}

impl Formula {
    pub fn var<S: Into<String>>(name: S) -> Self {
        Formula::Var(name.into())
    }

    pub fn not(arg: Formula) -> Self {
        Formula::Not(Box::new(arg))
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Formula::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Formula::Or(Box::new(left), Box::new(right))
    }

    pub fn implies(left: Formula, right: Formula) -> Self {
        Formula::Impl(Box::new(left), Box::new(right))
    }

    /// All variable names occurring in the formula, sorted and deduplicated.
    pub fn vars(&self) -> Vec<String> {
        fn collect<'f>(f: &'f Formula, out: &mut BTreeSet<&'f str>) {
            match f {
                Formula::Var(name) => {
                    out.insert(name);
                }
                Formula::Not(arg) => collect(arg, out),
                Formula::And(l, r) | Formula::Or(l, r) | Formula::Impl(l, r) => {
                    collect(l, out);
                    collect(r, out);
                }
                Formula::Bot | Formula::Top => {}
            }
        }

        let mut set = BTreeSet::new();
        collect(self, &mut set);
        set.into_iter().map(str::to_owned).collect()
    }

    /// Evaluates the formula under the given assignment. Variables missing
    /// from the assignment count as false.
    pub fn eval(&self, assignment: &HashMap<String, bool>) -> bool {
        match self {
            Formula::Var(name) => assignment.get(name).copied().unwrap_or(false),
            Formula::Not(arg) => !arg.eval(assignment),
            Formula::And(l, r) => l.eval(assignment) && r.eval(assignment),
            Formula::Or(l, r) => l.eval(assignment) || r.eval(assignment),
            Formula::Impl(l, r) => !l.eval(assignment) || r.eval(assignment),
            Formula::Bot => false,
            Formula::Top => true,
        }
    }
}

fn write_binary(
    f: &mut fmt::Formatter<'_>,
    left: &Formula,
    paren_left: bool,
    op: &str,
    right: &Formula,
    paren_right: bool,
) -> fmt::Result {
    if paren_left {
        write!(f, "({})", left)?;
    } else {
        write!(f, "{}", left)?;
    }
    write!(f, " {} ", op)?;
    if paren_right {
        write!(f, "({})", right)
    } else {
        write!(f, "{}", right)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Formula::*;
        match self {
            Var(name) => write!(f, "{}", name),
            Bot => write!(f, "⊥"),
            Top => write!(f, "⊤"),
            Not(arg) => match **arg {
                Var(_) | Bot | Top | Not(_) => write!(f, "¬{}", arg),
                _ => write!(f, "¬({})", arg),
            },
            // Implication is right-associative, so only a left implication
            // needs parentheses.
            Impl(l, r) => write_binary(f, l, matches!(**l, Impl(..)), "->", r, false),
            And(l, r) => write_binary(
                f,
                l,
                matches!(**l, Or(..) | Impl(..)),
                "∧",
                r,
                matches!(**r, And(..) | Or(..) | Impl(..)),
            ),
            Or(l, r) => write_binary(
                f,
                l,
                matches!(**l, And(..) | Impl(..)),
                "∨",
                r,
                matches!(**r, And(..) | Or(..) | Impl(..)),
            ),
        }
    }
}

impl Serialize for Formula {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use Formula::*;
        match self {
            Var(name) => {
                let mut s = serializer.serialize_struct("Formula", 2)?;
                s.serialize_field("tag", "var")?;
                s.serialize_field("name", name)?;
                s.end()
            }
            Not(arg) => {
                let mut s = serializer.serialize_struct("Formula", 2)?;
                s.serialize_field("tag", "not")?;
                s.serialize_field("arg", arg)?;
                s.end()
            }
            And(l, r) | Or(l, r) | Impl(l, r) => {
                let tag = match self {
                    And(..) => "and",
                    Or(..) => "or",
                    _ => "implies",
                };
                let mut s = serializer.serialize_struct("Formula", 3)?;
                s.serialize_field("tag", tag)?;
                s.serialize_field("left", l)?;
                s.serialize_field("right", r)?;
                s.end()
            }
            Bot | Top => {
                let tag = if matches!(self, Bot) { "bot" } else { "top" };
                let mut s = serializer.serialize_struct("Formula", 1)?;
                s.serialize_field("tag", tag)?;
                s.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Formula {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "lowercase")]
        enum Field {
            Tag,
            Name,
            Arg,
            Left,
            Right,
        }

        struct FormulaVisitor;

        impl<'de> Visitor<'de> for FormulaVisitor {
            type Value = Formula;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a tagged formula object")
            }

            fn visit_map<V>(self, mut map: V) -> Result<Formula, V::Error>
            where
                V: MapAccess<'de>,
            {
                let mut tag: Option<String> = None;
                let mut name: Option<String> = None;
                let mut arg: Option<Formula> = None;
                let mut left: Option<Formula> = None;
                let mut right: Option<Formula> = None;

                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Tag => {
                            if tag.is_some() {
                                return Err(de::Error::duplicate_field("tag"));
                            }
                            tag = Some(map.next_value()?);
                        }
                        Field::Name => {
                            if name.is_some() {
                                return Err(de::Error::duplicate_field("name"));
                            }
                            name = Some(map.next_value()?);
                        }
                        Field::Arg => {
                            if arg.is_some() {
                                return Err(de::Error::duplicate_field("arg"));
                            }
                            arg = Some(map.next_value()?);
                        }
                        Field::Left => {
                            if left.is_some() {
                                return Err(de::Error::duplicate_field("left"));
                            }
                            left = Some(map.next_value()?);
                        }
                        Field::Right => {
                            if right.is_some() {
                                return Err(de::Error::duplicate_field("right"));
                            }
                            right = Some(map.next_value()?);
                        }
                    }
                }

                let tag = tag.ok_or_else(|| de::Error::missing_field("tag"))?;
                Ok(match tag.as_str() {
                    "var" => Formula::Var(name.ok_or_else(|| de::Error::missing_field("name"))?),
                    "not" => Formula::not(arg.ok_or_else(|| de::Error::missing_field("arg"))?),
                    "and" | "or" | "implies" => {
                        let left = left.ok_or_else(|| de::Error::missing_field("left"))?;
                        let right = right.ok_or_else(|| de::Error::missing_field("right"))?;
                        match tag.as_str() {
                            "and" => Formula::and(left, right),
                            "or" => Formula::or(left, right),
                            _ => Formula::implies(left, right),
                        }
                    }
                    "bot" => Formula::Bot,
                    "top" => Formula::Top,
                    other => {
                        return Err(de::Error::unknown_variant(
                            other,
                            &["var", "not", "and", "or", "implies", "bot", "top"],
                        ))
                    }
                })
            }
        }

        const FIELDS: &[&str] = &["tag", "name", "arg", "left", "right"];
        deserializer.deserialize_struct("Formula", FIELDS, FormulaVisitor)
    }
}
