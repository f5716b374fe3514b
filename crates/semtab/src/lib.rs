pub mod calculus;
pub mod logic;
pub mod parse;
pub mod solver;
pub mod tableau;
pub mod tamper_protect;

pub use calculus::Calculus;
pub use logic::random::{random_formula, random_tautology};
pub use logic::Formula;
pub use solver::is_tautology;
pub use tableau::{FormulaIndex, Tableau, TableauIndex};
