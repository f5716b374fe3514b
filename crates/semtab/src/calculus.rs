use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CloseMsg {
    pub closed: bool,
    pub msg: String,
}

/// A proof calculus driven by moves: a formula is parsed into an initial
/// state, moves transform states, and `check_close` reports whether the
/// proof is finished.
pub trait Calculus<'f> {
    type Params;
    type State;
    type Move;
    type Error;

    fn parse_formula(
        formula: &'f str,
        params: Option<Self::Params>,
    ) -> Result<Self::State, Self::Error>;

    fn validate(_state: Self::State) -> bool {
        true
    }

    fn apply_move(state: Self::State, mv: Self::Move) -> Result<Self::State, Self::Error>;

    fn check_close(state: Self::State) -> CloseMsg;
}
