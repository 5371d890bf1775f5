use super::types::Position;

/// At most one armed cell between inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    Armed(Position),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionOutcome {
    Armed(Position),
    Disarmed,
    SwapRequested { first: Position, second: Position },
}

impl Selection {
    pub fn position(&self) -> Option<Position> {
        match self {
            Selection::Idle => None,
            Selection::Armed(pos) => Some(*pos),
        }
    }

    /// Feeds one input. A swap request leaves the selection armed; the swap
    /// controller decides whether it clears or re-aims.
    pub fn input(&mut self, pos: Position) -> SelectionOutcome {
        match *self {
            Selection::Idle => {
                *self = Selection::Armed(pos);
                SelectionOutcome::Armed(pos)
            }
            Selection::Armed(armed) if armed == pos => {
                *self = Selection::Idle;
                SelectionOutcome::Disarmed
            }
            Selection::Armed(armed) => SelectionOutcome::SwapRequested {
                first: armed,
                second: pos,
            },
        }
    }
}
