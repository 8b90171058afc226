//! Navigation state machine over the items of a labeling session.
//!
//! The machine owns the cursor and the set of labeled positions. Each key
//! action moves it through a short transient state (`Advancing`,
//! `Retreating`, `Terminating`) and settles in `Displaying`, `Complete` or
//! `Exhausted`. The controller only ever sees the resulting [`Transition`].

use std::collections::BTreeSet;

use crate::keybindings::Action;

/// Current state of the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Item at this position should be shown
    Displaying(usize),
    /// Current item is on screen, waiting for a key
    AwaitingInput,
    Advancing,
    Retreating,
    Terminating,
    /// Every item has a label
    Complete,
    /// Ran past the last item without looping
    Exhausted,
}

impl NavState {
    pub fn is_final(self) -> bool {
        matches!(
            self,
            NavState::Terminating | NavState::Complete | NavState::Exhausted
        )
    }
}

/// Where navigation ended up after a move or a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Show the item at this position next
    Display(usize),
    Complete,
    Exhausted,
}

/// Result of feeding one action to the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed; keep waiting
    Ignored,
    /// Cursor unchanged; the current item's last line should be removed
    UndoRequested,
    /// Cursor moved
    Moved(Outcome),
    /// `index` received `label`, then the cursor moved
    Labeled {
        index: usize,
        label: u8,
        outcome: Outcome,
    },
    /// Operator ended the session
    Terminated,
}

/// Cursor over `len` items.
#[derive(Debug, Clone)]
pub struct Navigator {
    len: usize,
    position: usize,
    looping: bool,
    labeled: BTreeSet<usize>,
    state: NavState,
}

impl Navigator {
    pub fn new(len: usize, looping: bool) -> Self {
        let state = if len == 0 {
            NavState::Exhausted
        } else {
            NavState::Displaying(0)
        };
        Self {
            len,
            position: 0,
            looping,
            labeled: BTreeSet::new(),
            state,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn labeled_count(&self) -> usize {
        self.labeled.len()
    }

    pub fn is_labeled(&self, index: usize) -> bool {
        self.labeled.contains(&index)
    }

    /// Note that the current item is on screen.
    pub fn await_input(&mut self) {
        if let NavState::Displaying(_) = self.state {
            self.state = NavState::AwaitingInput;
        }
    }

    /// Feed one action.
    pub fn apply(&mut self, action: Action) -> Transition {
        if self.state.is_final() {
            return Transition::Ignored;
        }

        match action {
            Action::Forward => {
                self.state = NavState::Advancing;
                Transition::Moved(self.advance())
            }
            Action::Backward => {
                self.state = NavState::Retreating;
                self.position = (self.position + self.len - 1) % self.len;
                Transition::Moved(self.settle())
            }
            Action::Label(label) => {
                let index = self.position;
                self.labeled.insert(index);
                self.state = NavState::Advancing;
                let outcome = self.advance();
                Transition::Labeled {
                    index,
                    label,
                    outcome,
                }
            }
            Action::Quit => {
                self.state = NavState::Terminating;
                Transition::Terminated
            }
            Action::Undo => Transition::UndoRequested,
            Action::Unknown => Transition::Ignored,
        }
    }

    fn advance(&mut self) -> Outcome {
        self.position += 1;
        if self.looping {
            self.position %= self.len;
        }
        self.settle()
    }

    fn settle(&mut self) -> Outcome {
        let outcome = if self.labeled.len() == self.len {
            Outcome::Complete
        } else if self.position >= self.len {
            Outcome::Exhausted
        } else {
            Outcome::Display(self.position)
        };
        self.state = match outcome {
            Outcome::Display(i) => NavState::Displaying(i),
            Outcome::Complete => NavState::Complete,
            Outcome::Exhausted => NavState::Exhausted,
        };
        log::trace!("Navigation settled: {:?}", self.state);
        outcome
    }
}
