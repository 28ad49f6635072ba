//! Cell highlighting: which payouts are entered, high, or the top of the board.

use std::collections::HashMap;

use crate::currency::Amount;
use crate::snapshot::{CellRef, MatrixSnapshot, PayoutCell};

/// A cell paying more than this share of the top payout is flagged as high.
const HIGH_PAYOUT_RATIO: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Highlight {
    #[default]
    None,
    Entered,
    HighPayout,
    Winner,
}

impl Highlight {
    pub fn css_class(self) -> &'static str {
        match self {
            Highlight::None => "",
            Highlight::Entered => "entered",
            Highlight::HighPayout => "entered high-payout",
            Highlight::Winner => "entered winner-cell",
        }
    }
}

/// Classifies every cell against the largest payout among them. Ties for the top value all win.
pub fn classify(cells: &[PayoutCell]) -> HashMap<CellRef, Highlight> {
    let max = max_payout(cells);
    cells
        .iter()
        .map(|cell| {
            let class = if cell.value <= 0.0 {
                Highlight::None
            } else if cell.value == max {
                Highlight::Winner
            } else if cell.value > max * HIGH_PAYOUT_RATIO {
                Highlight::HighPayout
            } else {
                Highlight::Entered
            };
            (cell.at, class)
        })
        .collect()
}

fn max_payout(cells: &[PayoutCell]) -> Amount {
    cells.iter().map(|c| c.value).fold(0.0, f64::max)
}

/// Highlight classes for one snapshot. Always rebuilt whole, never patched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Highlights {
    by_cell: HashMap<CellRef, Highlight>,
    max_payout: Amount,
}

impl Highlights {
    pub fn of(snapshot: &MatrixSnapshot) -> Self {
        let cells = snapshot.cells();
        Self { max_payout: max_payout(&cells), by_cell: classify(&cells) }
    }

    pub fn get(&self, at: CellRef) -> Highlight {
        self.by_cell.get(&at).copied().unwrap_or_default()
    }

    pub fn max_payout(&self) -> Amount {
        self.max_payout
    }

    pub fn winners(&self) -> Vec<CellRef> {
        let mut winners: Vec<CellRef> = self
            .by_cell
            .iter()
            .filter(|(_, h)| **h == Highlight::Winner)
            .map(|(at, _)| *at)
            .collect();
        winners.sort();
        winners
    }
}
