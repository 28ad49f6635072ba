//! In-memory copy of the sheet: golfer columns, bettor rows, column totals and the pool total.
//!
//! A snapshot is always rebuilt whole from one read. Rows keep exactly one payout per golfer so a
//! column index found in the header is valid for every row and for `golfer_totals`.

use crate::currency::{parse_amount, Amount};
use crate::wire::RawCell;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BettorRow {
    pub name: String,
    /// One entry per golfer, in header order.
    pub payouts: Vec<Amount>,
    /// Backend-supplied; not recomputed from `payouts`.
    pub total: Amount,
}

impl BettorRow {
    pub fn payout(&self, golfer: usize) -> Amount {
        self.payouts.get(golfer).copied().unwrap_or(0.0)
    }

    pub fn is_named(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub row: usize,
    pub golfer: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PayoutCell {
    pub at: CellRef,
    pub value: Amount,
}

/// An entry of one of the two selection lists.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatrixSnapshot {
    /// Header cell above the bettor names, shown as-is.
    pub corner_label: String,
    pub golfers: Vec<String>,
    pub rows: Vec<BettorRow>,
    pub golfer_totals: Vec<Amount>,
    pub grand_total: Amount,
}

impl MatrixSnapshot {
    /// Builds a snapshot from the raw sheet grid. Row 0 is the header; rows with a blank name are dropped
    /// and do not consume a `better_totals` slot.
    pub fn from_raw(
        matrix: &[Vec<RawCell>],
        better_totals: &[RawCell],
        golfer_totals: &[RawCell],
        grand_total: &RawCell,
    ) -> Self {
        let header = match matrix.first() {
            Some(header) if !header.iter().all(RawCell::is_blank) => header,
            _ => return Self::default(),
        };
        let corner_label = header.first().map(RawCell::label).unwrap_or_default();
        let golfers: Vec<String> = header.iter().skip(1).map(RawCell::label).collect();
        let width = golfers.len();

        let rows = matrix[1..]
            .iter()
            .filter_map(|raw| {
                let name = raw.first()?.label();
                let name = name.trim();
                (!name.is_empty()).then(|| (name.to_string(), raw))
            })
            .enumerate()
            .map(|(i, (name, raw))| BettorRow {
                name,
                payouts: aligned(raw.get(1..).unwrap_or_default(), width),
                total: better_totals.get(i).map(parse_amount).unwrap_or(0.0),
            })
            .collect();

        Self {
            corner_label,
            golfers,
            rows,
            golfer_totals: aligned(golfer_totals, width),
            grand_total: parse_amount(grand_total),
        }
    }

    /// Column lookup: exact, case-sensitive match on the rendered header label.
    pub fn golfer_column(&self, label: &str) -> Option<usize> {
        self.golfers.iter().position(|g| g == label)
    }

    pub fn find_row(&self, name: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.is_named(name))
    }

    pub fn contains_bettor(&self, name: &str) -> bool {
        self.find_row(name).is_some()
    }

    /// Every payout cell, row-major.
    pub fn cells(&self) -> Vec<PayoutCell> {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, r)| {
                r.payouts
                    .iter()
                    .enumerate()
                    .map(move |(golfer, value)| PayoutCell { at: CellRef { row, golfer }, value: *value })
            })
            .collect()
    }

    pub fn bettor_options(&self) -> Vec<SelectOption> {
        self.rows
            .iter()
            .map(|row| SelectOption { value: row.name.to_lowercase(), label: row.name.clone() })
            .collect()
    }

    pub fn golfer_options(&self) -> Vec<SelectOption> {
        self.golfers
            .iter()
            .map(|g| SelectOption { value: g.clone(), label: g.clone() })
            .collect()
    }
}

/// `selected` while it is still one of `options`, otherwise the placeholder's empty value.
pub fn surviving_selection(options: &[SelectOption], selected: &str) -> String {
    if options.iter().any(|o| o.value == selected) {
        selected.to_string()
    } else {
        String::new()
    }
}

pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn aligned(cells: &[RawCell], width: usize) -> Vec<Amount> {
    (0..width).map(|i| cells.get(i).map(parse_amount).unwrap_or(0.0)).collect()
}
