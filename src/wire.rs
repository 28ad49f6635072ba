//! JSON shapes exchanged with the sheet script.
//!
//! Reads come back as `{ matrix, betterTotals, golferTotals, totalSpent }`. Writes are one of two
//! transaction bodies. serde rejects anything that is not the right JSON shape; [`RawSnapshot::check`]
//! rejects payloads that decode but cannot describe one consistent matrix.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::currency::{AmountInput, Amount};
use crate::error::ShapeError;
use crate::snapshot::MatrixSnapshot;

/// One spreadsheet cell. Sheets hand back numbers, strings, booleans or nothing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
    Flag(bool),
    Empty,
}

impl RawCell {
    /// The cell as it would read on screen.
    pub fn label(&self) -> String {
        match self {
            RawCell::Text(s) => s.clone(),
            RawCell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
            RawCell::Number(v) => v.to_string(),
            RawCell::Flag(b) => b.to_string(),
            RawCell::Empty => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.label().trim().is_empty()
    }
}

impl<'a> From<&'a RawCell> for AmountInput<'a> {
    fn from(cell: &'a RawCell) -> Self {
        match cell {
            RawCell::Number(v) => AmountInput::Number(*v),
            RawCell::Text(s) => AmountInput::Text(s),
            RawCell::Flag(_) | RawCell::Empty => AmountInput::Missing,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshot {
    pub matrix: Vec<Vec<RawCell>>,
    pub better_totals: Vec<RawCell>,
    pub golfer_totals: Vec<RawCell>,
    pub total_spent: RawCell,
}

impl RawSnapshot {
    pub fn check(&self) -> Result<(), ShapeError> {
        let header = match self.matrix.first() {
            Some(header) if !header.iter().all(RawCell::is_blank) => header,
            _ => return Ok(()),
        };

        let golfers: Vec<String> = header.iter().skip(1).map(RawCell::label).collect();
        let mut seen = HashSet::new();
        for golfer in &golfers {
            if !seen.insert(golfer.as_str()) {
                return Err(ShapeError::DuplicateGolfer(golfer.clone()));
            }
        }
        if self.golfer_totals.len() != golfers.len() {
            return Err(ShapeError::GolferTotals { expected: golfers.len(), got: self.golfer_totals.len() });
        }

        let named = self.matrix[1..]
            .iter()
            .filter(|row| row.first().is_some_and(|name| !name.is_blank()))
            .count();
        if self.better_totals.len() < named {
            return Err(ShapeError::BetterTotals { expected: named, got: self.better_totals.len() });
        }
        Ok(())
    }

    pub fn to_snapshot(&self) -> MatrixSnapshot {
        MatrixSnapshot::from_raw(&self.matrix, &self.better_totals, &self.golfer_totals, &self.total_spent)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UpdateKind {
    #[serde(rename = "betUpdate")]
    BetUpdate,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BetUpdate {
    #[serde(rename = "type")]
    pub kind: UpdateKind,
    pub name: String,
    pub amount: Amount,
    pub golfer: String,
}

/// A write sent to the sheet script.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Transaction {
    Register { name: String, bet: String },
    Bet(BetUpdate),
}

impl Transaction {
    pub fn register(name: &str) -> Self {
        Transaction::Register { name: name.to_string(), bet: "$0".to_string() }
    }

    pub fn bet(name: &str, amount: Amount, golfer: &str) -> Self {
        Transaction::Bet(BetUpdate {
            kind: UpdateKind::BetUpdate,
            name: name.to_string(),
            amount,
            golfer: golfer.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> RawSnapshot {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_mixed_cells() {
        let raw = decode(json!({
            "matrix": [["Better Name", "Scheffler", 7], ["Alice", "$40", 0], ["", null, true]],
            "betterTotals": ["$40", 0],
            "golferTotals": [40, "0"],
            "totalSpent": "$40",
        }));
        assert_eq!(raw.matrix[0][2], RawCell::Number(7.0));
        assert_eq!(raw.matrix[0][2].label(), "7");
        assert_eq!(raw.matrix[2][1], RawCell::Empty);
        assert_eq!(raw.matrix[2][2], RawCell::Flag(true));
        assert!(raw.matrix[2][0].is_blank());
        assert_eq!(raw.check(), Ok(()));
    }

    #[test]
    fn nested_cells_and_missing_fields_fail_to_decode() {
        let nested = json!({
            "matrix": [["Better Name", ["A"]]],
            "betterTotals": [],
            "golferTotals": [0],
            "totalSpent": 0,
        });
        assert!(serde_json::from_value::<RawSnapshot>(nested).is_err());

        let missing = json!({ "matrix": [], "betterTotals": [], "golferTotals": [] });
        assert!(serde_json::from_value::<RawSnapshot>(missing).is_err());
    }

    #[test]
    fn check_rejects_misaligned_golfer_totals() {
        let raw = decode(json!({
            "matrix": [["Better Name", "A", "B"]],
            "betterTotals": [],
            "golferTotals": [0],
            "totalSpent": 0,
        }));
        assert_eq!(raw.check(), Err(ShapeError::GolferTotals { expected: 2, got: 1 }));
    }

    #[test]
    fn check_rejects_short_better_totals() {
        let raw = decode(json!({
            "matrix": [["Better Name", "A"], ["Alice", 1], ["  ", 0], ["Bob", 2]],
            "betterTotals": [1],
            "golferTotals": [3],
            "totalSpent": 3,
        }));
        assert_eq!(raw.check(), Err(ShapeError::BetterTotals { expected: 2, got: 1 }));
    }

    #[test]
    fn check_rejects_repeated_golfer() {
        let raw = decode(json!({
            "matrix": [["Better Name", "A", "A"]],
            "betterTotals": [],
            "golferTotals": [0, 0],
            "totalSpent": 0,
        }));
        assert_eq!(raw.check(), Err(ShapeError::DuplicateGolfer("A".into())));
    }

    #[test]
    fn check_accepts_missing_header() {
        let raw = decode(json!({
            "matrix": [],
            "betterTotals": [],
            "golferTotals": [12],
            "totalSpent": 0,
        }));
        assert_eq!(raw.check(), Ok(()));
        assert!(raw.to_snapshot().golfers.is_empty());
    }

    #[test]
    fn registration_body() {
        let body = serde_json::to_value(Transaction::register("Alice")).unwrap();
        assert_eq!(body, json!({ "name": "Alice", "bet": "$0" }));
    }

    #[test]
    fn bet_body() {
        let body = serde_json::to_value(Transaction::bet("alice", 60.0, "Scheffler")).unwrap();
        assert_eq!(
            body,
            json!({ "type": "betUpdate", "name": "alice", "amount": 60.0, "golfer": "Scheffler" })
        );
    }
}
