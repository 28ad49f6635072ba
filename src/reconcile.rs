//! The board's state machine.
//!
//! `AppState` owns the rendered snapshot and its highlights. User actions either come back as a
//! [`Rejection`] with nothing changed, or as a [`Submission`]: the transaction to send, the settle plan
//! to follow, and (for bets) the optimistic edit already applied locally. Every snapshot read replaces
//! the whole matrix, which is what eventually discards an optimistic guess.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::config::{Config, SettlePlan};
use crate::currency::{format_amount, parse_amount, parse_strict, Amount};
use crate::error::Rejection;
use crate::highlight::Highlights;
use crate::snapshot::{CellRef, MatrixSnapshot};
use crate::wire::Transaction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxToken(u64);

impl fmt::Display for TxToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a bet form hands over: raw selection values and the typed amount.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BetRequest {
    pub bettor: String,
    pub golfer: String,
    pub amount: String,
}

/// Shown to the user before a bet is committed.
#[derive(Clone, Debug, PartialEq)]
pub struct BetPrompt {
    pub bettor: String,
    pub golfer: String,
    pub amount: Amount,
}

impl BetPrompt {
    pub fn message(&self) -> String {
        format!(
            "Are you sure you want to bet {} on {} for {}?",
            format_amount(self.amount),
            self.golfer,
            self.bettor
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocalEdit {
    /// Registrations have nothing to show until the sheet adds the row.
    Nothing,
    Applied { at: CellRef, amount: Amount },
    /// The bettor is not on screen, so only the sheet gets the bet.
    RowNotRendered,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Submission {
    pub token: TxToken,
    pub transaction: Transaction,
    pub settle: SettlePlan,
    pub local_edit: LocalEdit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStep {
    Converged,
    Retry(Duration),
    GaveUp,
    /// The token already finished or was cancelled.
    Unknown,
}

/// An in-flight transaction as listed on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Pending {
    pub token: TxToken,
    pub label: String,
    pub attempts: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Target {
    Bettor(String),
    Cell { bettor: String, golfer: String },
}

#[derive(Clone, Debug, PartialEq)]
enum Expectation {
    BettorListed(String),
    CellShows { bettor: String, golfer: String, at_least: Amount },
    AnySnapshot,
}

impl Expectation {
    fn met_by(&self, snapshot: &MatrixSnapshot) -> bool {
        match self {
            Expectation::BettorListed(name) => snapshot.contains_bettor(name),
            Expectation::CellShows { bettor, golfer, at_least } => {
                match (snapshot.find_row(bettor), snapshot.golfer_column(golfer)) {
                    (Some(row), Some(col)) => displayed(snapshot.rows[row].payout(col)) >= *at_least,
                    _ => false,
                }
            }
            Expectation::AnySnapshot => true,
        }
    }
}

#[derive(Clone, Debug)]
struct InFlight {
    target: Target,
    label: String,
    expectation: Expectation,
    plan: SettlePlan,
    attempts: u32,
}

impl InFlight {
    /// Counts one settle read and decides what happens next.
    fn step(&mut self, converged: bool) -> PollStep {
        self.attempts += 1;
        if converged {
            PollStep::Converged
        } else if self.attempts >= self.plan.max_attempts.max(1) {
            PollStep::GaveUp
        } else {
            PollStep::Retry(self.plan.retry_every)
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    snapshot: Rc<MatrixSnapshot>,
    highlights: Rc<Highlights>,
    in_flight: BTreeMap<TxToken, InFlight>,
    next_token: u64,
    rebuilds: u64,
    register_settle: SettlePlan,
    bet_settle: SettlePlan,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            snapshot: Rc::default(),
            highlights: Rc::default(),
            in_flight: BTreeMap::new(),
            next_token: 0,
            rebuilds: 0,
            register_settle: config.register_settle,
            bet_settle: config.bet_settle,
        }
    }

    pub fn snapshot(&self) -> Rc<MatrixSnapshot> {
        self.snapshot.clone()
    }

    pub fn highlights(&self) -> Rc<Highlights> {
        self.highlights.clone()
    }

    /// Number of full rebuilds applied so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Replaces everything on screen with `snapshot`, dropping any optimistic edits.
    pub fn apply_snapshot(&mut self, snapshot: MatrixSnapshot) {
        self.highlights = Rc::new(Highlights::of(&snapshot));
        self.snapshot = Rc::new(snapshot);
        self.rebuilds += 1;
    }

    pub fn register_bettor(&mut self, name: &str) -> Result<Submission, Rejection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejection::BlankName);
        }
        if self.snapshot.contains_bettor(name) {
            return Err(Rejection::DuplicateBettor { name: name.to_string() });
        }
        let target = Target::Bettor(name.to_lowercase());
        self.ensure_idle(&target, name)?;

        let settle = self.register_settle;
        let token = self.track(InFlight {
            target,
            label: format!("Registering {name}"),
            expectation: Expectation::BettorListed(name.to_string()),
            plan: settle,
            attempts: 0,
        });
        Ok(Submission { token, transaction: Transaction::register(name), settle, local_edit: LocalEdit::Nothing })
    }

    /// Validates the bet, asks `confirm`, then adds the amount to the displayed cell before the sheet
    /// has seen it. The row total is left alone; only the sheet computes it.
    pub fn place_bet(
        &mut self,
        request: &BetRequest,
        confirm: impl FnOnce(&BetPrompt) -> bool,
    ) -> Result<Submission, Rejection> {
        let bettor = request.bettor.trim();
        if bettor.is_empty() {
            return Err(Rejection::NoBettor);
        }
        let golfer = request.golfer.as_str();
        if golfer.is_empty() {
            return Err(Rejection::NoGolfer);
        }
        // A bet that would render as $0 is no bet at all.
        let amount = parse_strict(&request.amount)
            .filter(|v| displayed(*v) > 0.0)
            .ok_or(Rejection::InvalidAmount)?;
        let column = self
            .snapshot
            .golfer_column(golfer)
            .ok_or_else(|| Rejection::GolferNotFound { golfer: golfer.to_string() })?;
        let target = Target::Cell { bettor: bettor.to_lowercase(), golfer: golfer.to_string() };
        self.ensure_idle(&target, bettor)?;

        let row = self.snapshot.find_row(bettor);
        let prompt = BetPrompt {
            bettor: row.map_or_else(|| bettor.to_string(), |r| self.snapshot.rows[r].name.clone()),
            golfer: golfer.to_string(),
            amount,
        };
        if !confirm(&prompt) {
            return Err(Rejection::Cancelled);
        }

        let (local_edit, expectation) = match row {
            Some(row) => {
                let snapshot = Rc::make_mut(&mut self.snapshot);
                let cell = &mut snapshot.rows[row].payouts[column];
                *cell = displayed(*cell) + amount;
                let edited = *cell;
                self.highlights = Rc::new(Highlights::of(&self.snapshot));
                (
                    LocalEdit::Applied { at: CellRef { row, golfer: column }, amount: edited },
                    Expectation::CellShows {
                        bettor: bettor.to_string(),
                        golfer: golfer.to_string(),
                        at_least: displayed(edited),
                    },
                )
            }
            None => (LocalEdit::RowNotRendered, Expectation::AnySnapshot),
        };

        let settle = self.bet_settle;
        let token = self.track(InFlight {
            target,
            label: format!("{} on {} for {}", format_amount(amount), golfer, prompt.bettor),
            expectation,
            plan: settle,
            attempts: 0,
        });
        Ok(Submission { token, transaction: Transaction::bet(bettor, amount, golfer), settle, local_edit })
    }

    /// Applies a settle read for `token` and says whether to keep waiting.
    pub fn observe(&mut self, token: TxToken, snapshot: MatrixSnapshot) -> PollStep {
        self.apply_snapshot(snapshot);
        let Some(entry) = self.in_flight.get(&token) else {
            return PollStep::Unknown;
        };
        let converged = entry.expectation.met_by(&self.snapshot);
        self.finish_step(token, converged)
    }

    /// A settle read that never arrived still spends an attempt; the old snapshot stays up.
    pub fn observe_failure(&mut self, token: TxToken) -> PollStep {
        if !self.in_flight.contains_key(&token) {
            return PollStep::Unknown;
        }
        self.finish_step(token, false)
    }

    /// Stops waiting on `token`. Returns false if it was not in flight.
    pub fn cancel(&mut self, token: TxToken) -> bool {
        self.in_flight.remove(&token).is_some()
    }

    pub fn pending(&self) -> Vec<Pending> {
        self.in_flight
            .iter()
            .map(|(token, entry)| Pending { token: *token, label: entry.label.clone(), attempts: entry.attempts })
            .collect()
    }

    fn finish_step(&mut self, token: TxToken, converged: bool) -> PollStep {
        let step = match self.in_flight.get_mut(&token) {
            Some(entry) => entry.step(converged),
            None => return PollStep::Unknown,
        };
        if !matches!(step, PollStep::Retry(_)) {
            self.in_flight.remove(&token);
        }
        step
    }

    fn ensure_idle(&self, target: &Target, who: &str) -> Result<(), Rejection> {
        if self.in_flight.values().any(|entry| entry.target == *target) {
            return Err(Rejection::Busy(who.to_string()));
        }
        Ok(())
    }

    fn track(&mut self, entry: InFlight) -> TxToken {
        let token = TxToken(self.next_token);
        self.next_token += 1;
        self.in_flight.insert(token, entry);
        token
    }
}

/// What a cell reads as on screen, parsed back: whole units only.
fn displayed(amount: Amount) -> Amount {
    parse_amount(format_amount(amount).as_str())
}
