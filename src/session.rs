//! Wires `AppState` to the network, timers and re-rendering.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gloo::console::{error, log, warn};
use gloo::dialogs::confirm;
use gloo::timers::callback::Timeout;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use crate::backend::Backend;
use crate::currency::format_amount;
use crate::error::Rejection;
use crate::reconcile::{AppState, BetRequest, LocalEdit, PollStep, Submission, TxToken};

#[derive(Clone)]
pub struct Session {
    state: Rc<RefCell<AppState>>,
    timers: Rc<RefCell<HashMap<TxToken, Timeout>>>,
    backend: Backend,
    redraw: Callback<()>,
}

impl Session {
    pub fn new(state: Rc<RefCell<AppState>>, backend: Backend, redraw: Callback<()>) -> Self {
        Self { state, timers: Rc::default(), backend, redraw }
    }

    pub fn state(&self) -> Ref<'_, AppState> {
        self.state.borrow()
    }

    /// Plain reload, outside any settle loop.
    pub fn refresh(&self) {
        let session = self.clone();
        spawn_local(async move {
            match session.backend.fetch_snapshot().await {
                Ok(snapshot) => {
                    session.state.borrow_mut().apply_snapshot(snapshot);
                    session.redraw.emit(());
                }
                Err(err) => error!(format!("Error loading matrix data: {err}")),
            }
        });
    }

    pub fn register(&self, name: &str) -> Result<(), Rejection> {
        let submission = self.state.borrow_mut().register_bettor(name)?;
        self.launch(submission);
        Ok(())
    }

    pub fn place_bet(&self, request: &BetRequest) -> Result<(), Rejection> {
        let submission = self
            .state
            .borrow_mut()
            .place_bet(request, |prompt| confirm(&prompt.message()))?;
        self.launch(submission);
        Ok(())
    }

    /// Stops the settle loop for `token`. Dropping its timer clears the pending timeout.
    pub fn cancel(&self, token: TxToken) {
        self.state.borrow_mut().cancel(token);
        self.timers.borrow_mut().remove(&token);
        log!(format!("stopped waiting on transaction {token}"));
        self.redraw.emit(());
    }

    fn launch(&self, submission: Submission) {
        let Submission { token, transaction, settle, local_edit } = submission;
        match local_edit {
            LocalEdit::Applied { at, amount } => log!(format!(
                "transaction {token}: showing {} at row {}, column {} until the sheet confirms",
                format_amount(amount),
                at.row,
                at.golfer
            )),
            LocalEdit::RowNotRendered => {
                warn!(format!("transaction {token}: better is not on screen, sent without a local update"))
            }
            LocalEdit::Nothing => {}
        }
        let backend = self.backend.clone();
        spawn_local(async move {
            match backend.submit(&transaction).await {
                Ok(()) => log!(format!("transaction {token} sent")),
                Err(err) => error!(format!("Error sending transaction {token}: {err}")),
            }
        });
        self.redraw.emit(());
        self.schedule(token, settle.initial_delay);
    }

    fn schedule(&self, token: TxToken, delay: Duration) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let session = self.clone();
        let timer = Timeout::new(millis, move || session.poll(token));
        self.timers.borrow_mut().insert(token, timer);
    }

    fn poll(&self, token: TxToken) {
        let session = self.clone();
        spawn_local(async move {
            session.timers.borrow_mut().remove(&token);
            let result = session.backend.fetch_snapshot().await;
            let step = {
                let mut state = session.state.borrow_mut();
                match result {
                    Ok(snapshot) => state.observe(token, snapshot),
                    Err(err) => {
                        error!(format!("Error loading matrix data: {err}"));
                        state.observe_failure(token)
                    }
                }
            };
            session.redraw.emit(());
            match step {
                PollStep::Converged => log!(format!("transaction {token} settled")),
                PollStep::Retry(delay) => session.schedule(token, delay),
                PollStep::GaveUp => warn!(format!("transaction {token} never showed up; giving up")),
                PollStep::Unknown => {}
            }
        });
    }
}
