//! Golf pool payout board, a Yew app backed by a spreadsheet endpoint.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::dialogs::alert;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew::TargetCast;

mod backend;
mod config;
mod currency;
mod error;
mod highlight;
mod reconcile;
mod session;
mod snapshot;
mod view;
mod wire;

use backend::Backend;
use config::Config;
use error::Rejection;
use reconcile::{AppState, BetRequest, TxToken};
use session::Session;
use snapshot::surviving_selection;
use view::{Leaders, PayoutTable, PendingList, PoolTotal, SelectList};

#[function_component(App)]
fn app() -> Html {
    let redraw = use_force_update();
    let session = use_memo((), move |_| {
        let config = Config::default();
        let state = Rc::new(RefCell::new(AppState::new(&config)));
        Session::new(state, Backend::new(&config.endpoint), Callback::from(move |_| redraw.force_update()))
    });

    // Form state
    let new_name = use_state(String::new);
    let bettor = use_state(String::new);
    let golfer = use_state(String::new);
    let amount = use_state(String::new);

    {
        let session = session.clone();
        use_effect_with((), move |_| {
            session.refresh();
            || ()
        });
    }

    // Handlers
    let on_name_input = {
        let new_name = new_name.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            new_name.set(target.value());
        })
    };
    let on_amount_input = {
        let amount = amount.clone();
        Callback::from(move |e: InputEvent| {
            let target: HtmlInputElement = e.target_unchecked_into();
            amount.set(target.value());
        })
    };
    let on_bettor_change = {
        let bettor = bettor.clone();
        Callback::from(move |value: String| bettor.set(value))
    };
    let on_golfer_change = {
        let golfer = golfer.clone();
        Callback::from(move |value: String| golfer.set(value))
    };

    let on_register = {
        let session = session.clone();
        let new_name = new_name.clone();
        Callback::from(move |_: MouseEvent| match session.register(&new_name) {
            Ok(()) => new_name.set(String::new()),
            Err(rejection) => {
                alert(&rejection.to_string());
                if matches!(rejection, Rejection::DuplicateBettor { .. }) {
                    new_name.set(String::new());
                }
            }
        })
    };

    let on_place_bet = {
        let session = session.clone();
        let bettor = bettor.clone();
        let golfer = golfer.clone();
        let amount = amount.clone();
        Callback::from(move |_: MouseEvent| {
            let request = BetRequest {
                bettor: (*bettor).clone(),
                golfer: (*golfer).clone(),
                amount: (*amount).clone(),
            };
            match session.place_bet(&request) {
                Ok(()) => {
                    amount.set(String::new());
                    golfer.set(String::new());
                }
                Err(Rejection::Cancelled) => {}
                Err(rejection) => alert(&rejection.to_string()),
            }
        })
    };

    let on_cancel = {
        let session = session.clone();
        Callback::from(move |token: TxToken| session.cancel(token))
    };

    let (snapshot, highlights, pending, rebuilds) = {
        let state = session.state();
        (state.snapshot(), state.highlights(), state.pending(), state.rebuilds())
    };
    let bettor_options = snapshot.bettor_options();
    let golfer_options = snapshot.golfer_options();

    // A rebuild can drop the selected bettor or golfer; fall back to the placeholder.
    {
        let bettor = bettor.clone();
        let golfer = golfer.clone();
        let (bettor_options, golfer_options) = (bettor_options.clone(), golfer_options.clone());
        use_effect_with(rebuilds, move |_| {
            let kept = surviving_selection(&bettor_options, &bettor);
            if kept != *bettor {
                bettor.set(kept);
            }
            let kept = surviving_selection(&golfer_options, &golfer);
            if kept != *golfer {
                golfer.set(kept);
            }
            || ()
        });
    }
    let grand_total = snapshot.grand_total;
    let (leader_snapshot, leader_highlights) = (snapshot.clone(), highlights.clone());

    html! {
        <div class="container">
            <header>
                <h1>{"Golf Pool"}</h1>
                <PoolTotal total={grand_total} />
                <Leaders snapshot={leader_snapshot} highlights={leader_highlights} />
            </header>

            <div class="grid">
                <div class="card">
                    <h2><span>{"Join the Pool"}</span></h2>
                    <div class="input-group">
                        <label>{"Your Name"}</label>
                        <div class="row">
                            <input
                                id="betters"
                                type="text"
                                placeholder={"e.g. Alice"}
                                value={(*new_name).clone()}
                                oninput={on_name_input}
                                aria-label="New better name" />
                            <button id="btn" onclick={on_register} aria-label="Register better">{"Add Better"}</button>
                        </div>
                    </div>
                </div>

                <div class="card">
                    <h2><span>{"Place a Bet"}</span></h2>
                    <div class="row three" style="gap:8px; align-items: end;">
                        <div class="input-group">
                            <label>{"Better"}</label>
                            <SelectList
                                id="better-select"
                                placeholder="-- Select a Name --"
                                options={bettor_options}
                                selected={AttrValue::from((*bettor).clone())}
                                onchange={on_bettor_change} />
                        </div>
                        <div class="input-group">
                            <label>{"Golfer"}</label>
                            <SelectList
                                id="golfer-select"
                                placeholder="-- Pick a Golfer --"
                                options={golfer_options}
                                selected={AttrValue::from((*golfer).clone())}
                                onchange={on_golfer_change} />
                        </div>
                        <div class="input-group">
                            <label>{"Amount ($)"}</label>
                            <input
                                id="bet-amount"
                                type="number"
                                min="1"
                                step="1"
                                value={(*amount).clone()}
                                oninput={on_amount_input}
                                aria-label="Bet amount" />
                        </div>
                    </div>
                    <button id="place-bet" onclick={on_place_bet} style="margin-top:8px; width: 100%;" aria-label="Place bet">
                        {"Place Bet"}
                    </button>
                    <PendingList {pending} oncancel={on_cancel} />
                </div>
            </div>

            <div class="card">
                // Keyed by rebuild so every fresh snapshot mounts a new table.
                <PayoutTable key={rebuilds.to_string()} {snapshot} {highlights} />
            </div>
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
