//! Yew components for the payout board.

use std::rc::Rc;

use web_sys::HtmlSelectElement;
use yew::prelude::*;
use yew::TargetCast;

use crate::currency::{format_amount, Amount};
use crate::highlight::Highlights;
use crate::reconcile::{Pending, TxToken};
use crate::snapshot::{CellRef, MatrixSnapshot, SelectOption};

const TOTAL_COLUMN: &str = "Better Total";
const FOOTER_LABEL: &str = "Golfer Totals";

#[derive(Properties, PartialEq)]
pub struct PayoutTableProps {
    pub snapshot: Rc<MatrixSnapshot>,
    pub highlights: Rc<Highlights>,
}

#[function_component(PayoutTable)]
pub fn payout_table(props: &PayoutTableProps) -> Html {
    let snapshot = &props.snapshot;
    let highlights = &props.highlights;

    html! {
        <table id="table-betters">
            <thead>
                <tr>
                    <th>{ snapshot.corner_label.clone() }</th>
                    { for snapshot.golfers.iter().map(|g| html!{ <th>{ g.clone() }</th> }) }
                    <th>{ TOTAL_COLUMN }</th>
                </tr>
            </thead>
            <tbody>
                { for snapshot.rows.iter().enumerate().map(|(row, r)| html!{
                    <tr>
                        <th>{ r.name.clone() }</th>
                        { for r.payouts.iter().enumerate().map(|(golfer, value)| {
                            let class = highlights.get(CellRef { row, golfer }).css_class();
                            html!{ <td class={class}>{ format_amount(*value) }</td> }
                        }) }
                        <th>{ format_amount(r.total) }</th>
                    </tr>
                }) }
            </tbody>
            <tfoot>
                <tr>
                    <th>{ FOOTER_LABEL }</th>
                    { for snapshot.golfer_totals.iter().map(|t| html!{ <th>{ format_amount(*t) }</th> }) }
                </tr>
            </tfoot>
        </table>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectListProps {
    pub id: AttrValue,
    pub placeholder: AttrValue,
    pub options: Vec<SelectOption>,
    pub selected: AttrValue,
    pub onchange: Callback<String>,
}

/// A dropdown with a leading placeholder whose value is empty.
#[function_component(SelectList)]
pub fn select_list(props: &SelectListProps) -> Html {
    let onchange = {
        let onchange = props.onchange.clone();
        Callback::from(move |e: Event| {
            let target: HtmlSelectElement = e.target_unchecked_into();
            onchange.emit(target.value());
        })
    };
    let selected: &str = &props.selected;

    html! {
        <select id={props.id.clone()} {onchange}>
            <option value="" selected={selected.is_empty()}>{ props.placeholder.clone() }</option>
            { for props.options.iter().map(|o| html!{
                <option value={o.value.clone()} selected={o.value == selected}>{ o.label.clone() }</option>
            }) }
        </select>
    }
}

#[derive(Properties, PartialEq)]
pub struct PoolTotalProps {
    pub total: Amount,
}

#[function_component(PoolTotal)]
pub fn pool_total(props: &PoolTotalProps) -> Html {
    html! { <div id="totSpent" class="result large">{ format!("Total Pool: {}", format_amount(props.total)) }</div> }
}

#[derive(Properties, PartialEq)]
pub struct PendingListProps {
    pub pending: Vec<Pending>,
    pub oncancel: Callback<TxToken>,
}

#[function_component(PendingList)]
pub fn pending_list(props: &PendingListProps) -> Html {
    if props.pending.is_empty() {
        return html! {};
    }
    html! {
        <div class="pending">
            { for props.pending.iter().map(|p| {
                let token = p.token;
                let oncancel = props.oncancel.clone();
                let onclick = Callback::from(move |_: MouseEvent| oncancel.emit(token));
                html!{
                    <div class="hint">
                        { format!("Waiting for the sheet: {}", p.label) }
                        { if p.attempts > 0 { format!(" (checked {}x)", p.attempts) } else { String::new() } }
                        <button {onclick} class="danger" aria-label="Stop waiting">{"Stop waiting"}</button>
                    </div>
                }
            }) }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LeadersProps {
    pub snapshot: Rc<MatrixSnapshot>,
    pub highlights: Rc<Highlights>,
}

/// Who currently holds the top payout. Several bettors can share it.
#[function_component(Leaders)]
pub fn leaders(props: &LeadersProps) -> Html {
    let snapshot = &props.snapshot;
    let names: Vec<String> = props
        .highlights
        .winners()
        .into_iter()
        .filter_map(|at| {
            let row = snapshot.rows.get(at.row)?;
            let golfer = snapshot.golfers.get(at.golfer)?;
            Some(format!("{} on {}", row.name, golfer))
        })
        .collect();
    if names.is_empty() {
        return html! {};
    }
    html! {
        <div class="hint">
            { format!("Top payout {}: {}", format_amount(props.highlights.max_payout()), names.join(", ")) }
        </div>
    }
}
