//! HTTP access to the sheet endpoint.

use std::rc::Rc;

use gloo::net::http::Request;
use wasm_bindgen::JsValue;
use web_sys::RequestMode;

use crate::error::{FetchError, SubmitError};
use crate::snapshot::MatrixSnapshot;
use crate::wire::{RawSnapshot, Transaction};

/// The sheet script: one URL, GET for snapshots, POST for transactions.
#[derive(Clone, Debug, PartialEq)]
pub struct Backend {
    endpoint: Rc<str>,
}

impl Backend {
    pub fn new(endpoint: &str) -> Self {
        Self { endpoint: endpoint.into() }
    }

    pub async fn fetch_snapshot(&self) -> Result<MatrixSnapshot, FetchError> {
        let response = Request::get(&self.endpoint).send().await?;
        if !response.ok() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response.text().await?;
        decode_snapshot(&body)
    }

    /// The script does not answer CORS, so the response is opaque and ignored. Whether the write
    /// landed shows up in the next snapshot.
    pub async fn submit(&self, transaction: &Transaction) -> Result<(), SubmitError> {
        let body = serde_json::to_string(transaction)?;
        Request::post(&self.endpoint)
            .mode(RequestMode::NoCors)
            .body(JsValue::from_str(&body))?
            .send()
            .await?;
        Ok(())
    }
}

pub fn decode_snapshot(body: &str) -> Result<MatrixSnapshot, FetchError> {
    let raw: RawSnapshot = serde_json::from_str(body)?;
    raw.check()?;
    Ok(raw.to_snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShapeError;

    #[test]
    fn decodes_a_sheet_response() {
        let body = r#"{
            "matrix": [["Better Name", "A", "B"], ["Alice", 40, ""]],
            "betterTotals": [40],
            "golferTotals": [40, 0],
            "totalSpent": 40
        }"#;
        let snapshot = decode_snapshot(body).unwrap();
        assert_eq!(snapshot.rows[0].payouts, vec![40.0, 0.0]);
        assert_eq!(snapshot.grand_total, 40.0);
    }

    #[test]
    fn malformed_bodies_are_distinguishable() {
        assert!(matches!(decode_snapshot("<html>"), Err(FetchError::Decode(_))));
        let short = r#"{ "matrix": [["Better Name", "A"]], "betterTotals": [], "golferTotals": [], "totalSpent": 0 }"#;
        assert!(matches!(
            decode_snapshot(short),
            Err(FetchError::BadSnapshot(ShapeError::GolferTotals { expected: 1, got: 0 }))
        ));
    }
}
