use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect::Policy, Client, Method, StatusCode, Url};
use serde_json::{json, Value};

use super::builder::ExportPayload;

const MAX_REDIRECTS: usize = 5;

/// Delivery side of the day-end export. Kept behind a trait so the webhook's
/// redirect behavior stays out of the rollup logic and tests can substitute a
/// recording transport.
#[async_trait]
pub trait ExportTransport: Send + Sync {
    async fn send(&self, url: &str, payload: &ExportPayload) -> Result<Value>;
}

/// POSTs the payload to a Google Apps Script web app.
///
/// Apps Script answers the POST with a 302 to a one-time result URL that must
/// be fetched with GET, so automatic redirect following is disabled and the
/// chase is done by hand.
pub struct SheetsTransport {
    client: Client,
}

impl SheetsTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .context("failed to build http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ExportTransport for SheetsTransport {
    async fn send(&self, url: &str, payload: &ExportPayload) -> Result<Value> {
        let mut target: Url = url.parse().context("invalid script url")?;
        let mut method = Method::POST;
        let mut hops = 0usize;

        loop {
            let mut request = self.client.request(method.clone(), target.clone());
            if method == Method::POST {
                request = request.json(payload);
            }
            let response = request.send().await.context("export request failed")?;

            let status = response.status();
            if status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND {
                hops += 1;
                if hops > MAX_REDIRECTS {
                    bail!("too many redirects");
                }
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .context("redirect response without a Location header")?;
                target = response
                    .url()
                    .join(location)
                    .context("invalid redirect location")?;
                method = Method::GET;
                continue;
            }

            let body = response
                .text()
                .await
                .context("failed to read export response")?;
            return Ok(serde_json::from_str(&body).unwrap_or_else(|_| {
                json!({
                    "success": true,
                    "message": "Request completed",
                    "raw": body,
                })
            }));
        }
    }
}
