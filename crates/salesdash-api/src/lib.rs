// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use salesdash_app::{FetchError, PageSize, ResultPage, SalesRep, SalesRepQuery, SalesRepSource};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const SALES_REPS_PATH: &str = "api/sales-reps";
pub const AI_PATH: &str = "api/ai";

/// Blocking client for the dashboard API: the paginated sales rep listing and
/// the question endpoint.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: HttpClient,
}

impl Client {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("api.base_url must not be empty");
        }

        // A trailing slash keeps `Url::join` from replacing the last segment.
        let base_url = Url::parse(&format!("{trimmed}/"))
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "api.base_url {:?} must use http or https, got {}://",
                trimmed,
                base_url.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn sales_reps_url(&self, query: &SalesRepQuery) -> Result<Url> {
        let mut url = self
            .base_url
            .join(SALES_REPS_PATH)
            .context("build sales reps URL")?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());
        Ok(url)
    }

    pub fn list_sales_reps(&self, query: &SalesRepQuery) -> Result<ResultPage, FetchError> {
        let url = self
            .sales_reps_url(query)
            .map_err(|error| FetchError::NetworkFailure(format!("{error:#}")))?;
        debug!(%url, "GET sales reps");

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|error| {
                FetchError::NetworkFailure(connection_message(self.base_url(), &error))
            })?;

        let status = response.status();
        let body = response.text().map_err(|error| {
            FetchError::NetworkFailure(format!("read response body: {error}"))
        })?;
        if !status.is_success() {
            return Err(FetchError::Rejected {
                status: status.as_u16(),
                message: clean_error_message(status, &body),
            });
        }

        decode_sales_reps(&body)
    }

    /// Reachability check behind `--check`: asks for a single row.
    pub fn ping(&self) -> Result<()> {
        let query = SalesRepQuery {
            page_size: PageSize::One,
            ..SalesRepQuery::default()
        };
        self.list_sales_reps(&query).map(|_| ()).map_err(|error| {
            anyhow!(
                "{error} -- check that the API is running at {} and [api].base_url is correct",
                self.base_url()
            )
        })
    }

    pub fn ask(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            bail!("Question is required");
        }

        let url = self.base_url.join(AI_PATH).context("build AI URL")?;
        debug!(%url, chars = question.len(), "POST question");
        let response = self
            .http
            .post(url)
            .json(&AskRequest { question })
            .send()
            .map_err(|error| anyhow!(connection_message(self.base_url(), &error)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("server error ({}): {}", status.as_u16(), clean_error_message(status, &body));
        }

        let parsed: AskResponse = response.json().context("decode AI response")?;
        Ok(parsed.answer)
    }
}

impl SalesRepSource for Client {
    fn fetch_page(&self, query: &SalesRepQuery) -> Result<ResultPage, FetchError> {
        self.list_sales_reps(query)
    }
}

/// Decodes a `{sales_reps, total_page, total_data}` body.
pub fn decode_sales_reps(body: &str) -> Result<ResultPage, FetchError> {
    let parsed: SalesRepsResponse = serde_json::from_str(body)
        .map_err(|error| FetchError::InvalidResponse(error.to_string()))?;
    ResultPage::from_wire(parsed.sales_reps, parsed.total_page, parsed.total_data)
}

fn connection_message(base_url: &str, error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return format!("request to {base_url} timed out ({error})");
    }
    format!("cannot reach {base_url} -- is the API server running? ({error})")
}

fn clean_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<DetailEnvelope>(body) {
        match parsed.detail {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => return detail,
            Some(serde_json::Value::Null) | None => {}
            Some(other) => return other.to_string(),
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return trimmed.to_owned();
    }

    status
        .canonical_reason()
        .unwrap_or("unexpected status")
        .to_owned()
}

#[derive(Debug, Deserialize)]
struct SalesRepsResponse {
    sales_reps: Vec<SalesRep>,
    total_page: i64,
    total_data: i64,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

#[derive(Debug, Deserialize)]
struct AskResponse {
    answer: String,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    detail: Option<serde_json::Value>,
}
