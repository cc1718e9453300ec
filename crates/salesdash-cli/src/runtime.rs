// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use salesdash_app::{FetchError, FetchTicket, ResultPage, SalesRepQuery, SalesRepSource};
use salesdash_db::Store;
use salesdash_tui::{AppRuntime, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;
use tracing::debug;

/// Talks to the dashboard API. Requests run on worker threads so the UI keeps
/// drawing while they are in flight.
pub struct HttpRuntime {
    client: salesdash_api::Client,
}

impl HttpRuntime {
    pub fn new(client: salesdash_api::Client) -> Self {
        Self { client }
    }
}

impl AppRuntime for HttpRuntime {
    fn fetch_sales_reps(&mut self, query: &SalesRepQuery) -> Result<ResultPage, FetchError> {
        self.client.list_sales_reps(query)
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.client.ask(question)
    }

    fn source_label(&self) -> String {
        self.client.base_url().to_owned()
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::spawn(move || {
            let result = client.list_sales_reps(&ticket.query);
            if tx
                .send(InternalEvent::Fetched {
                    request_id: ticket.request_id,
                    result,
                })
                .is_err()
            {
                debug!(request_id = ticket.request_id, "ui gone before fetch finished");
            }
        });
        Ok(())
    }

    fn spawn_ask(
        &mut self,
        request_id: u64,
        question: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = self.client.clone();
        let question = question.to_owned();
        thread::spawn(move || {
            let result = client.ask(&question).map_err(|error| format!("{error:#}"));
            if tx
                .send(InternalEvent::Answered { request_id, result })
                .is_err()
            {
                debug!(request_id, "ui gone before answer arrived");
            }
        });
        Ok(())
    }
}

/// Serves the dashboard from the local store, synchronously.
pub struct DemoRuntime<'a> {
    store: &'a Store,
    label: String,
}

impl<'a> DemoRuntime<'a> {
    pub fn new(store: &'a Store, label: impl Into<String>) -> Self {
        Self {
            store,
            label: label.into(),
        }
    }
}

impl AppRuntime for DemoRuntime<'_> {
    fn fetch_sales_reps(&mut self, query: &SalesRepQuery) -> Result<ResultPage, FetchError> {
        self.store.fetch_page(query)
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        self.store.answer(question)
    }

    fn source_label(&self) -> String {
        self.label.clone()
    }
}
