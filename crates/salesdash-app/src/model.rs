// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::ids::SalesRepId;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DealStatus {
    ClosedWon,
    ClosedLost,
    InProgress(String),
}

impl DealStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
            Self::InProgress(label) => label.as_str(),
        }
    }
}

impl From<String> for DealStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Closed Won" => Self::ClosedWon,
            "Closed Lost" => Self::ClosedLost,
            _ => Self::InProgress(value),
        }
    }
}

impl From<DealStatus> for String {
    fn from(value: DealStatus) -> Self {
        match value {
            DealStatus::InProgress(label) => label,
            other => other.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub client: String,
    pub value: f64,
    pub status: DealStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub name: String,
    pub industry: String,
    pub contact: String,
}

/// One row of the sales rep table. Only `id` has meaning to the controller;
/// the remaining fields belong to whoever serves the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRep {
    pub id: SalesRepId,
    pub name: String,
    pub role: String,
    pub region: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub clients: Vec<Client>,
}

impl SalesRep {
    pub fn total_deal_value(&self) -> f64 {
        self.deals.iter().map(|deal| deal.value).sum()
    }

    pub fn won_deal_value(&self) -> f64 {
        self.deals
            .iter()
            .filter(|deal| deal.status == DealStatus::ClosedWon)
            .map(|deal| deal.value)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    pub rows: Vec<SalesRep>,
    pub total_pages: u32,
    pub total_count: u64,
}

impl ResultPage {
    /// Builds a page from the raw counters a source reports, rejecting values
    /// no well-formed source produces.
    pub fn from_wire(
        rows: Vec<SalesRep>,
        total_pages: i64,
        total_count: i64,
    ) -> Result<Self, FetchError> {
        let total_pages = u32::try_from(total_pages).map_err(|_| {
            FetchError::InvalidResponse(format!(
                "total_page must be non-negative, got {total_pages}"
            ))
        })?;
        let total_count = u64::try_from(total_count).map_err(|_| {
            FetchError::InvalidResponse(format!(
                "total_data must be non-negative, got {total_count}"
            ))
        })?;

        for rep in &rows {
            if let Some(deal) = rep
                .deals
                .iter()
                .find(|deal| !deal.value.is_finite() || deal.value < 0.0)
            {
                return Err(FetchError::InvalidResponse(format!(
                    "sales rep {} has deal with {} valued {}",
                    rep.id, deal.client, deal.value
                )));
            }
        }

        Ok(Self {
            rows,
            total_pages,
            total_count,
        })
    }

    pub fn position_of(&self, id: SalesRepId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }
}
