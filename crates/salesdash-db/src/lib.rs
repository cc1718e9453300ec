// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};
use salesdash_app::{
    FetchError, FilterField, ResultPage, SalesRep, SalesRepId, SalesRepQuery, SalesRepSource,
    SortField, SortOrder,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub mod demo;

pub const APP_NAME: &str = "salesdash";
pub const DEFAULT_DEMO_SIZE: usize = 40;

/// In-memory copy of the sales rep listing that serves `--demo`.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        Ok(Self { conn })
    }

    pub fn bootstrap(&self) -> Result<()> {
        self.conn
            .execute_batch(include_str!("sql/schema.sql"))
            .context("create schema")
    }

    pub fn count_sales_reps(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sales_reps", [], |row| row.get(0))
            .context("count sales reps")?;
        Ok(count.max(0) as u64)
    }

    /// Inserts `rep`, replacing any existing row with the same id.
    pub fn upsert_sales_rep(&self, rep: &SalesRep) -> Result<SalesRepId> {
        let skills = serde_json::to_string(&rep.skills).context("encode skills")?;
        let deals = serde_json::to_string(&rep.deals).context("encode deals")?;
        let clients = serde_json::to_string(&rep.clients).context("encode clients")?;
        self.conn
            .execute(
                "
                INSERT OR REPLACE INTO sales_reps (
                  id, name, role, region, skills, deals, clients
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                ",
                params![
                    rep.id.get(),
                    rep.name,
                    rep.role,
                    rep.region,
                    skills,
                    deals,
                    clients,
                ],
            )
            .with_context(|| format!("insert sales rep {}", rep.id))?;
        Ok(rep.id)
    }

    /// Replaces the table contents with `count` generated reps.
    pub fn seed_demo_data(&self, seed: u64, count: usize) -> Result<usize> {
        let reps = demo::RepFaker::new(seed).sales_reps(count);
        self.replace_sales_reps(&reps)?;
        info!(seed, count = reps.len(), "seeded demo sales reps");
        Ok(reps.len())
    }

    /// Loads a `{"salesReps": [...]}` document, replacing the table contents.
    pub fn import_json(&self, path: &Path) -> Result<usize> {
        let raw = fs::read_to_string(path).with_context(|| {
            format!(
                "read data file {}; check that the path exists and is readable",
                path.display()
            )
        })?;
        let count = self
            .import_json_str(&raw)
            .with_context(|| format!("import {}", path.display()))?;
        info!(path = %path.display(), count, "imported sales reps");
        Ok(count)
    }

    pub fn import_json_str(&self, raw: &str) -> Result<usize> {
        let document: DataFile =
            serde_json::from_str(raw).context("decode JSON data; expected {\"salesReps\": [...]}")?;

        let mut seen = BTreeSet::new();
        for rep in &document.sales_reps {
            if !seen.insert(rep.id) {
                bail!("duplicate sales rep id {} in data file", rep.id);
            }
        }

        self.replace_sales_reps(&document.sales_reps)?;
        Ok(document.sales_reps.len())
    }

    pub fn query_sales_reps(&self, query: &SalesRepQuery) -> Result<ResultPage> {
        let (where_sql, mut values) = filter_clause(query);

        let count_sql = format!("SELECT COUNT(*) FROM sales_reps{where_sql}");
        let total_count: i64 = self
            .conn
            .query_row(&count_sql, params_from_iter(values.iter()), |row| row.get(0))
            .context("count matching sales reps")?;
        let total_count = total_count.max(0) as u64;

        let page_size = u64::from(query.page_size.get());
        let total_pages = total_count.div_ceil(page_size);
        let offset = u64::from(query.page.saturating_sub(1)) * page_size;

        let order_sql = match query.sort_field {
            SortField::Id => format!("id {}", direction(query)),
            field => format!(
                "{} COLLATE NOCASE {dir}, id {dir}",
                field.as_str(),
                dir = direction(query)
            ),
        };
        let select_sql = format!(
            "
            SELECT id, name, role, region, skills, deals, clients
            FROM sales_reps{where_sql}
            ORDER BY {order_sql}
            LIMIT ? OFFSET ?
            "
        );
        values.push(Value::Integer(page_size as i64));
        values.push(Value::Integer(offset as i64));

        debug!(sql = %select_sql.trim(), total_count, "query sales reps");
        let mut stmt = self
            .conn
            .prepare(&select_sql)
            .context("prepare sales reps query")?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), sales_rep_from_row)
            .context("query sales reps")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect sales reps")?;

        Ok(ResultPage {
            rows,
            total_pages: u32::try_from(total_pages)
                .map_err(|_| anyhow!("page count {total_pages} out of range"))?,
            total_count,
        })
    }

    /// Stand-in for a model-backed answer, matching the server's reply.
    pub fn answer(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            bail!("Question is required");
        }
        Ok(placeholder_answer(question))
    }

    /// Swaps the table contents for `reps` in one transaction.
    pub fn replace_sales_reps(&self, reps: &[SalesRep]) -> Result<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin sales rep import")?;
        tx.execute("DELETE FROM sales_reps", [])
            .context("clear sales reps")?;
        for rep in reps {
            self.upsert_sales_rep(rep)?;
        }
        tx.commit().context("commit sales rep import")
    }
}

impl SalesRepSource for Store {
    fn fetch_page(&self, query: &SalesRepQuery) -> Result<ResultPage, FetchError> {
        self.query_sales_reps(query)
            .map_err(|error| FetchError::NetworkFailure(format!("{error:#}")))
    }
}

pub fn placeholder_answer(question: &str) -> String {
    format!("This is a placeholder answer to your question: {question}")
}

#[derive(Debug, Deserialize)]
struct DataFile {
    #[serde(rename = "salesReps", default)]
    sales_reps: Vec<SalesRep>,
}

fn direction(query: &SalesRepQuery) -> &'static str {
    match query.sort_order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

fn filter_clause(query: &SalesRepQuery) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    for (field, raw) in &query.filters {
        let value = raw.trim();
        if value.is_empty() {
            continue;
        }
        match field {
            FilterField::Id => match value.parse::<i64>() {
                Ok(id) => {
                    clauses.push("id = ?".to_owned());
                    values.push(Value::Integer(id));
                }
                // A non-numeric id can never match.
                Err(_) => clauses.push("0".to_owned()),
            },
            FilterField::Name | FilterField::Role | FilterField::Region => {
                clauses.push(format!("{} LIKE ? ESCAPE '\\'", field.as_str()));
                values.push(Value::Text(format!("%{}%", escape_like(value))));
            }
        }
    }

    if clauses.is_empty() {
        return (String::new(), values);
    }
    (format!(" WHERE {}", clauses.join(" AND ")), values)
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn sales_rep_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SalesRep> {
    let skills: String = row.get(4)?;
    let deals: String = row.get(5)?;
    let clients: String = row.get(6)?;
    Ok(SalesRep {
        id: SalesRepId::new(row.get(0)?),
        name: row.get(1)?,
        role: row.get(2)?,
        region: row.get(3)?,
        skills: decode_json_column(4, &skills)?,
        deals: decode_json_column(5, &deals)?,
        clients: decode_json_column(6, &clients)?,
    })
}

fn decode_json_column<T: serde::de::DeserializeOwned>(
    index: usize,
    raw: &str,
) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}
