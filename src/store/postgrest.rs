use anyhow::Result;
use reqwest::{
    Method,
    blocking::{Client, RequestBuilder},
};

use super::{Filter, MEMOS_TABLE, MemoBackend, MemoPatch, MemoRow, Select, query::escape_like};

/// The hosted table, reached through its PostgREST endpoint (`/rest/v1/memos`).
pub(crate) struct PostgrestBackend {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl PostgrestBackend {
    pub(crate) fn new(base_url: &str, api_key: &str) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    fn with_client(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            endpoint: table_endpoint(base_url),
            api_key: api_key.to_string(),
        }
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

impl MemoBackend for PostgrestBackend {
    fn select(&self, select: &Select) -> Result<Vec<MemoRow>> {
        let response = self
            .request(Method::GET)
            .query(&select_params(select))
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    fn insert(&self, rows: &[MemoRow]) -> Result<Vec<MemoRow>> {
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .query(&[("select", "*")])
            .json(rows)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    fn update(&self, filter: &Filter, patch: &MemoPatch) -> Result<Vec<MemoRow>> {
        let mut params = filter_params(filter);
        params.push(("select".to_string(), "*".to_string()));
        let response = self
            .request(Method::PATCH)
            .header("Prefer", "return=representation")
            .query(&params)
            .json(patch)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }

    fn delete(&self, filter: &Filter) -> Result<usize> {
        let mut params = filter_params(filter);
        params.push(("select".to_string(), "id".to_string()));
        let response = self
            .request(Method::DELETE)
            .header("Prefer", "return=representation")
            .query(&params)
            .send()?
            .error_for_status()?;
        let deleted: Vec<serde_json::Value> = response.json()?;
        Ok(deleted.len())
    }
}

fn table_endpoint(base_url: &str) -> String {
    format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), MEMOS_TABLE)
}

fn select_params(select: &Select) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(filter_params(&select.filter));
    if select.newest_first {
        params.push(("order".to_string(), "created_at.desc".to_string()));
    }
    if let Some(limit) = select.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

fn filter_params(filter: &Filter) -> Vec<(String, String)> {
    match filter {
        Filter::All => Vec::new(),
        Filter::Eq(column, value) => vec![(column.name().to_string(), format!("eq.{value}"))],
        Filter::Neq(column, value) => vec![(column.name().to_string(), format!("neq.{value}"))],
        Filter::AnyContains(columns, needle) => {
            let pattern = quote_value(&format!("*{}*", escape_like(needle)));
            let terms = columns
                .iter()
                .map(|column| format!("{}.ilike.{}", column.name(), pattern))
                .collect::<Vec<_>>()
                .join(",");
            vec![("or".to_string(), format!("({terms})"))]
        }
    }
}

/// Double-quotes a value so PostgREST's reserved characters (`,.:()`) are taken literally.
fn quote_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}
