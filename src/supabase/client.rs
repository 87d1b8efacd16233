use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use super::SupabaseError;
use crate::models::{DisplayNameUpdate, FamilyConnection, Profile};
use crate::repair::{ConnectionStore, ProfileStore, RepairError};

pub const CONNECTIONS_TABLE: &str = "family_connections";
pub const PROFILES_TABLE: &str = "profiles";

/// Blocking PostgREST client authenticated with the service-role key.
///
/// The service role bypasses row-level security, which the audit needs to
/// see every user's connections.
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl SupabaseClient {
    pub fn new(base_url: &str, service_key: &str, timeout_secs: u64) -> Result<Self, SupabaseError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SupabaseError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(
        &self,
        builder: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        builder
            .header("apikey", &self.service_key)
            .header("Authorization", format!("Bearer {}", self.service_key))
    }

    fn send(
        &self,
        builder: reqwest::blocking::RequestBuilder,
    ) -> Result<reqwest::blocking::Response, SupabaseError> {
        let response = self.authorized(builder).send().map_err(|e| {
            if e.is_connect() {
                SupabaseError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                SupabaseError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                SupabaseError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn read_rows<T: DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<Vec<T>, SupabaseError> {
        let body = response
            .text()
            .map_err(|e| SupabaseError::ResponseParsing(e.to_string()))?;
        parse_rows(&body)
    }

    /// `GET /rest/v1/{table}?select=*`
    pub fn select_all<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, SupabaseError> {
        let request = self
            .client
            .get(self.rest_url(table))
            .query(&[("select", "*")]);
        Self::read_rows(self.send(request)?)
    }

    /// `GET /rest/v1/{table}?select=*&id=eq.{id}`; absent when no row matches.
    pub fn select_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: &Uuid,
    ) -> Result<Option<T>, SupabaseError> {
        let request = self
            .client
            .get(self.rest_url(table))
            .query(&[("select", "*".to_string()), ("id", id_filter(id))]);
        let rows: Vec<T> = Self::read_rows(self.send(request)?)?;
        Ok(rows.into_iter().next())
    }

    /// `PATCH /rest/v1/{table}?id=eq.{id}`. Fails with `RowNotFound` when the
    /// filter matched nothing.
    pub fn update_by_id<B: Serialize>(
        &self,
        table: &str,
        id: &Uuid,
        body: &B,
    ) -> Result<(), SupabaseError> {
        let request = self
            .client
            .patch(self.rest_url(table))
            .query(&[("id", id_filter(id))])
            .header("Prefer", "return=representation")
            .json(body);
        let rows: Vec<serde_json::Value> = Self::read_rows(self.send(request)?)?;
        if rows.is_empty() {
            return Err(SupabaseError::RowNotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

/// PostgREST equality filter value.
fn id_filter(id: &Uuid) -> String {
    format!("eq.{id}")
}

fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, SupabaseError> {
    serde_json::from_str(body).map_err(|e| SupabaseError::ResponseParsing(e.to_string()))
}

impl ConnectionStore for SupabaseClient {
    fn list_connections(&self) -> Result<Vec<FamilyConnection>, RepairError> {
        Ok(self.select_all::<FamilyConnection>(CONNECTIONS_TABLE)?)
    }

    fn update_display_names(
        &self,
        id: &Uuid,
        update: &DisplayNameUpdate,
    ) -> Result<(), RepairError> {
        Ok(self.update_by_id(CONNECTIONS_TABLE, id, update)?)
    }
}

impl ProfileStore for SupabaseClient {
    fn get_profile(&self, id: &Uuid) -> Result<Option<Profile>, RepairError> {
        Ok(self.select_by_id::<Profile>(PROFILES_TABLE, id)?)
    }
}
