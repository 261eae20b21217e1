use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
            );
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Insert a row and return the created representation.
    pub async fn insert_returning<T>(&self, table: &str, row: Value,
                                     auth_token: Option<&str>) -> Result<T>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}", table);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.request_with_headers(
            Method::POST,
            &path,
            auth_token,
            Some(row),
            Some(headers),
        ).await?;

        let created = result.into_iter().next()
            .ok_or_else(|| anyhow!("Insert into {} returned no rows", table))?;

        Ok(serde_json::from_value(created)?)
    }

    /// Fetch a single row by id with a field projection. Absence is `None`,
    /// not an error, so callers can tell a miss from a store failure.
    pub async fn find_by_id<T>(&self, table: &str, id: &str, select: &str,
                               auth_token: Option<&str>) -> Result<Option<T>>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?id=eq.{}&select={}", table, id, select);

        let result: Vec<Value> = self.request(
            Method::GET,
            &path,
            auth_token,
            None,
        ).await?;

        match result.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// Fetch all rows matching a PostgREST filter expression. The `select`
    /// projection may embed related rows, e.g. `client:clients(id,name)`.
    pub async fn find_filtered<T>(&self, table: &str, filter: &str, select: &str,
                                  auth_token: Option<&str>) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let path = format!("/rest/v1/{}?{}&select={}", table, filter, select);

        let result: Vec<Value> = self.request(
            Method::GET,
            &path,
            auth_token,
            None,
        ).await?;

        let rows = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;

        Ok(rows)
    }

    /// Patch a row by id. Succeeds whether or not the row exists.
    pub async fn update_by_id(&self, table: &str, id: &str, patch: Value,
                              auth_token: Option<&str>) -> Result<()> {
        let path = format!("/rest/v1/{}?id=eq.{}", table, id);

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let _: Vec<Value> = self.request_with_headers(
            Method::PATCH,
            &path,
            auth_token,
            Some(patch),
            Some(headers),
        ).await?;

        Ok(())
    }
}
