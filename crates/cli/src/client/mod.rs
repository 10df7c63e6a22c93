use std::time::Duration;

use api_types::{
    ErrorResponse,
    transaction::{PageResponse, TransactionNew, TransactionRecord, TransactionUpdate},
};
use feed::{QueryDescriptor, RemoteStore, StoreError};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// [`RemoteStore`] backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: Url,
    http: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl HttpStore {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let base_url =
            Url::parse(&config.base_url).map_err(|err| AppError::BaseUrl(err.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let credentials = (!config.username.is_empty())
            .then(|| (config.username.clone(), config.password.clone()));
        Ok(Self {
            base_url,
            http,
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((username, password)) => req.basic_auth(username, Some(password)),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> std::result::Result<Response, StoreError> {
        let res = self
            .authorize(req)
            .send()
            .await
            .map_err(|err| StoreError::Network(err.to_string()))?;

        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status().as_u16();
        let message = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(StoreError::Rejected { status, message })
    }

    async fn decode<T: DeserializeOwned>(res: Response) -> std::result::Result<T, StoreError> {
        res.json::<T>()
            .await
            .map_err(|err| StoreError::Network(format!("invalid response body: {err}")))
    }
}

impl RemoteStore for HttpStore {
    async fn fetch_page(
        &self,
        query: Option<&QueryDescriptor>,
        page: u64,
        limit: u64,
    ) -> std::result::Result<PageResponse, StoreError> {
        let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(query) = query {
            params.extend(query.to_params());
        }

        let req = self.http.get(self.url("transactions")).query(&params);
        let res = self.send(req).await?;
        Self::decode(res).await
    }

    async fn create(
        &self,
        payload: &TransactionNew,
    ) -> std::result::Result<TransactionRecord, StoreError> {
        let req = self.http.post(self.url("transactions")).json(payload);
        let res = self.send(req).await?;
        Self::decode(res).await
    }

    async fn update(
        &self,
        id: Uuid,
        payload: &TransactionUpdate,
    ) -> std::result::Result<TransactionRecord, StoreError> {
        let req = self
            .http
            .put(self.url(&format!("transactions/{id}")))
            .json(payload);
        let res = self.send(req).await?;
        Self::decode(res).await
    }

    async fn delete(&self, id: Uuid) -> std::result::Result<(), StoreError> {
        let req = self.http.delete(self.url(&format!("transactions/{id}")));
        self.send(req).await?;
        Ok(())
    }
}

/// User-facing text for a store failure.
pub fn message_for_error(err: &StoreError) -> String {
    match err {
        StoreError::Network(message) => format!("Server unreachable: {message}"),
        StoreError::Rejected { status: 401 | 403, .. } => {
            "Wrong credentials or missing permission.".to_string()
        }
        StoreError::Rejected { status: 404, .. } => "Transaction not found.".to_string(),
        StoreError::Rejected {
            status: 422,
            message,
        } => format!("Validation error: {message}"),
        StoreError::Rejected { status, message } => {
            format!("Server error ({status}): {message}")
        }
    }
}
