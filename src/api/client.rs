//! reqwest implementation of [`HotelApi`]

use async_trait::async_trait;
use reqwest::{multipart, Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::config::Config;
use crate::models::{
    AttachedDocument, Client, ClientForm, InvoiceStatus, InvoiceStatusUpdate, QuotePayload,
    QuoteRecord, QuoteSummary,
};

use super::{ApiError, DocumentUpload, HotelApi};

pub struct HttpHotelApi {
    http: HttpClient,
    base_url: String,
}

impl HttpHotelApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .user_agent(concat!("bnb-admin/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// Single records are addressed as `?id=`, not by path
    fn record(&self, builder: RequestBuilder, id: u64) -> RequestBuilder {
        builder.query(&[("id", id)])
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("Hotel API returned {}: {}", status, body);
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Decode a JSON body, treating `{"error": "..."}` as a failure even
    /// when it comes with a 200.
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let value: Value = response.json().await?;
        if let Some(message) = error_message(&value) {
            return Err(ApiError::Rejected(message));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Like [`Self::read_json`] but for write calls, whose body is ignored
    /// unless it reports an error.
    async fn expect_ok(response: Response) -> Result<(), ApiError> {
        let body = response.text().await?;
        if let Ok(value) = serde_json::from_str::<Value>(&body) {
            if let Some(message) = error_message(&value) {
                return Err(ApiError::Rejected(message));
            }
        }
        Ok(())
    }
}

fn error_message(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn not_found(resource: &'static str, id: u64) -> impl FnOnce(ApiError) -> ApiError {
    move |err| match err {
        ApiError::Rejected(message) => ApiError::NotFound {
            resource,
            id,
            message,
        },
        ApiError::Status { status: 404, body } => ApiError::NotFound {
            resource,
            id,
            message: body,
        },
        other => other,
    }
}

#[async_trait]
impl HotelApi for HttpHotelApi {
    #[instrument(skip(self))]
    async fn list_clients(&self) -> Result<Vec<Client>, ApiError> {
        let response = Self::send(self.http.get(self.url("clients"))).await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self))]
    async fn get_client(&self, id: u64) -> Result<Client, ApiError> {
        let request = self.record(self.http.get(self.url("clients")), id);
        let response = Self::send(request).await.map_err(not_found("client", id))?;
        Self::read_json(response).await.map_err(not_found("client", id))
    }

    #[instrument(skip(self, client))]
    async fn create_client(&self, client: &ClientForm) -> Result<(), ApiError> {
        let response = Self::send(self.http.post(self.url("clients")).json(client)).await?;
        debug!("Created client {}", client.email_address);
        Self::expect_ok(response).await
    }

    #[instrument(skip(self, client))]
    async fn update_client(&self, id: u64, client: &ClientForm) -> Result<(), ApiError> {
        let request = self.record(self.http.put(self.url("clients")), id).json(client);
        let response = Self::send(request).await.map_err(not_found("client", id))?;
        Self::expect_ok(response).await
    }

    #[instrument(skip(self))]
    async fn delete_client(&self, id: u64) -> Result<(), ApiError> {
        let request = self.record(self.http.delete(self.url("clients")), id);
        let response = Self::send(request).await.map_err(not_found("client", id))?;
        Self::expect_ok(response).await
    }

    #[instrument(skip(self))]
    async fn list_quotes(&self) -> Result<Vec<QuoteSummary>, ApiError> {
        let response = Self::send(self.http.get(self.url("quotes"))).await?;
        Self::read_json(response).await
    }

    #[instrument(skip(self))]
    async fn get_quote(&self, id: u64) -> Result<QuoteRecord, ApiError> {
        let request = self.record(self.http.get(self.url("quotes")), id);
        let response = Self::send(request).await.map_err(not_found("quote", id))?;
        Self::read_json(response).await.map_err(not_found("quote", id))
    }

    #[instrument(skip(self, quote))]
    async fn create_quote(&self, quote: &QuotePayload) -> Result<(), ApiError> {
        let response = Self::send(self.http.post(self.url("quotes")).json(quote)).await?;
        debug!("Created quote for client {}", quote.client_id);
        Self::expect_ok(response).await
    }

    #[instrument(skip(self, quote))]
    async fn update_quote(&self, id: u64, quote: &QuotePayload) -> Result<(), ApiError> {
        let request = self.record(self.http.put(self.url("quotes")), id).json(quote);
        let response = Self::send(request).await.map_err(not_found("quote", id))?;
        Self::expect_ok(response).await
    }

    #[instrument(skip(self))]
    async fn set_invoice_status(&self, id: u64, status: InvoiceStatus) -> Result<(), ApiError> {
        let body = InvoiceStatusUpdate {
            invoice_status: status,
        };
        let request = self.record(self.http.put(self.url("quotes")), id).json(&body);
        let response = Self::send(request).await.map_err(not_found("quote", id))?;
        Self::expect_ok(response).await
    }

    #[instrument(skip(self))]
    async fn delete_quote(&self, id: u64) -> Result<(), ApiError> {
        let request = self.record(self.http.delete(self.url("quotes")), id);
        let response = Self::send(request).await.map_err(not_found("quote", id))?;
        Self::expect_ok(response).await
    }

    #[instrument(skip(self, upload), fields(filename = %upload.filename))]
    async fn upload_document(&self, upload: DocumentUpload) -> Result<AttachedDocument, ApiError> {
        let mut part = multipart::Part::bytes(upload.bytes).file_name(upload.filename);
        if let Some(content_type) = upload.content_type {
            part = part.mime_str(&content_type)?;
        }
        let form = multipart::Form::new().part("document", part);

        let response = Self::send(self.http.post(self.url("upload")).multipart(form)).await?;
        Self::read_json(response).await
    }
}
