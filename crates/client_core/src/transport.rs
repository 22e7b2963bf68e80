use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::EmployeeId,
    protocol::{CreateEmployeeRequest, EmployeeListResponse, UpdateEmployeeRequest},
};
use tracing::debug;
use url::Url;

use crate::{error::ClientError, query::ListQuery};

const EMPLOYEE_ROUTE: &str = "api/employee";

/// The external employee CRUD API.
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    async fn list_employees(&self, query: &ListQuery) -> Result<EmployeeListResponse, ClientError>;
    async fn create_employee(&self, request: &CreateEmployeeRequest) -> Result<(), ClientError>;
    async fn update_employee(&self, request: &UpdateEmployeeRequest) -> Result<(), ClientError>;
    async fn delete_employee(&self, id: &EmployeeId) -> Result<(), ClientError>;
}

pub struct HttpEmployeeApi {
    http: Client,
    base_url: Url,
}

impl HttpEmployeeApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        // Keep any path prefix on the base: `http://host/prefix` + `api/employee`.
        let base_url = Url::parse(&format!("{trimmed}/")).map_err(|source| {
            ClientError::InvalidBaseUrl {
                url: base_url.to_string(),
                source,
            }
        })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Result<Url, ClientError> {
        self.base_url
            .join(EMPLOYEE_ROUTE)
            .map_err(|source| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source,
            })
    }

    fn item_url(&self, id: &EmployeeId) -> Result<Url, ClientError> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .push(&id.0);
        Ok(url)
    }
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl EmployeeApi for HttpEmployeeApi {
    async fn list_employees(&self, query: &ListQuery) -> Result<EmployeeListResponse, ClientError> {
        let url = self.collection_url()?;
        let params = query.to_params();
        debug!(%url, ?params, "GET employee list");
        let response = self.http.get(url).query(&params).send().await?;
        let body = ensure_success(response).await?.json().await?;
        Ok(body)
    }

    async fn create_employee(&self, request: &CreateEmployeeRequest) -> Result<(), ClientError> {
        let url = self.collection_url()?;
        debug!(%url, "POST employee");
        let response = self.http.post(url).json(request).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update_employee(&self, request: &UpdateEmployeeRequest) -> Result<(), ClientError> {
        let url = self.collection_url()?;
        debug!(%url, id = %request.id, "PUT employee");
        let response = self.http.put(url).json(request).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_employee(&self, id: &EmployeeId) -> Result<(), ClientError> {
        let url = self.item_url(id)?;
        debug!(%url, "DELETE employee");
        let response = self.http.delete(url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
