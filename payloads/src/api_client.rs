use crate::{
    Fee, FeeId, Payment, PaymentId, Sport, SportId, SportPlan, SportPlanId,
    Student, StudentId, UserProfile, requests,
};
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the studio backend.
pub struct APIClient {
    /// Base url of the backend, e.g. "https://studio.example.com/api".
    pub address: String,
    pub inner_client: reqwest::Client,
    /// Sent as a bearer token with every request when set.
    pub auth_token: Option<SecretString>,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}/{path}", self.address.trim_end_matches('/'))
    }

    /// Attach credentials to an outgoing request.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = match &self.auth_token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request
    }

    async fn get(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.get(self.format_url(path));
        self.authorize(request).send().await
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request = self.inner_client.post(self.format_url(path)).json(body);
        self.authorize(request).send().await
    }

    async fn patch(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request =
            self.inner_client.patch(self.format_url(path)).json(body);
        self.authorize(request).send().await
    }

    async fn delete(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.delete(self.format_url(path));
        self.authorize(request).send().await
    }
}

/// Methods on the backend API
impl APIClient {
    /// Get the profile of the account the token belongs to.
    pub async fn user_profile(&self) -> Result<UserProfile, ClientError> {
        let response = self.get("profile").await?;
        ok_body(response).await
    }

    pub async fn list_sports(&self) -> Result<Vec<Sport>, ClientError> {
        let response = self.get("sports").await?;
        ok_body(response).await
    }

    pub async fn create_sport(
        &self,
        details: &requests::NewSport,
    ) -> Result<Sport, ClientError> {
        let response = self.post("sports", details).await?;
        ok_body(response).await
    }

    pub async fn update_sport(
        &self,
        sport_id: &SportId,
        details: &requests::NewSport,
    ) -> Result<Sport, ClientError> {
        let response =
            self.patch(&format!("sports/{sport_id}"), details).await?;
        ok_body(response).await
    }

    pub async fn delete_sport(
        &self,
        sport_id: &SportId,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("sports/{sport_id}")).await?;
        ok_empty(response).await
    }

    pub async fn list_sport_plans(
        &self,
    ) -> Result<Vec<SportPlan>, ClientError> {
        let response = self.get("sports/plans").await?;
        ok_body(response).await
    }

    pub async fn create_sport_plan(
        &self,
        details: &requests::NewSportPlan,
    ) -> Result<SportPlan, ClientError> {
        let response = self.post("sports/plans", details).await?;
        ok_body(response).await
    }

    pub async fn update_sport_plan(
        &self,
        plan_id: &SportPlanId,
        details: &requests::NewSportPlan,
    ) -> Result<SportPlan, ClientError> {
        let response = self
            .patch(&format!("sports/plans/{plan_id}"), details)
            .await?;
        ok_body(response).await
    }

    pub async fn delete_sport_plan(
        &self,
        plan_id: &SportPlanId,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("sports/plans/{plan_id}")).await?;
        ok_empty(response).await
    }

    pub async fn list_students(&self) -> Result<Vec<Student>, ClientError> {
        let response = self.get("students").await?;
        ok_body(response).await
    }

    pub async fn create_student(
        &self,
        details: &requests::NewStudent,
    ) -> Result<Student, ClientError> {
        let response = self.post("students", details).await?;
        ok_body(response).await
    }

    pub async fn update_student(
        &self,
        student_id: &StudentId,
        details: &requests::NewStudent,
    ) -> Result<Student, ClientError> {
        let response = self
            .patch(&format!("students/{student_id}"), details)
            .await?;
        ok_body(response).await
    }

    pub async fn delete_student(
        &self,
        student_id: &StudentId,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("students/{student_id}")).await?;
        ok_empty(response).await
    }

    pub async fn list_fees(&self) -> Result<Vec<Fee>, ClientError> {
        let response = self.get("fees").await?;
        ok_body(response).await
    }

    pub async fn create_fee(
        &self,
        details: &requests::NewFee,
    ) -> Result<Fee, ClientError> {
        let response = self.post("fees", details).await?;
        ok_body(response).await
    }

    pub async fn update_fee(
        &self,
        fee_id: &FeeId,
        details: &requests::NewFee,
    ) -> Result<Fee, ClientError> {
        let response = self.patch(&format!("fees/{fee_id}"), details).await?;
        ok_body(response).await
    }

    pub async fn delete_fee(&self, fee_id: &FeeId) -> Result<(), ClientError> {
        let response = self.delete(&format!("fees/{fee_id}")).await?;
        ok_empty(response).await
    }

    pub async fn list_payments(&self) -> Result<Vec<Payment>, ClientError> {
        let response = self.get("payments").await?;
        ok_body(response).await
    }

    /// Record a payment. When it references a fee, the backend also credits
    /// that fee's paid amount.
    pub async fn create_payment(
        &self,
        details: &requests::NewPayment,
    ) -> Result<Payment, ClientError> {
        let response = self.post("payments", details).await?;
        ok_body(response).await
    }

    pub async fn delete_payment(
        &self,
        payment_id: &PaymentId,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("payments/{payment_id}")).await?;
        ok_empty(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing response text.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::APIError(status, _) => Some(*status),
            Self::Network(e) => e.status(),
        }
    }
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(response.json::<T>().await?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(ClientError::APIError(
            response.status(),
            response.text().await?,
        ));
    }
    Ok(())
}
