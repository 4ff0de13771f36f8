//! A stand-in for the studio backend, serving the REST API from memory.

pub mod routes;
pub mod store;

use actix_web::dev::Server;
use actix_web::http::header;
use actix_web::{
    App, HttpRequest, HttpResponse, HttpServer, ResponseError, body::BoxBody,
    web,
};
use payloads::{Role, UserId, UserProfile};
use std::net::TcpListener;
use std::sync::{Mutex, MutexGuard};

use store::{Store, StoreError};

/// A request as the backend saw it, recorded before it is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
}

pub struct BackendOptions {
    /// When set, requests must carry `Authorization: Bearer <token>`.
    pub token: Option<String>,
    /// Returned from `GET /profile`.
    pub profile: UserProfile,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            token: None,
            profile: UserProfile {
                id: UserId(1),
                name: "Studio Admin".into(),
                email: "admin@studio.test".into(),
                role: Role::Admin,
                student_id: None,
            },
        }
    }
}

pub struct Backend {
    store: Mutex<Store>,
    requests: Mutex<Vec<RecordedRequest>>,
    unavailable: Mutex<bool>,
    token: Option<String>,
    profile: Mutex<UserProfile>,
}

impl Backend {
    pub fn new(options: BackendOptions) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            requests: Mutex::new(Vec::new()),
            unavailable: Mutex::new(false),
            token: options.token,
            profile: Mutex::new(options.profile),
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).map(|r| r.clone()).unwrap_or_default()
    }

    /// While unavailable, every request is answered with 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut flag) = lock(&self.unavailable) {
            *flag = unavailable;
        }
    }

    pub fn set_profile(&self, profile: UserProfile) {
        if let Ok(mut current) = lock(&self.profile) {
            *current = profile;
        }
    }

    pub fn profile(&self) -> Result<UserProfile, APIError> {
        Ok(lock(&self.profile)?.clone())
    }

    pub fn store(&self) -> Result<MutexGuard<'_, Store>, APIError> {
        lock(&self.store)
    }

    /// Record the request, then check the backend is up and the caller
    /// presented the configured token.
    pub fn admit(&self, req: &HttpRequest) -> Result<(), APIError> {
        lock(&self.requests)?.push(RecordedRequest {
            method: req.method().to_string(),
            path: req.path().to_string(),
        });

        if *lock(&self.unavailable)? {
            return Err(APIError::Unavailable);
        }

        let Some(expected) = &self.token else {
            return Ok(());
        };
        let presented = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        match presented {
            Some(token) if token == expected => Ok(()),
            Some(_) => Err(APIError::AuthError(anyhow::anyhow!(
                "bearer token rejected"
            ))),
            None => Err(APIError::AuthError(anyhow::anyhow!(
                "missing bearer token"
            ))),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, APIError> {
    mutex.lock().map_err(|_| {
        APIError::UnexpectedError(anyhow::anyhow!("backend lock poisoned"))
    })
}

/// Build the server, but not await it.
///
/// Returns the port the server bound to; pass 0 to let the OS pick one.
pub fn build(
    ip: &str,
    port: u16,
    backend: web::Data<Backend>,
) -> std::io::Result<(Server, u16)> {
    let listener = TcpListener::bind(format!("{ip}:{port}"))?;
    let port = listener.local_addr()?.port();
    let server = HttpServer::new(move || {
        App::new()
            .service(routes::api_services())
            .app_data(backend.clone())
    })
    .listen(listener)?
    .run();
    Ok((server, port))
}

#[derive(Debug, thiserror::Error)]
pub enum APIError {
    #[error("Authentication failed")]
    AuthError(#[source] anyhow::Error),
    #[error("Bad request")]
    BadRequest(#[source] anyhow::Error),
    #[error("Not found")]
    NotFound(#[source] anyhow::Error),
    #[error("Service unavailable")]
    Unavailable,
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ResponseError for APIError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::AuthError(e) => {
                HttpResponse::Unauthorized().body(format!("{self}: {e}"))
            }
            Self::BadRequest(e) => {
                HttpResponse::BadRequest().body(format!("{self}: {e}"))
            }
            Self::NotFound(e) => {
                HttpResponse::NotFound().body(format!("{self}: {e}"))
            }
            Self::Unavailable => {
                HttpResponse::ServiceUnavailable().body(self.to_string())
            }
            Self::UnexpectedError(_) => {
                HttpResponse::InternalServerError().body(self.to_string())
            }
        }
    }
}

impl From<StoreError> for APIError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::SportNotFound
            | StoreError::SportPlanNotFound
            | StoreError::StudentNotFound
            | StoreError::FeeNotFound
            | StoreError::PaymentNotFound => APIError::NotFound(e.into()),
            _ => APIError::BadRequest(e.into()),
        }
    }
}
