pub mod backend;
pub mod mock;
pub mod telemetry;

use actix_web::web;
use payloads::{
    APIClient, Fee, FeeId, Payment, Sport, SportId, SportPlan, Student,
    StudentId, requests,
};
use reqwest::StatusCode;
use secrecy::SecretString;
use tracing_subscriber::util::SubscriberInitExt;

pub use backend::{Backend, BackendOptions, RecordedRequest};

pub struct TestApp {
    pub port: u16,
    pub client: APIClient,
    pub backend: web::Data<Backend>,
    token: Option<String>,
}

impl TestApp {
    /// Base url of the API, as clients should be configured with it.
    pub fn address(&self) -> String {
        format!("http://127.0.0.1:{}/api", self.port)
    }

    /// A fresh client for the running backend, carrying the configured
    /// token if there is one.
    pub fn new_client(&self) -> APIClient {
        let client = APIClient::new(self.address());
        match &self.token {
            Some(token) => {
                client.with_auth_token(SecretString::from(token.clone()))
            }
            None => client,
        }
    }

    /// Every request the backend has received, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.backend.requests()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    pub async fn create_test_sport(&self) -> anyhow::Result<Sport> {
        let details = sport_draft("Boxing").validate()?;
        Ok(self.client.create_sport(&details).await?)
    }

    pub async fn create_test_plan(
        &self,
        sport_id: SportId,
    ) -> anyhow::Result<SportPlan> {
        let details = sport_plan_draft(sport_id).validate()?;
        Ok(self.client.create_sport_plan(&details).await?)
    }

    pub async fn create_test_student(
        &self,
        sport_id: SportId,
    ) -> anyhow::Result<Student> {
        let details = student_draft(sport_id).validate()?;
        Ok(self.client.create_student(&details).await?)
    }

    pub async fn create_test_fee(
        &self,
        student_id: StudentId,
    ) -> anyhow::Result<Fee> {
        let details = fee_draft(student_id).validate()?;
        Ok(self.client.create_fee(&details).await?)
    }

    pub async fn create_test_payment(
        &self,
        student_id: StudentId,
        fee_id: Option<FeeId>,
    ) -> anyhow::Result<Payment> {
        let details = payment_draft(student_id, fee_id).validate()?;
        Ok(self.client.create_payment(&details).await?)
    }

    /// A sport with a plan and one student enrolled in it.
    pub async fn create_enrolled_student(
        &self,
    ) -> anyhow::Result<(Sport, SportPlan, Student)> {
        let sport = self.create_test_sport().await?;
        let plan = self.create_test_plan(sport.id).await?;
        let mut draft = student_draft(sport.id);
        draft.sport_plan_id = plan.id.to_string();
        let student = self.client.create_student(&draft.validate()?).await?;
        Ok((sport, plan, student))
    }
}

/// Spawn a backend on the given port, returning once it is listening.
pub async fn spawn_app_on_port(
    port: u16,
    options: BackendOptions,
) -> anyhow::Result<TestApp> {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = tracing_log::LogTracer::init();
    let _ = subscriber.try_init();

    let token = options.token.clone();
    let backend = web::Data::new(Backend::new(options));
    let (server, port) =
        backend::build("127.0.0.1", port, backend.clone())?;
    tokio::spawn(server);

    let mut app = TestApp {
        port,
        client: APIClient::new(String::new()),
        backend,
        token,
    };
    app.client = app.new_client();
    Ok(app)
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(BackendOptions::default()).await
}

pub async fn spawn_app_with(options: BackendOptions) -> TestApp {
    spawn_app_on_port(0, options)
        .await
        .expect("failed to spawn test backend")
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}

pub fn sport_draft(name: &str) -> requests::SportDraft {
    requests::SportDraft {
        name: name.into(),
        monthly_fee: "12000".into(),
        description: String::new(),
    }
}

pub fn sport_plan_draft(sport_id: SportId) -> requests::SportPlanDraft {
    requests::SportPlanDraft {
        sport_id: sport_id.to_string(),
        name: String::new(),
        monthly_fee: "15000.50".into(),
        weekly_frequency: "2".into(),
        is_active: None,
    }
}

pub fn student_draft(sport_id: SportId) -> requests::StudentDraft {
    requests::StudentDraft {
        first_name: "Lucía".into(),
        last_name: "Fernández".into(),
        email: "lucia@example.com".into(),
        phone: String::new(),
        birth_date: "1998-07-21".into(),
        enrollment_date: "2024-03-01".into(),
        sport_id: sport_id.to_string(),
        sport_plan_id: String::new(),
        is_active: None,
    }
}

pub fn fee_draft(student_id: StudentId) -> requests::FeeDraft {
    requests::FeeDraft {
        student_id: student_id.to_string(),
        amount: "12000".into(),
        due_date: "2024-03-10".into(),
        period: "2024-03".into(),
        description: String::new(),
    }
}

pub fn payment_draft(
    student_id: StudentId,
    fee_id: Option<FeeId>,
) -> requests::PaymentDraft {
    requests::PaymentDraft {
        student_id: student_id.to_string(),
        fee_id: fee_id.map(|id| id.to_string()).unwrap_or_default(),
        amount: "5000".into(),
        payment_date: "2024-03-05".into(),
        method: "cash".into(),
        notes: String::new(),
    }
}
