use actix_web::{
    HttpRequest, HttpResponse, delete, dev::HttpServiceFactory, get, patch,
    post, web,
};
use payloads::{FeeId, PaymentId, SportId, SportPlanId, StudentId, requests};

use super::{APIError, Backend};

pub fn api_services() -> impl HttpServiceFactory {
    // plan routes go first so "plans" is never read as a sport id
    web::scope("/api")
        .service(user_profile)
        .service(list_sport_plans)
        .service(create_sport_plan)
        .service(update_sport_plan)
        .service(delete_sport_plan)
        .service(list_sports)
        .service(create_sport)
        .service(update_sport)
        .service(delete_sport)
        .service(list_students)
        .service(create_student)
        .service(update_student)
        .service(delete_student)
        .service(list_fees)
        .service(create_fee)
        .service(update_fee)
        .service(delete_fee)
        .service(list_payments)
        .service(create_payment)
        .service(delete_payment)
}

#[tracing::instrument(skip(req, backend), ret)]
#[get("/profile")]
pub async fn user_profile(
    req: HttpRequest,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    Ok(HttpResponse::Ok().json(backend.profile()?))
}

#[tracing::instrument(skip(req, backend), ret)]
#[get("/sports")]
pub async fn list_sports(
    req: HttpRequest,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    Ok(HttpResponse::Ok().json(backend.store()?.list_sports()))
}

#[tracing::instrument(skip(req, backend), ret)]
#[post("/sports")]
pub async fn create_sport(
    req: HttpRequest,
    details: web::Json<requests::NewSport>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let sport = backend.store()?.create_sport(details.into_inner());
    Ok(HttpResponse::Ok().json(sport))
}

#[tracing::instrument(skip(req, backend), ret)]
#[patch("/sports/{sport_id}")]
pub async fn update_sport(
    req: HttpRequest,
    sport_id: web::Path<SportId>,
    details: web::Json<requests::NewSport>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let sport = backend
        .store()?
        .update_sport(*sport_id, details.into_inner())?;
    Ok(HttpResponse::Ok().json(sport))
}

#[tracing::instrument(skip(req, backend), ret)]
#[delete("/sports/{sport_id}")]
pub async fn delete_sport(
    req: HttpRequest,
    sport_id: web::Path<SportId>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    backend.store()?.delete_sport(*sport_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(req, backend), ret)]
#[get("/sports/plans")]
pub async fn list_sport_plans(
    req: HttpRequest,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    Ok(HttpResponse::Ok().json(backend.store()?.list_plans()))
}

#[tracing::instrument(skip(req, backend), ret)]
#[post("/sports/plans")]
pub async fn create_sport_plan(
    req: HttpRequest,
    details: web::Json<requests::NewSportPlan>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let plan = backend.store()?.create_plan(details.into_inner())?;
    Ok(HttpResponse::Ok().json(plan))
}

#[tracing::instrument(skip(req, backend), ret)]
#[patch("/sports/plans/{plan_id}")]
pub async fn update_sport_plan(
    req: HttpRequest,
    plan_id: web::Path<SportPlanId>,
    details: web::Json<requests::NewSportPlan>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let plan = backend
        .store()?
        .update_plan(*plan_id, details.into_inner())?;
    Ok(HttpResponse::Ok().json(plan))
}

#[tracing::instrument(skip(req, backend), ret)]
#[delete("/sports/plans/{plan_id}")]
pub async fn delete_sport_plan(
    req: HttpRequest,
    plan_id: web::Path<SportPlanId>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    backend.store()?.delete_plan(*plan_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(req, backend), ret)]
#[get("/students")]
pub async fn list_students(
    req: HttpRequest,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    Ok(HttpResponse::Ok().json(backend.store()?.list_students()))
}

#[tracing::instrument(skip(req, backend), ret)]
#[post("/students")]
pub async fn create_student(
    req: HttpRequest,
    details: web::Json<requests::NewStudent>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let student = backend.store()?.create_student(details.into_inner())?;
    Ok(HttpResponse::Ok().json(student))
}

#[tracing::instrument(skip(req, backend), ret)]
#[patch("/students/{student_id}")]
pub async fn update_student(
    req: HttpRequest,
    student_id: web::Path<StudentId>,
    details: web::Json<requests::NewStudent>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let student = backend
        .store()?
        .update_student(*student_id, details.into_inner())?;
    Ok(HttpResponse::Ok().json(student))
}

#[tracing::instrument(skip(req, backend), ret)]
#[delete("/students/{student_id}")]
pub async fn delete_student(
    req: HttpRequest,
    student_id: web::Path<StudentId>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    backend.store()?.delete_student(*student_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(req, backend), ret)]
#[get("/fees")]
pub async fn list_fees(
    req: HttpRequest,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    Ok(HttpResponse::Ok().json(backend.store()?.list_fees()))
}

#[tracing::instrument(skip(req, backend), ret)]
#[post("/fees")]
pub async fn create_fee(
    req: HttpRequest,
    details: web::Json<requests::NewFee>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let fee = backend.store()?.create_fee(details.into_inner())?;
    Ok(HttpResponse::Ok().json(fee))
}

#[tracing::instrument(skip(req, backend), ret)]
#[patch("/fees/{fee_id}")]
pub async fn update_fee(
    req: HttpRequest,
    fee_id: web::Path<FeeId>,
    details: web::Json<requests::NewFee>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let fee = backend.store()?.update_fee(*fee_id, details.into_inner())?;
    Ok(HttpResponse::Ok().json(fee))
}

#[tracing::instrument(skip(req, backend), ret)]
#[delete("/fees/{fee_id}")]
pub async fn delete_fee(
    req: HttpRequest,
    fee_id: web::Path<FeeId>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    backend.store()?.delete_fee(*fee_id)?;
    Ok(HttpResponse::Ok().finish())
}

#[tracing::instrument(skip(req, backend), ret)]
#[get("/payments")]
pub async fn list_payments(
    req: HttpRequest,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    Ok(HttpResponse::Ok().json(backend.store()?.list_payments()))
}

#[tracing::instrument(skip(req, backend), ret)]
#[post("/payments")]
pub async fn create_payment(
    req: HttpRequest,
    details: web::Json<requests::NewPayment>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    let payment = backend.store()?.create_payment(details.into_inner())?;
    Ok(HttpResponse::Ok().json(payment))
}

#[tracing::instrument(skip(req, backend), ret)]
#[delete("/payments/{payment_id}")]
pub async fn delete_payment(
    req: HttpRequest,
    payment_id: web::Path<PaymentId>,
    backend: web::Data<Backend>,
) -> Result<HttpResponse, APIError> {
    backend.admit(&req)?;
    backend.store()?.delete_payment(*payment_id)?;
    Ok(HttpResponse::Ok().finish())
}
