use jiff::tz::TimeZone;
use payloads::{
    PaymentMethod, Role, SportId, StudentId, UserId, UserProfile, requests,
};
use reqwest::StatusCode;
use rust_decimal::dec;
use test_helpers::{
    BackendOptions, TestApp, fee_draft, payment_draft, spawn_app,
    spawn_app_with, sport_draft, sport_plan_draft, student_draft,
};
use ui::{
    AppContext, AuthState, Capability, Route,
    hooks::{
        HookError, use_fees, use_payments, use_session, use_sport_plans,
        use_sports, use_students,
    },
};

fn context(app: &TestApp) -> AppContext {
    AppContext::new(app.new_client(), TimeZone::UTC)
}

#[tokio::test]
async fn created_sport_shows_up_after_fetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sports = use_sports(&ctx);

    assert!(!sports.is_loaded());
    let created = sports.create(&sport_draft("Boxing")).await?;
    // mutations don't touch the local store
    assert!(sports.sports().is_empty());

    let fetched = sports.fetch_all().await?;
    assert!(fetched.contains(&created));
    assert!(sports.is_loaded());
    assert_eq!(sports.sports(), fetched);
    assert_eq!(ctx.state().sports.get(created.id), Some(&created));
    Ok(())
}

#[tokio::test]
async fn plan_draft_is_coerced_before_sending() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sport = app.create_test_sport().await?;

    let draft = requests::SportPlanDraft {
        sport_id: sport.id.to_string(),
        monthly_fee: "15000.50".into(),
        weekly_frequency: "2".into(),
        ..Default::default()
    };
    let plan = use_sport_plans(&ctx).create(&draft).await?;

    assert_eq!(plan.sport_id, sport.id);
    assert_eq!(plan.monthly_fee, dec!(15000.5));
    assert_eq!(plan.weekly_frequency, 2);
    assert!(plan.is_active);
    assert_eq!(plan.name, None);
    Ok(())
}

#[tokio::test]
async fn invalid_draft_sends_nothing() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);

    let draft = requests::SportPlanDraft {
        sport_id: "x".into(),
        ..sport_plan_draft(SportId(1))
    };
    let err = use_sport_plans(&ctx).create(&draft).await.unwrap_err();
    assert!(err.to_string().contains("invalid sportId"));
    assert_eq!(err.invalid_field().map(|f| f.field), Some("sportId"));

    let mut student = student_draft(SportId(1));
    student.enrollment_date = "01/03/2024".into();
    let err = use_students(&ctx).create(&student).await.unwrap_err();
    assert!(matches!(err, HookError::Invalid(_)));

    let mut fee = fee_draft(StudentId(1));
    fee.amount = "-10".into();
    assert!(use_fees(&ctx).create(&fee).await.is_err());

    let mut payment = payment_draft(StudentId(1), None);
    payment.method = "cheque".into();
    assert!(use_payments(&ctx).create(&payment).await.is_err());

    assert_eq!(app.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn deleted_student_is_gone_after_refetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sport = app.create_test_sport().await?;
    let students = use_students(&ctx);

    let student = students.create(&student_draft(sport.id)).await?;
    students.fetch_all().await?;
    assert!(ctx.state().students.get(student.id).is_some());

    students.delete(student.id).await?;
    let remaining = students.fetch_all().await?;
    assert!(remaining.iter().all(|s| s.id != student.id));
    assert!(ctx.state().students.get(student.id).is_none());
    Ok(())
}

#[tokio::test]
async fn fetch_error_is_kept_until_next_success() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sports = use_sports(&ctx);
    app.create_test_sport().await?;
    sports.fetch_all().await?;

    app.backend.set_unavailable(true);
    let err = sports.fetch_all().await.unwrap_err();
    let status = match &err {
        HookError::Client(e) => e.status(),
        HookError::Invalid(_) => None,
    };
    assert_eq!(status, Some(StatusCode::SERVICE_UNAVAILABLE));
    assert!(sports.error().is_some());
    // the last good list stays visible under the banner
    assert_eq!(sports.sports().len(), 1);

    app.backend.set_unavailable(false);
    sports.fetch_all().await?;
    assert_eq!(sports.error(), None);
    Ok(())
}

#[tokio::test]
async fn clear_error_dismisses_the_banner() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let fees = use_fees(&ctx);

    app.backend.set_unavailable(true);
    assert!(fees.fetch_all().await.is_err());
    assert!(fees.error().is_some());
    assert!(!fees.is_loaded());

    fees.clear_error();
    assert_eq!(fees.error(), None);
    Ok(())
}

#[tokio::test]
async fn mutation_failure_leaves_banner_alone() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sports = use_sports(&ctx);

    let result = sports.delete(SportId(42)).await;
    match result {
        Err(HookError::Client(e)) => {
            assert_eq!(e.status(), Some(StatusCode::NOT_FOUND))
        }
        other => panic!("expected a client error, got {other:?}"),
    }
    assert_eq!(sports.error(), None);
    Ok(())
}

#[tokio::test]
async fn plans_can_be_deactivated() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let (sport, plan, _) = app.create_enrolled_student().await?;
    let plans = use_sport_plans(&ctx);

    let inactive = plans.set_active(&plan, false).await?;
    assert!(!inactive.is_active);
    assert_eq!(inactive.monthly_fee, plan.monthly_fee);

    plans.fetch_all().await?;
    let state = ctx.state();
    assert_eq!(state.plans_for_sport(sport.id).len(), 1);
    assert!(state.active_plans_for_sport(sport.id).is_empty());
    Ok(())
}

#[tokio::test]
async fn plan_update_keeps_it_inactive() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let (sport, plan, _) = app.create_enrolled_student().await?;
    let plans = use_sport_plans(&ctx);

    let retired = plans.set_active(&plan, false).await?;
    let draft = requests::SportPlanDraft {
        monthly_fee: "16000".into(),
        ..requests::SportPlanDraft::from(&retired)
    };
    plans.update(plan.id, &draft).await?;

    plans.fetch_all().await?;
    let state = ctx.state();
    let fetched = state.sport_plans.get(plan.id);
    assert_eq!(fetched.map(|p| p.monthly_fee), Some(dec!(16000)));
    assert_eq!(fetched.map(|p| p.is_active), Some(false));
    assert!(state.active_plans_for_sport(sport.id).is_empty());
    Ok(())
}

#[tokio::test]
async fn update_without_active_flag_sends_nothing() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let (sport, plan, student) = app.create_enrolled_student().await?;
    let before = app.request_count();

    let err = use_sport_plans(&ctx)
        .update(plan.id, &sport_plan_draft(sport.id))
        .await
        .unwrap_err();
    assert_eq!(err.invalid_field().map(|f| f.field), Some("isActive"));

    let err = use_students(&ctx)
        .update(student.id, &student_draft(sport.id))
        .await
        .unwrap_err();
    assert_eq!(err.invalid_field().map(|f| f.field), Some("isActive"));

    assert_eq!(app.request_count(), before);
    Ok(())
}

#[tokio::test]
async fn deleted_plan_is_gone_after_refetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sport = app.create_test_sport().await?;
    let plans = use_sport_plans(&ctx);

    let plan = plans.create(&sport_plan_draft(sport.id)).await?;
    plans.fetch_all().await?;
    assert!(ctx.state().sport_plans.get(plan.id).is_some());

    plans.delete(plan.id).await?;
    let remaining = plans.fetch_all().await?;
    assert!(remaining.iter().all(|p| p.id != plan.id));
    assert!(ctx.state().sport_plans.get(plan.id).is_none());
    Ok(())
}

#[tokio::test]
async fn student_update_is_visible_after_refetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sport = app.create_test_sport().await?;
    let students = use_students(&ctx);

    let student = students.create(&student_draft(sport.id)).await?;
    let inactive = students
        .update(
            student.id,
            &requests::StudentDraft {
                is_active: Some(false),
                ..requests::StudentDraft::from(&student)
            },
        )
        .await?;
    // a later edit of another field leaves the flag alone
    let draft = requests::StudentDraft {
        phone: "555-0199".into(),
        ..requests::StudentDraft::from(&inactive)
    };
    students.update(student.id, &draft).await?;

    students.fetch_all().await?;
    let state = ctx.state();
    let fetched = state.students.get(student.id);
    assert_eq!(
        fetched.and_then(|s| s.phone.as_deref()),
        Some("555-0199")
    );
    assert_eq!(fetched.map(|s| s.is_active), Some(false));
    assert_eq!(fetched.and_then(|s| s.birth_date), student.birth_date);
    assert!(students.roster().is_empty());
    Ok(())
}

#[tokio::test]
async fn fee_update_and_delete_are_visible_after_refetch()
-> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let (_, _, student) = app.create_enrolled_student().await?;
    let fees = use_fees(&ctx);

    let fee = fees.create(&fee_draft(student.id)).await?;
    let mut draft = fee_draft(student.id);
    draft.amount = "15000".into();
    fees.update(fee.id, &draft).await?;

    fees.fetch_all().await?;
    assert_eq!(
        ctx.state().fees.get(fee.id).map(|f| f.amount),
        Some(dec!(15000))
    );
    assert_eq!(fees.total_outstanding(), dec!(15000));

    fees.delete(fee.id).await?;
    let remaining = fees.fetch_all().await?;
    assert!(remaining.iter().all(|f| f.id != fee.id));
    assert!(ctx.state().fees.get(fee.id).is_none());
    assert_eq!(fees.total_outstanding(), dec!(0));
    Ok(())
}

#[tokio::test]
async fn deleted_payment_is_gone_after_refetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let (_, _, student) = app.create_enrolled_student().await?;
    let payments = use_payments(&ctx);

    let payment = payments.create(&payment_draft(student.id, None)).await?;
    payments.fetch_all().await?;
    assert!(ctx.state().payments.get(payment.id).is_some());

    payments.delete(payment.id).await?;
    let remaining = payments.fetch_all().await?;
    assert!(remaining.iter().all(|p| p.id != payment.id));
    assert!(ctx.state().payments.get(payment.id).is_none());
    assert!(payments.totals_by_method().is_empty());
    Ok(())
}

#[tokio::test]
async fn payment_reduces_outstanding_balance() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let (_, _, student) = app.create_enrolled_student().await?;
    let fees = use_fees(&ctx);
    let payments = use_payments(&ctx);

    let fee = fees.create(&fee_draft(student.id)).await?;
    fees.fetch_all().await?;
    assert_eq!(fees.total_outstanding(), dec!(12000));

    let mut draft = payment_draft(student.id, Some(fee.id));
    draft.method = "Transfer".into();
    let payment = payments.create(&draft).await?;
    assert_eq!(payment.method, PaymentMethod::Transfer);

    fees.fetch_all().await?;
    payments.fetch_all().await?;
    assert_eq!(fees.total_outstanding(), dec!(7000));
    assert_eq!(ctx.state().outstanding_balance(student.id), dec!(7000));
    assert_eq!(
        payments.totals_by_method().get(&PaymentMethod::Transfer),
        Some(&dec!(5000))
    );
    Ok(())
}

#[tokio::test]
async fn overdue_fees_use_studio_today() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let (_, _, student) = app.create_enrolled_student().await?;
    let fees = use_fees(&ctx);

    // due in 2024, so overdue by now
    let fee = fees.create(&fee_draft(student.id)).await?;
    let mut future = fee_draft(student.id);
    future.due_date = "2999-01-10".into();
    fees.create(&future).await?;

    fees.fetch_all().await?;
    let overdue = fees.overdue();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id, fee.id);
    Ok(())
}

#[tokio::test]
async fn roster_lists_active_students_by_name() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sport = app.create_test_sport().await?;
    let students = use_students(&ctx);

    for (first, last, active) in [
        ("Mateo", "Pérez", true),
        ("Ana", "Díaz", true),
        ("Bruno", "Acosta", false),
    ] {
        let mut draft = student_draft(sport.id);
        draft.first_name = first.into();
        draft.last_name = last.into();
        draft.is_active = Some(active);
        students.create(&draft).await?;
    }
    students.fetch_all().await?;

    let names: Vec<String> =
        students.roster().iter().map(|s| s.full_name()).collect();
    assert_eq!(names, ["Ana Díaz", "Mateo Pérez"]);
    Ok(())
}

#[tokio::test]
async fn sport_update_is_visible_after_refetch() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let sports = use_sports(&ctx);

    let sport = sports.create(&sport_draft("Yoga")).await?;
    let mut draft = sport_draft("Hot Yoga");
    draft.description = "  ".into();
    sports.update(sport.id, &draft).await?;

    sports.fetch_all().await?;
    let state = ctx.state();
    let fetched = state.sports.get(sport.id);
    assert_eq!(fetched.map(|s| s.name.as_str()), Some("Hot Yoga"));
    assert_eq!(fetched.and_then(|s| s.description.clone()), None);
    Ok(())
}

#[tokio::test]
async fn admin_session_gets_full_menu() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let ctx = context(&app);
    let session = use_session(&ctx);

    assert!(session.menu().is_empty());
    let resolved = session.load_profile().await?;
    assert_eq!(resolved.capability, Capability::Admin);
    assert!(ctx.state().is_authenticated());
    assert!(session.menu().iter().any(|item| item.route == Route::Fees));

    session.logout();
    assert_eq!(ctx.state().auth_state, AuthState::LoggedOut);
    assert!(session.menu().is_empty());
    Ok(())
}

#[tokio::test]
async fn student_session_sees_own_menu() -> anyhow::Result<()> {
    let app = spawn_app_with(BackendOptions {
        token: None,
        profile: UserProfile {
            id: UserId(5),
            name: "Lucía Fernández".into(),
            email: "lucia@example.com".into(),
            role: Role::Student,
            student_id: Some(StudentId(1)),
        },
    })
    .await;
    let ctx = context(&app);
    let (_, _, student) = app.create_enrolled_student().await?;

    let session = use_session(&ctx);
    session.load_profile().await?;
    use_students(&ctx).fetch_all().await?;

    let routes: Vec<Route> =
        session.menu().iter().map(|item| item.route).collect();
    assert!(routes.contains(&Route::MyPayments));
    assert!(!routes.contains(&Route::Students));
    assert_eq!(ctx.state().current_student(), Some(&student));
    Ok(())
}

#[tokio::test]
async fn rejected_token_logs_out() -> anyhow::Result<()> {
    let app = spawn_app_with(BackendOptions {
        token: Some("right".into()),
        ..Default::default()
    })
    .await;
    let client = payloads::APIClient::new(app.address())
        .with_auth_token("wrong".to_string().into());
    let ctx = AppContext::new(client, TimeZone::UTC);
    let session = use_session(&ctx);

    let err = session.load_profile().await.unwrap_err();
    let status = match &err {
        HookError::Client(e) => e.status(),
        HookError::Invalid(_) => None,
    };
    assert_eq!(status, Some(StatusCode::UNAUTHORIZED));
    assert_eq!(ctx.state().auth_state, AuthState::LoggedOut);
    Ok(())
}
