//! Sample studio data for the dev-server and for tests that want a
//! populated backend.
//!
//! The dataset covers:
//! - Three sports, each with a couple of weekly plans
//! - Students spread across them, one inactive and one without a plan
//! - Two months of fees, some settled, some partly paid, all past due
//! - Payments made with every payment method

use crate::{TestApp, fee_draft, payment_draft, student_draft};
use anyhow::Result;
use payloads::{
    Fee, Payment, PaymentMethod, Sport, SportPlan, Student, requests,
};

struct SportSeed {
    name: &'static str,
    monthly_fee: &'static str,
    description: &'static str,
    // (weekly frequency, monthly fee)
    plans: &'static [(u8, &'static str)],
}

const SPORTS: &[SportSeed] = &[
    SportSeed {
        name: "Boxing",
        monthly_fee: "18000",
        description: "Technique, pads and conditioning",
        plans: &[(2, "15000"), (3, "18000"), (5, "24000")],
    },
    SportSeed {
        name: "Yoga",
        monthly_fee: "14000",
        description: "Vinyasa and restorative classes",
        plans: &[(1, "8000"), (2, "14000")],
    },
    SportSeed {
        name: "Swimming",
        monthly_fee: "22000",
        description: "",
        plans: &[(2, "19000"), (3, "22000")],
    },
];

// (first name, last name, sport index, plan index, active)
const STUDENTS: &[(&str, &str, usize, Option<usize>, bool)] = &[
    ("Lucía", "Fernández", 0, Some(1), true),
    ("Mateo", "González", 0, Some(0), true),
    ("Valentina", "Rodríguez", 1, Some(1), true),
    ("Santiago", "López", 1, Some(0), true),
    ("Camila", "Martínez", 2, Some(0), true),
    ("Joaquín", "Pérez", 2, None, true),
    ("Martina", "Sánchez", 0, Some(2), false),
];

/// Development dataset that fills the backend with a small, realistic
/// studio.
pub struct DevDataset {
    pub sports: Vec<Sport>,
    pub plans: Vec<SportPlan>,
    pub students: Vec<Student>,
    pub fees: Vec<Fee>,
    pub payments: Vec<Payment>,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        let client = &app.client;

        tracing::info!("🏋️ Creating sports and plans");
        let mut sports = Vec::new();
        let mut plans_by_sport = Vec::new();
        for seed in SPORTS {
            let sport = client
                .create_sport(
                    &requests::SportDraft {
                        name: seed.name.into(),
                        monthly_fee: seed.monthly_fee.into(),
                        description: seed.description.into(),
                    }
                    .validate()?,
                )
                .await?;
            let mut plans = Vec::new();
            for (frequency, fee) in seed.plans {
                let details = requests::SportPlanDraft {
                    sport_id: sport.id.to_string(),
                    name: String::new(),
                    monthly_fee: (*fee).into(),
                    weekly_frequency: frequency.to_string(),
                    is_active: None,
                }
                .validate()?;
                plans.push(client.create_sport_plan(&details).await?);
            }
            sports.push(sport);
            plans_by_sport.push(plans);
        }

        tracing::info!("👤 Enrolling students");
        let mut students = Vec::new();
        for (first, last, sport_index, plan_index, active) in STUDENTS {
            let sport = &sports[*sport_index];
            let mut draft = student_draft(sport.id);
            draft.first_name = (*first).into();
            draft.last_name = (*last).into();
            draft.email = format!(
                "{}.{}@example.com",
                ascii_lower(first),
                ascii_lower(last)
            );
            draft.sport_plan_id = plan_index
                .map(|i| plans_by_sport[*sport_index][i].id.to_string())
                .unwrap_or_default();
            draft.is_active = Some(*active);
            students.push(client.create_student(&draft.validate()?).await?);
        }

        tracing::info!("🧾 Issuing fees for March and April");
        let mut fees = Vec::new();
        for student in students.iter().filter(|s| s.is_active) {
            let amount = student
                .sport_plan_id
                .and_then(|plan_id| {
                    plans_by_sport.iter().flatten().find(|p| p.id == plan_id)
                })
                .map(|plan| plan.monthly_fee)
                .or_else(|| {
                    sports
                        .iter()
                        .find(|s| s.id == student.sport_id)
                        .map(|sport| sport.monthly_fee)
                })
                .unwrap_or_default();
            for (period, due_date) in
                [("2024-03", "2024-03-10"), ("2024-04", "2024-04-10")]
            {
                let mut draft = fee_draft(student.id);
                draft.amount = amount.to_string();
                draft.period = period.into();
                draft.due_date = due_date.into();
                fees.push(client.create_fee(&draft.validate()?).await?);
            }
        }

        tracing::info!("💵 Recording payments");
        let mut payments = Vec::new();
        let march_fees = fees.iter().filter(|fee| {
            fee.period.as_deref() == Some("2024-03")
        });
        for (i, fee) in march_fees.enumerate() {
            let method = PaymentMethod::ALL[i % PaymentMethod::ALL.len()];
            // every third student has only paid half
            let amount = if i % 3 == 2 {
                fee.amount / rust_decimal::Decimal::TWO
            } else {
                fee.amount
            };
            let mut draft = payment_draft(fee.student_id, Some(fee.id));
            draft.amount = amount.to_string();
            draft.method = method.to_string();
            draft.payment_date = "2024-03-08".into();
            payments.push(client.create_payment(&draft.validate()?).await?);
        }
        // a payment not tied to any fee
        if let Some(student) = students.first() {
            let mut draft = payment_draft(student.id, None);
            draft.amount = "3000".into();
            draft.notes = "Gloves".into();
            payments.push(client.create_payment(&draft.validate()?).await?);
        }

        // refetch so paid amounts reflect the payments
        let fees = client.list_fees().await?;

        Ok(Self {
            sports,
            plans: plans_by_sport.into_iter().flatten().collect(),
            students,
            fees,
            payments,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📊 Development dataset:");
        tracing::info!("   🏋️ {} sports", self.sports.len());
        for sport in &self.sports {
            let plans: Vec<String> = self
                .plans
                .iter()
                .filter(|plan| plan.sport_id == sport.id)
                .map(|plan| plan.label())
                .collect();
            tracing::info!("      - {}: {}", sport.name, plans.join(", "));
        }
        tracing::info!(
            "   👤 {} students ({} active)",
            self.students.len(),
            self.students.iter().filter(|s| s.is_active).count()
        );
        tracing::info!(
            "   🧾 {} fees ({} settled)",
            self.fees.len(),
            self.fees.iter().filter(|fee| fee.is_settled()).count()
        );
        tracing::info!("   💵 {} payments", self.payments.len());
    }
}

fn ascii_lower(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            _ => c.to_ascii_lowercase(),
        })
        .collect()
}
