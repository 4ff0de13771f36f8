pub mod api_client;
pub mod requests;

pub use api_client::{APIClient, ClientError};

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug,
                Clone,
                Copy,
                PartialEq,
                Eq,
                Hash,
                PartialOrd,
                Ord,
                Serialize,
                Deserialize,
                derive_more::Display,
            )]
            #[serde(transparent)]
            pub struct $name(pub i64);
        )*
    };
}

// Id type wrappers help ensure we don't mix up ids for different entities.
// The backend assigns all of them; the client never invents one.
id_type!(SportId, SportPlanId, StudentId, FeeId, PaymentId, UserId);

/// Implemented by every record the backend assigns an id to, so generic
/// state code can look items up without knowing the entity.
pub trait Identified {
    type Id: Copy + Eq + std::fmt::Debug;

    fn id(&self) -> Self::Id;
}

/// A discipline offered by the studio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sport {
    pub id: SportId,
    pub name: String,
    /// Base monthly fee, before any plan pricing.
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_fee: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// A priced, frequency-bound variant of a sport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportPlan {
    pub id: SportPlanId,
    pub sport_id: SportId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_fee: Decimal,
    /// Sessions per week.
    pub weekly_frequency: u8,
    pub is_active: bool,
}

impl SportPlan {
    /// The plan's name, or its frequency when the plan was left unnamed.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}x per week", self.weekly_frequency),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub birth_date: Option<Date>,
    pub enrollment_date: Date,
    pub sport_id: SportId,
    #[serde(default)]
    pub sport_plan_id: Option<SportPlanId>,
    pub is_active: bool,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A billing obligation for a student, due on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: FeeId,
    pub student_id: StudentId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Sum of the payments recorded against this fee.
    #[serde(with = "rust_decimal::serde::float", default)]
    pub amount_paid: Decimal,
    pub due_date: Date,
    /// Billing period label, e.g. "2024-03".
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Fee {
    /// Amount still owed. Overpayments don't produce a negative balance.
    pub fn remaining_balance(&self) -> Decimal {
        (self.amount - self.amount_paid).max(Decimal::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.remaining_balance().is_zero()
    }

    /// A fee is overdue once its due date has passed with money still owed.
    pub fn is_overdue(&self, today: Date) -> bool {
        !self.is_settled() && self.due_date < today
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[display("cash")]
    Cash,
    #[display("debit")]
    Debit,
    #[display("credit")]
    Credit,
    #[display("transfer")]
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] =
        [Self::Cash, Self::Debit, Self::Credit, Self::Transfer];
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment method: {0:?}")]
pub struct UnknownPaymentMethod(pub String);

impl std::str::FromStr for PaymentMethod {
    type Err = UnknownPaymentMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
    }
}

/// A recorded settlement, optionally against a specific fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub student_id: StudentId,
    #[serde(default)]
    pub fee_id: Option<FeeId>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub payment_date: Date,
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display("student")]
    Student,
    #[display("coach")]
    Coach,
    #[display("admin")]
    Admin,
}

/// The account the client is logged in as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Set when the account belongs to a student of the studio.
    #[serde(default)]
    pub student_id: Option<StudentId>,
}

macro_rules! identified {
    ($($entity:ty => $id:ty),* $(,)?) => {
        $(
            impl Identified for $entity {
                type Id = $id;

                fn id(&self) -> $id {
                    self.id
                }
            }
        )*
    };
}

identified!(
    Sport => SportId,
    SportPlan => SportPlanId,
    Student => StudentId,
    Fee => FeeId,
    Payment => PaymentId,
);

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    fn fee(amount: Decimal, amount_paid: Decimal) -> Fee {
        Fee {
            id: FeeId(1),
            student_id: StudentId(1),
            amount,
            amount_paid,
            due_date: Date::constant(2024, 3, 10),
            period: Some("2024-03".into()),
            description: None,
        }
    }

    #[test]
    fn remaining_balance_is_total_minus_paid() {
        let fee = fee(dec!(15000.50), dec!(5000));
        assert_eq!(fee.remaining_balance(), dec!(10000.50));
        assert!(!fee.is_settled());
    }

    #[test]
    fn overpaid_fee_is_settled() {
        let fee = fee(dec!(100), dec!(120));
        assert_eq!(fee.remaining_balance(), Decimal::ZERO);
        assert!(fee.is_settled());
        assert!(!fee.is_overdue(Date::constant(2030, 1, 1)));
    }

    #[test]
    fn unpaid_fee_is_overdue_after_due_date() {
        let fee = fee(dec!(100), dec!(0));
        assert!(!fee.is_overdue(Date::constant(2024, 3, 10)));
        assert!(fee.is_overdue(Date::constant(2024, 3, 11)));
    }

    #[test]
    fn payment_method_parses_case_insensitively() {
        assert_eq!("Cash".parse::<PaymentMethod>(), Ok(PaymentMethod::Cash));
        assert_eq!(
            "TRANSFER".parse::<PaymentMethod>(),
            Ok(PaymentMethod::Transfer)
        );
        let err = "cheque".parse::<PaymentMethod>().unwrap_err();
        assert_eq!(err, UnknownPaymentMethod("cheque".into()));
        assert_eq!(err.to_string(), "unknown payment method: \"cheque\"");
    }

    #[test]
    fn sport_plan_uses_camel_case_numbers_on_the_wire() {
        let plan: SportPlan = serde_json::from_value(serde_json::json!({
            "id": 7,
            "sportId": 3,
            "name": "Twice a week",
            "monthlyFee": 15000.5,
            "weeklyFrequency": 2,
            "isActive": true,
        }))
        .unwrap();
        assert_eq!(plan.id, SportPlanId(7));
        assert_eq!(plan.sport_id, SportId(3));
        assert_eq!(plan.monthly_fee, dec!(15000.5));
        assert_eq!(plan.label(), "Twice a week");
    }

    #[test]
    fn unnamed_plan_is_labelled_by_frequency() {
        let plan: SportPlan = serde_json::from_value(serde_json::json!({
            "id": 8,
            "sportId": 3,
            "monthlyFee": 9000,
            "weeklyFrequency": 3,
            "isActive": false,
        }))
        .unwrap();
        assert_eq!(plan.name, None);
        assert_eq!(plan.label(), "3x per week");
    }
}
