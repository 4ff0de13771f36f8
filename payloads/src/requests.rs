//! Request bodies sent to the backend, and the raw form drafts they are
//! validated from.
//!
//! Drafts hold exactly what a user typed. Every numeric, date and enum field
//! is parsed and checked by `validate` before anything is sent, so a bad
//! value never reaches the network.

use crate::{
    FeeId, PaymentMethod, SportId, SportPlan, SportPlanId, Student, StudentId,
};
use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const WEEKLY_FREQUENCY_MIN: u8 = 1;
pub const WEEKLY_FREQUENCY_MAX: u8 = 7;

/// A draft field that failed to parse or check. `field` is the wire name of
/// the field, e.g. "sportId".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {value:?}")]
pub struct InvalidField {
    pub field: &'static str,
    pub value: String,
}

impl InvalidField {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

type Validated<T> = Result<T, InvalidField>;

/// Positive integer id.
fn parse_id(field: &'static str, value: &str) -> Validated<i64> {
    match value.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(InvalidField::new(field, value)),
    }
}

/// Like `parse_id`, but a blank value means "none".
fn parse_optional_id(
    field: &'static str,
    value: &str,
) -> Validated<Option<i64>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_id(field, value).map(Some)
}

/// Digits with at most one decimal point and an optional sign. Anything
/// else `Decimal::from_str` would accept (underscores, exponents) is a typo.
fn is_plain_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    !(whole.is_empty() && fraction.is_empty())
        && whole
            .chars()
            .chain(fraction.chars())
            .all(|c| c.is_ascii_digit())
}

/// Non-negative amount of money, e.g. "15000.50".
fn parse_money(field: &'static str, value: &str) -> Validated<Decimal> {
    let trimmed = value.trim();
    if !is_plain_decimal(trimmed) {
        return Err(InvalidField::new(field, value));
    }
    match Decimal::from_str(trimmed) {
        Ok(amount) if !amount.is_sign_negative() => Ok(amount.normalize()),
        _ => Err(InvalidField::new(field, value)),
    }
}

/// Updates replace the whole record, so they must say whether it stays
/// active rather than fall back to the create default.
fn required_flag(field: &'static str, value: Option<bool>) -> Validated<bool> {
    value.ok_or_else(|| InvalidField::new(field, ""))
}

/// Calendar date in `YYYY-MM-DD` form.
fn parse_date(field: &'static str, value: &str) -> Validated<Date> {
    value
        .trim()
        .parse::<Date>()
        .map_err(|_| InvalidField::new(field, value))
}

fn parse_optional_date(
    field: &'static str,
    value: &str,
) -> Validated<Option<Date>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(field, value).map(Some)
}

fn required_text(field: &'static str, value: &str) -> Validated<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvalidField::new(field, value));
    }
    Ok(trimmed.to_string())
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SportDraft {
    pub name: String,
    pub monthly_fee: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSport {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_fee: Decimal,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl SportDraft {
    pub fn validate(&self) -> Validated<NewSport> {
        Ok(NewSport {
            name: required_text("name", &self.name)?,
            monthly_fee: parse_money("monthlyFee", &self.monthly_fee)?,
            description: optional_text(&self.description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SportPlanDraft {
    pub sport_id: String,
    pub name: String,
    pub monthly_fee: String,
    pub weekly_frequency: String,
    /// Left unset by the create form; plans start out active. Required
    /// when updating.
    pub is_active: Option<bool>,
}

/// Edit form for an existing plan, prefilled with its current values.
impl From<&SportPlan> for SportPlanDraft {
    fn from(plan: &SportPlan) -> Self {
        Self {
            sport_id: plan.sport_id.to_string(),
            name: plan.name.clone().unwrap_or_default(),
            monthly_fee: plan.monthly_fee.to_string(),
            weekly_frequency: plan.weekly_frequency.to_string(),
            is_active: Some(plan.is_active),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSportPlan {
    pub sport_id: SportId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_fee: Decimal,
    pub weekly_frequency: u8,
    pub is_active: bool,
}

impl SportPlanDraft {
    /// Validate for creation; an unset `is_active` means active.
    pub fn validate(&self) -> Validated<NewSportPlan> {
        self.validate_with(self.is_active.unwrap_or(true))
    }

    /// Validate for an update, where `is_active` must be given.
    pub fn validate_update(&self) -> Validated<NewSportPlan> {
        self.validate_with(required_flag("isActive", self.is_active)?)
    }

    fn validate_with(&self, is_active: bool) -> Validated<NewSportPlan> {
        let sport_id = SportId(parse_id("sportId", &self.sport_id)?);
        let monthly_fee = parse_money("monthlyFee", &self.monthly_fee)?;
        let weekly_frequency = match self.weekly_frequency.trim().parse::<u8>()
        {
            Ok(n) if (WEEKLY_FREQUENCY_MIN..=WEEKLY_FREQUENCY_MAX)
                .contains(&n) =>
            {
                n
            }
            _ => {
                return Err(InvalidField::new(
                    "weeklyFrequency",
                    &self.weekly_frequency,
                ));
            }
        };

        Ok(NewSportPlan {
            sport_id,
            name: optional_text(&self.name),
            monthly_fee,
            weekly_frequency,
            is_active,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: String,
    pub enrollment_date: String,
    pub sport_id: String,
    /// Blank when the student has no specific plan.
    pub sport_plan_id: String,
    /// Unset means active on create. Required when updating.
    pub is_active: Option<bool>,
}

/// Edit form for an existing student, prefilled with their current values.
impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            email: student.email.clone().unwrap_or_default(),
            phone: student.phone.clone().unwrap_or_default(),
            birth_date: student
                .birth_date
                .map(|date| date.to_string())
                .unwrap_or_default(),
            enrollment_date: student.enrollment_date.to_string(),
            sport_id: student.sport_id.to_string(),
            sport_plan_id: student
                .sport_plan_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            is_active: Some(student.is_active),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub birth_date: Option<Date>,
    pub enrollment_date: Date,
    pub sport_id: SportId,
    #[serde(default)]
    pub sport_plan_id: Option<SportPlanId>,
    pub is_active: bool,
}

impl StudentDraft {
    /// Validate for enrollment; an unset `is_active` means active.
    pub fn validate(&self) -> Validated<NewStudent> {
        self.validate_with(self.is_active.unwrap_or(true))
    }

    /// Validate for an update, where `is_active` must be given.
    pub fn validate_update(&self) -> Validated<NewStudent> {
        self.validate_with(required_flag("isActive", self.is_active)?)
    }

    fn validate_with(&self, is_active: bool) -> Validated<NewStudent> {
        Ok(NewStudent {
            first_name: required_text("firstName", &self.first_name)?,
            last_name: required_text("lastName", &self.last_name)?,
            email: optional_text(&self.email),
            phone: optional_text(&self.phone),
            birth_date: parse_optional_date("birthDate", &self.birth_date)?,
            enrollment_date: parse_date(
                "enrollmentDate",
                &self.enrollment_date,
            )?,
            sport_id: SportId(parse_id("sportId", &self.sport_id)?),
            sport_plan_id: parse_optional_id(
                "sportPlanId",
                &self.sport_plan_id,
            )?
            .map(SportPlanId),
            is_active,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeDraft {
    pub student_id: String,
    pub amount: String,
    pub due_date: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFee {
    pub student_id: StudentId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub due_date: Date,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl FeeDraft {
    pub fn validate(&self) -> Validated<NewFee> {
        Ok(NewFee {
            student_id: StudentId(parse_id("studentId", &self.student_id)?),
            amount: parse_money("amount", &self.amount)?,
            due_date: parse_date("dueDate", &self.due_date)?,
            period: optional_text(&self.period),
            description: optional_text(&self.description),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentDraft {
    pub student_id: String,
    /// Blank for a payment not tied to a specific fee.
    pub fee_id: String,
    pub amount: String,
    pub payment_date: String,
    pub method: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub student_id: StudentId,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fee_id: Option<FeeId>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub payment_date: Date,
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
}

impl PaymentDraft {
    pub fn validate(&self) -> Validated<NewPayment> {
        let amount = parse_money("amount", &self.amount)?;
        if amount.is_zero() {
            return Err(InvalidField::new("amount", &self.amount));
        }

        Ok(NewPayment {
            student_id: StudentId(parse_id("studentId", &self.student_id)?),
            fee_id: parse_optional_id("feeId", &self.fee_id)?.map(FeeId),
            amount,
            payment_date: parse_date("paymentDate", &self.payment_date)?,
            method: PaymentMethod::from_str(self.method.trim())
                .map_err(|_| InvalidField::new("method", &self.method))?,
            notes: optional_text(&self.notes),
        })
    }
}
