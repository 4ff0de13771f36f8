//! In-memory tables for the stand-in backend.
//!
//! Ids are assigned sequentially per table starting at 1 and never reused.
//! References between tables are checked the way the real backend checks
//! foreign keys.

use std::collections::BTreeMap;

use payloads::{
    Fee, FeeId, Payment, PaymentId, Sport, SportId, SportPlan, SportPlanId,
    Student, StudentId, requests,
};
use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("sport not found")]
    SportNotFound,
    #[error("sport plan not found")]
    SportPlanNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("fee not found")]
    FeeNotFound,
    #[error("payment not found")]
    PaymentNotFound,
    #[error("unknown sport referenced")]
    UnknownSport,
    #[error("unknown sport plan referenced")]
    UnknownSportPlan,
    #[error("unknown student referenced")]
    UnknownStudent,
    #[error("unknown fee referenced")]
    UnknownFee,
    #[error("sport still has plans or students")]
    SportInUse,
    #[error("sport plan still has students")]
    SportPlanInUse,
    #[error("sport plan belongs to a different sport")]
    PlanSportMismatch,
    #[error("fee belongs to a different student")]
    FeeStudentMismatch,
}

struct Table<K, V> {
    next_id: i64,
    rows: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy, V: Clone> Table<K, V> {
    fn insert(
        &mut self,
        make_id: fn(i64) -> K,
        make: impl FnOnce(K) -> V,
    ) -> V {
        let id = make_id(self.next_id);
        self.next_id += 1;
        let row = make(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn list(&self) -> Vec<V> {
        self.rows.values().cloned().collect()
    }
}

#[derive(Default)]
pub struct Store {
    sports: Table<SportId, Sport>,
    plans: Table<SportPlanId, SportPlan>,
    students: Table<StudentId, Student>,
    fees: Table<FeeId, Fee>,
    payments: Table<PaymentId, Payment>,
}

impl Store {
    pub fn list_sports(&self) -> Vec<Sport> {
        self.sports.list()
    }

    pub fn create_sport(&mut self, details: requests::NewSport) -> Sport {
        self.sports.insert(SportId, |id| Sport {
            id,
            name: details.name,
            monthly_fee: details.monthly_fee,
            description: details.description,
        })
    }

    pub fn update_sport(
        &mut self,
        id: SportId,
        details: requests::NewSport,
    ) -> Result<Sport, StoreError> {
        let sport = self
            .sports
            .rows
            .get_mut(&id)
            .ok_or(StoreError::SportNotFound)?;
        sport.name = details.name;
        sport.monthly_fee = details.monthly_fee;
        sport.description = details.description;
        Ok(sport.clone())
    }

    pub fn delete_sport(&mut self, id: SportId) -> Result<(), StoreError> {
        if !self.sports.rows.contains_key(&id) {
            return Err(StoreError::SportNotFound);
        }
        let in_use = self.plans.rows.values().any(|p| p.sport_id == id)
            || self.students.rows.values().any(|s| s.sport_id == id);
        if in_use {
            return Err(StoreError::SportInUse);
        }
        self.sports.rows.remove(&id);
        Ok(())
    }

    pub fn list_plans(&self) -> Vec<SportPlan> {
        self.plans.list()
    }

    pub fn create_plan(
        &mut self,
        details: requests::NewSportPlan,
    ) -> Result<SportPlan, StoreError> {
        self.check_sport(details.sport_id)?;
        Ok(self.plans.insert(SportPlanId, |id| SportPlan {
            id,
            sport_id: details.sport_id,
            name: details.name,
            monthly_fee: details.monthly_fee,
            weekly_frequency: details.weekly_frequency,
            is_active: details.is_active,
        }))
    }

    pub fn update_plan(
        &mut self,
        id: SportPlanId,
        details: requests::NewSportPlan,
    ) -> Result<SportPlan, StoreError> {
        self.check_sport(details.sport_id)?;
        let plan = self
            .plans
            .rows
            .get_mut(&id)
            .ok_or(StoreError::SportPlanNotFound)?;
        plan.sport_id = details.sport_id;
        plan.name = details.name;
        plan.monthly_fee = details.monthly_fee;
        plan.weekly_frequency = details.weekly_frequency;
        plan.is_active = details.is_active;
        Ok(plan.clone())
    }

    pub fn delete_plan(&mut self, id: SportPlanId) -> Result<(), StoreError> {
        if !self.plans.rows.contains_key(&id) {
            return Err(StoreError::SportPlanNotFound);
        }
        if self
            .students
            .rows
            .values()
            .any(|s| s.sport_plan_id == Some(id))
        {
            return Err(StoreError::SportPlanInUse);
        }
        self.plans.rows.remove(&id);
        Ok(())
    }

    pub fn list_students(&self) -> Vec<Student> {
        self.students.list()
    }

    pub fn create_student(
        &mut self,
        details: requests::NewStudent,
    ) -> Result<Student, StoreError> {
        self.check_enrollment(details.sport_id, details.sport_plan_id)?;
        Ok(self.students.insert(StudentId, |id| Student {
            id,
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            phone: details.phone,
            birth_date: details.birth_date,
            enrollment_date: details.enrollment_date,
            sport_id: details.sport_id,
            sport_plan_id: details.sport_plan_id,
            is_active: details.is_active,
        }))
    }

    pub fn update_student(
        &mut self,
        id: StudentId,
        details: requests::NewStudent,
    ) -> Result<Student, StoreError> {
        self.check_enrollment(details.sport_id, details.sport_plan_id)?;
        let student = self
            .students
            .rows
            .get_mut(&id)
            .ok_or(StoreError::StudentNotFound)?;
        *student = Student {
            id,
            first_name: details.first_name,
            last_name: details.last_name,
            email: details.email,
            phone: details.phone,
            birth_date: details.birth_date,
            enrollment_date: details.enrollment_date,
            sport_id: details.sport_id,
            sport_plan_id: details.sport_plan_id,
            is_active: details.is_active,
        };
        Ok(student.clone())
    }

    /// Removing a student also removes their fees and payments.
    pub fn delete_student(&mut self, id: StudentId) -> Result<(), StoreError> {
        self.students
            .rows
            .remove(&id)
            .ok_or(StoreError::StudentNotFound)?;
        self.fees.rows.retain(|_, fee| fee.student_id != id);
        self.payments.rows.retain(|_, p| p.student_id != id);
        Ok(())
    }

    pub fn list_fees(&self) -> Vec<Fee> {
        self.fees.list()
    }

    pub fn create_fee(
        &mut self,
        details: requests::NewFee,
    ) -> Result<Fee, StoreError> {
        self.check_student(details.student_id)?;
        Ok(self.fees.insert(FeeId, |id| Fee {
            id,
            student_id: details.student_id,
            amount: details.amount,
            amount_paid: Decimal::ZERO,
            due_date: details.due_date,
            period: details.period,
            description: details.description,
        }))
    }

    /// The paid amount is kept; it only changes through payments.
    pub fn update_fee(
        &mut self,
        id: FeeId,
        details: requests::NewFee,
    ) -> Result<Fee, StoreError> {
        self.check_student(details.student_id)?;
        let fee = self.fees.rows.get_mut(&id).ok_or(StoreError::FeeNotFound)?;
        fee.student_id = details.student_id;
        fee.amount = details.amount;
        fee.due_date = details.due_date;
        fee.period = details.period;
        fee.description = details.description;
        Ok(fee.clone())
    }

    /// Payments made against the fee are kept, detached from it.
    pub fn delete_fee(&mut self, id: FeeId) -> Result<(), StoreError> {
        self.fees.rows.remove(&id).ok_or(StoreError::FeeNotFound)?;
        for payment in self.payments.rows.values_mut() {
            if payment.fee_id == Some(id) {
                payment.fee_id = None;
            }
        }
        Ok(())
    }

    pub fn list_payments(&self) -> Vec<Payment> {
        self.payments.list()
    }

    /// Record a payment, crediting the referenced fee if there is one.
    pub fn create_payment(
        &mut self,
        details: requests::NewPayment,
    ) -> Result<Payment, StoreError> {
        self.check_student(details.student_id)?;
        if let Some(fee_id) = details.fee_id {
            let fee = self
                .fees
                .rows
                .get_mut(&fee_id)
                .ok_or(StoreError::UnknownFee)?;
            if fee.student_id != details.student_id {
                return Err(StoreError::FeeStudentMismatch);
            }
            fee.amount_paid += details.amount;
        }
        Ok(self.payments.insert(PaymentId, |id| Payment {
            id,
            student_id: details.student_id,
            fee_id: details.fee_id,
            amount: details.amount,
            payment_date: details.payment_date,
            method: details.method,
            notes: details.notes,
        }))
    }

    pub fn delete_payment(&mut self, id: PaymentId) -> Result<(), StoreError> {
        let payment = self
            .payments
            .rows
            .remove(&id)
            .ok_or(StoreError::PaymentNotFound)?;
        if let Some(fee) = payment
            .fee_id
            .and_then(|fee_id| self.fees.rows.get_mut(&fee_id))
        {
            fee.amount_paid -= payment.amount;
        }
        Ok(())
    }

    fn check_sport(&self, id: SportId) -> Result<(), StoreError> {
        self.sports
            .rows
            .contains_key(&id)
            .then_some(())
            .ok_or(StoreError::UnknownSport)
    }

    fn check_student(&self, id: StudentId) -> Result<(), StoreError> {
        self.students
            .rows
            .contains_key(&id)
            .then_some(())
            .ok_or(StoreError::UnknownStudent)
    }

    /// The sport must exist, and the plan, if any, must belong to it.
    fn check_enrollment(
        &self,
        sport_id: SportId,
        plan_id: Option<SportPlanId>,
    ) -> Result<(), StoreError> {
        self.check_sport(sport_id)?;
        if let Some(plan_id) = plan_id {
            let plan = self
                .plans
                .rows
                .get(&plan_id)
                .ok_or(StoreError::UnknownSportPlan)?;
            if plan.sport_id != sport_id {
                return Err(StoreError::PlanSportMismatch);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::Date;
    use payloads::PaymentMethod;
    use rust_decimal::dec;

    fn store_with_student() -> (Store, Sport, Student) {
        let mut store = Store::default();
        let sport = store.create_sport(requests::NewSport {
            name: "Boxing".into(),
            monthly_fee: dec!(12000),
            description: None,
        });
        let student = store
            .create_student(requests::NewStudent {
                first_name: "Ana".into(),
                last_name: "Gómez".into(),
                email: None,
                phone: None,
                birth_date: None,
                enrollment_date: Date::constant(2024, 3, 1),
                sport_id: sport.id,
                sport_plan_id: None,
                is_active: true,
            })
            .unwrap();
        (store, sport, student)
    }

    fn fee_for(student: &Student) -> requests::NewFee {
        requests::NewFee {
            student_id: student.id,
            amount: dec!(12000),
            due_date: Date::constant(2024, 3, 10),
            period: None,
            description: None,
        }
    }

    fn payment_for(
        student: &Student,
        fee_id: Option<FeeId>,
    ) -> requests::NewPayment {
        requests::NewPayment {
            student_id: student.id,
            fee_id,
            amount: dec!(5000),
            payment_date: Date::constant(2024, 3, 5),
            method: PaymentMethod::Cash,
            notes: None,
        }
    }

    #[test]
    fn ids_are_sequential_and_not_reused() {
        let (mut store, sport, _) = store_with_student();
        let plan = |store: &mut Store| {
            store
                .create_plan(requests::NewSportPlan {
                    sport_id: sport.id,
                    name: None,
                    monthly_fee: dec!(1),
                    weekly_frequency: 1,
                    is_active: true,
                })
                .unwrap()
        };
        let first = plan(&mut store);
        store.delete_plan(first.id).unwrap();
        let second = plan(&mut store);
        assert_eq!(first.id, SportPlanId(1));
        assert_eq!(second.id, SportPlanId(2));
    }

    #[test]
    fn plan_requires_existing_sport() {
        let mut store = Store::default();
        let result = store.create_plan(requests::NewSportPlan {
            sport_id: SportId(42),
            name: None,
            monthly_fee: dec!(1),
            weekly_frequency: 1,
            is_active: true,
        });
        assert_eq!(result.unwrap_err(), StoreError::UnknownSport);
    }

    #[test]
    fn payments_credit_and_debit_their_fee() {
        let (mut store, _, student) = store_with_student();
        let fee = store.create_fee(fee_for(&student)).unwrap();
        let payment = store
            .create_payment(payment_for(&student, Some(fee.id)))
            .unwrap();
        assert_eq!(store.list_fees()[0].amount_paid, dec!(5000));

        store.delete_payment(payment.id).unwrap();
        assert_eq!(store.list_fees()[0].amount_paid, Decimal::ZERO);
    }

    #[test]
    fn sport_in_use_cannot_be_deleted() {
        let (mut store, sport, student) = store_with_student();
        assert_eq!(store.delete_sport(sport.id), Err(StoreError::SportInUse));
        store.delete_student(student.id).unwrap();
        assert_eq!(store.delete_sport(sport.id), Ok(()));
    }

    #[test]
    fn deleting_a_student_removes_their_billing() {
        let (mut store, _, student) = store_with_student();
        let fee = store.create_fee(fee_for(&student)).unwrap();
        store
            .create_payment(payment_for(&student, Some(fee.id)))
            .unwrap();
        store.delete_student(student.id).unwrap();
        assert!(store.list_fees().is_empty());
        assert!(store.list_payments().is_empty());
    }
}
