use payloads::{
    Fee, Identified, Payment, Sport, SportId, SportPlan, Student, StudentId,
    UserProfile,
};
use rust_decimal::Decimal;
use yewdux::prelude::*;

use crate::capability::Capability;

/// Distinguishes "never fetched" from "fetched but empty".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    NotFetched,
    Fetched(T),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::NotFetched
    }
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::Fetched(data) => Some(data),
            Self::NotFetched => None,
        }
    }
}

/// One entity collection plus its error banner.
///
/// The list is only ever replaced wholesale. There is no merging or
/// diffing, so after any mutation the owner re-fetches the full list.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
    items: FetchState<Vec<T>>,
    error_message: Option<String>,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self {
            items: FetchState::NotFetched,
            error_message: None,
        }
    }
}

impl<T> Slice<T> {
    /// Replace the list and clear any error.
    pub fn load(&mut self, items: Vec<T>) {
        self.items = FetchState::Fetched(items);
        self.error_message = None;
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Record a failure. The current list, if any, is kept.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    /// Back to never-fetched.
    pub fn reset(&mut self) {
        self.items = FetchState::NotFetched;
        self.error_message = None;
    }

    /// Current items; empty until the first successful load.
    pub fn items(&self) -> &[T] {
        self.items.as_ref().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.items.is_fetched()
    }

    pub fn error(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl<T: Identified> Slice<T> {
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items().iter().find(|item| item.id() == id)
    }
}

/// A logged in account and what it may do, resolved once per login.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub profile: UserProfile,
    pub capability: Capability,
}

impl Session {
    pub fn resolve(profile: UserProfile) -> Self {
        let capability = Capability::from_role(profile.role);
        Self {
            profile,
            capability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn(Session),
}

#[derive(Default, Clone, PartialEq, Store)]
pub struct State {
    // === Authentication (managed by use_session) ===
    pub auth_state: AuthState,

    // === Entity slices (one hook each) ===
    pub sports: Slice<Sport>,
    pub sport_plans: Slice<SportPlan>,
    pub students: Slice<Student>,
    pub fees: Slice<Fee>,
    pub payments: Slice<Payment>,
}

impl State {
    pub fn session(&self) -> Option<&Session> {
        match &self.auth_state {
            AuthState::LoggedIn(session) => Some(session),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    pub fn capability(&self) -> Option<Capability> {
        self.session().map(|session| session.capability)
    }

    /// The student record of the logged in account, if it has one.
    pub fn current_student(&self) -> Option<&Student> {
        let student_id = self.session()?.profile.student_id?;
        self.students.get(student_id)
    }

    pub fn plans_for_sport(&self, sport_id: SportId) -> Vec<&SportPlan> {
        self.sport_plans
            .items()
            .iter()
            .filter(|plan| plan.sport_id == sport_id)
            .collect()
    }

    /// Plans a new student can be enrolled in.
    pub fn active_plans_for_sport(&self, sport_id: SportId) -> Vec<&SportPlan> {
        self.plans_for_sport(sport_id)
            .into_iter()
            .filter(|plan| plan.is_active)
            .collect()
    }

    pub fn sport_for_student(&self, student_id: StudentId) -> Option<&Sport> {
        let student = self.students.get(student_id)?;
        self.sports.get(student.sport_id)
    }

    pub fn plan_for_student(
        &self,
        student_id: StudentId,
    ) -> Option<&SportPlan> {
        let student = self.students.get(student_id)?;
        self.sport_plans.get(student.sport_plan_id?)
    }

    pub fn students_in_sport(&self, sport_id: SportId) -> Vec<&Student> {
        self.students
            .items()
            .iter()
            .filter(|student| student.sport_id == sport_id)
            .collect()
    }

    pub fn fees_for_student(&self, student_id: StudentId) -> Vec<&Fee> {
        self.fees
            .items()
            .iter()
            .filter(|fee| fee.student_id == student_id)
            .collect()
    }

    pub fn payments_for_student(&self, student_id: StudentId) -> Vec<&Payment> {
        self.payments
            .items()
            .iter()
            .filter(|payment| payment.student_id == student_id)
            .collect()
    }

    /// Sum of what the student still owes across all their fees.
    pub fn outstanding_balance(&self, student_id: StudentId) -> Decimal {
        self.fees_for_student(student_id)
            .into_iter()
            .map(Fee::remaining_balance)
            .sum()
    }

    pub fn overdue_fees(&self, today: jiff::civil::Date) -> Vec<&Fee> {
        self.fees
            .items()
            .iter()
            .filter(|fee| fee.is_overdue(today))
            .collect()
    }

    pub fn clear_entities(&mut self) {
        self.sports.reset();
        self.sport_plans.reset();
        self.students.reset();
        self.fees.reset();
        self.payments.reset();
    }

    pub fn logout(&mut self) {
        self.auth_state = AuthState::LoggedOut;
        self.clear_entities();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::Date;
    use payloads::{FeeId, PaymentMethod, PaymentId, Role, SportPlanId, UserId};
    use rust_decimal::dec;

    fn sport(id: i64) -> Sport {
        Sport {
            id: SportId(id),
            name: format!("sport {id}"),
            monthly_fee: dec!(10000),
            description: None,
        }
    }

    fn plan(id: i64, sport_id: i64, is_active: bool) -> SportPlan {
        SportPlan {
            id: SportPlanId(id),
            sport_id: SportId(sport_id),
            name: None,
            monthly_fee: dec!(8000),
            weekly_frequency: 2,
            is_active,
        }
    }

    fn student(id: i64, sport_id: i64, plan_id: Option<i64>) -> Student {
        Student {
            id: StudentId(id),
            first_name: "Ana".into(),
            last_name: format!("Student {id}"),
            email: None,
            phone: None,
            birth_date: None,
            enrollment_date: Date::constant(2024, 1, 15),
            sport_id: SportId(sport_id),
            sport_plan_id: plan_id.map(SportPlanId),
            is_active: true,
        }
    }

    fn fee(id: i64, student_id: i64, amount: Decimal, paid: Decimal) -> Fee {
        Fee {
            id: FeeId(id),
            student_id: StudentId(student_id),
            amount,
            amount_paid: paid,
            due_date: Date::constant(2024, 3, 10),
            period: None,
            description: None,
        }
    }

    #[test]
    fn load_replaces_list_and_clears_error() {
        let mut slice = Slice::default();
        assert!(!slice.is_loaded());
        assert!(slice.items().is_empty());

        slice.load(vec![sport(1), sport(2)]);
        slice.set_error("Network error");
        slice.load(vec![sport(3)]);

        assert!(slice.is_loaded());
        assert_eq!(slice.items(), &[sport(3)]);
        assert_eq!(slice.error(), None);
    }

    #[test]
    fn load_is_idempotent() {
        let mut once = Slice::default();
        once.load(vec![sport(1), sport(2)]);
        let mut twice = once.clone();
        twice.load(vec![sport(1), sport(2)]);
        assert_eq!(once, twice);
    }

    #[test]
    fn loading_an_empty_list_counts_as_fetched() {
        let mut slice: Slice<Sport> = Slice::default();
        slice.load(Vec::new());
        assert!(slice.is_loaded());
    }

    #[test]
    fn error_is_kept_alongside_previous_items() {
        let mut slice = Slice::default();
        slice.load(vec![sport(1)]);
        slice.set_error("boom");
        assert_eq!(slice.items().len(), 1);
        assert_eq!(slice.error(), Some("boom"));
        slice.clear_error();
        assert_eq!(slice.error(), None);
    }

    #[test]
    fn slice_finds_items_by_id() {
        let mut slice = Slice::default();
        slice.load(vec![sport(1), sport(2)]);
        assert_eq!(slice.get(SportId(2)).map(|s| s.id), Some(SportId(2)));
        assert!(slice.get(SportId(9)).is_none());
    }

    #[test]
    fn active_plans_are_filtered_by_sport() {
        let mut state = State::default();
        state.sport_plans.load(vec![
            plan(1, 1, true),
            plan(2, 1, false),
            plan(3, 2, true),
        ]);
        assert_eq!(state.plans_for_sport(SportId(1)).len(), 2);
        let active: Vec<_> = state
            .active_plans_for_sport(SportId(1))
            .into_iter()
            .map(|plan| plan.id)
            .collect();
        assert_eq!(active, vec![SportPlanId(1)]);
    }

    #[test]
    fn student_lookups_follow_references() {
        let mut state = State::default();
        state.sports.load(vec![sport(1), sport(2)]);
        state.sport_plans.load(vec![plan(5, 2, true)]);
        state
            .students
            .load(vec![student(10, 2, Some(5)), student(11, 1, None)]);

        assert_eq!(
            state.sport_for_student(StudentId(10)).map(|s| s.id),
            Some(SportId(2))
        );
        assert_eq!(
            state.plan_for_student(StudentId(10)).map(|p| p.id),
            Some(SportPlanId(5))
        );
        assert!(state.plan_for_student(StudentId(11)).is_none());
        assert_eq!(state.students_in_sport(SportId(1)).len(), 1);
    }

    #[test]
    fn outstanding_balance_sums_remaining_fees() {
        let mut state = State::default();
        state.fees.load(vec![
            fee(1, 10, dec!(15000.50), dec!(5000)),
            fee(2, 10, dec!(8000), dec!(8000)),
            fee(3, 11, dec!(9999), dec!(0)),
        ]);
        assert_eq!(state.outstanding_balance(StudentId(10)), dec!(10000.50));
        assert_eq!(state.outstanding_balance(StudentId(12)), Decimal::ZERO);

        let overdue: Vec<_> = state
            .overdue_fees(Date::constant(2024, 4, 1))
            .into_iter()
            .map(|fee| fee.id)
            .collect();
        assert_eq!(overdue, vec![FeeId(1), FeeId(3)]);
    }

    #[test]
    fn payments_are_grouped_by_student() {
        let mut state = State::default();
        state.payments.load(vec![Payment {
            id: PaymentId(1),
            student_id: StudentId(10),
            fee_id: None,
            amount: dec!(100),
            payment_date: Date::constant(2024, 3, 1),
            method: PaymentMethod::Cash,
            notes: None,
        }]);
        assert_eq!(state.payments_for_student(StudentId(10)).len(), 1);
        assert!(state.payments_for_student(StudentId(11)).is_empty());
    }

    #[test]
    fn current_student_comes_from_the_session() {
        let mut state = State::default();
        state.students.load(vec![student(10, 1, None)]);
        assert!(state.current_student().is_none());

        state.auth_state = AuthState::LoggedIn(Session::resolve(UserProfile {
            id: UserId(1),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Role::Student,
            student_id: Some(StudentId(10)),
        }));
        assert_eq!(state.capability(), Some(Capability::Student));
        assert_eq!(
            state.current_student().map(|s| s.id),
            Some(StudentId(10))
        );
    }

    #[test]
    fn logout_resets_every_slice() {
        let mut state = State::default();
        state.sports.load(vec![sport(1)]);
        state.fees.set_error("boom");
        state.logout();
        assert_eq!(state.auth_state, AuthState::LoggedOut);
        assert!(!state.sports.is_loaded());
        assert_eq!(state.fees.error(), None);
    }
}
