//! What each kind of account can see and do.
//!
//! The capability is resolved once from the profile's role when a session
//! starts; views ask it for their menu and permissions instead of comparing
//! role strings.

use payloads::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Students,
    Sports,
    SportPlans,
    Fees,
    Payments,
    MyPlan,
    MyPayments,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Students => "/students",
            Route::Sports => "/sports",
            Route::SportPlans => "/sports/plans",
            Route::Fees => "/fees",
            Route::Payments => "/payments",
            Route::MyPlan => "/me/plan",
            Route::MyPayments => "/me/payments",
            Route::Profile => "/profile",
        }
    }
}

/// One entry of a navigation menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub route: Route,
}

const fn item(label: &'static str, route: Route) -> MenuItem {
    MenuItem { label, route }
}

const STUDENT_MENU: &[MenuItem] = &[
    item("Home", Route::Home),
    item("My plan", Route::MyPlan),
    item("My payments", Route::MyPayments),
    item("Profile", Route::Profile),
];

const COACH_MENU: &[MenuItem] = &[
    item("Home", Route::Home),
    item("Students", Route::Students),
    item("Plans", Route::SportPlans),
    item("Profile", Route::Profile),
];

const ADMIN_MENU: &[MenuItem] = &[
    item("Home", Route::Home),
    item("Students", Route::Students),
    item("Sports", Route::Sports),
    item("Plans", Route::SportPlans),
    item("Fees", Route::Fees),
    item("Payments", Route::Payments),
    item("Profile", Route::Profile),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Student,
    Coach,
    Admin,
}

impl Capability {
    pub fn from_role(role: Role) -> Self {
        match role {
            Role::Student => Capability::Student,
            Role::Coach => Capability::Coach,
            Role::Admin => Capability::Admin,
        }
    }

    pub fn menu(&self) -> &'static [MenuItem] {
        match self {
            Capability::Student => STUDENT_MENU,
            Capability::Coach => COACH_MENU,
            Capability::Admin => ADMIN_MENU,
        }
    }

    /// Whether the route shows up in this capability's menu.
    pub fn allows(&self, route: Route) -> bool {
        self.menu().iter().any(|item| item.route == route)
    }

    pub fn can_manage_sports(&self) -> bool {
        matches!(self, Capability::Admin)
    }

    pub fn can_manage_plans(&self) -> bool {
        matches!(self, Capability::Admin)
    }

    pub fn can_manage_students(&self) -> bool {
        matches!(self, Capability::Coach | Capability::Admin)
    }

    pub fn can_record_payments(&self) -> bool {
        matches!(self, Capability::Admin)
    }

    pub fn can_view_all_fees(&self) -> bool {
        matches!(self, Capability::Admin)
    }
}
