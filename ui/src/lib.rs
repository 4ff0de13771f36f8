//! Client-side state for the studio front end.
//!
//! Views hold an [`AppContext`], read entity lists from its store and call
//! the per-entity hooks to fetch and mutate them through the backend.

pub mod capability;
pub mod config;
pub mod hooks;
pub mod logs;
pub mod prefs;
pub mod state;
pub mod utils;

pub use capability::{Capability, MenuItem, Route};
pub use config::Config;
pub use state::{AuthState, Session, Slice, State};

use jiff::{civil::Date, tz::TimeZone};
use payloads::APIClient;
use std::rc::Rc;
use yewdux::{Context, prelude::*};

/// Everything the hooks need: the store, the API client and the studio
/// timezone. Created once at startup and dropped on exit.
pub struct AppContext {
    client: APIClient,
    dispatch: Dispatch<State>,
    timezone: TimeZone,
    // Owns the store the dispatch points into.
    _store: Context,
}

impl AppContext {
    pub fn new(client: APIClient, timezone: TimeZone) -> Self {
        let store = Context::new();
        let dispatch = Dispatch::<State>::new(&store);
        Self {
            client,
            dispatch,
            timezone,
            _store: store,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_client(),
            utils::time::studio_timezone(config.studio_timezone.as_deref()),
        )
    }

    pub fn client(&self) -> &APIClient {
        &self.client
    }

    pub fn dispatch(&self) -> &Dispatch<State> {
        &self.dispatch
    }

    /// Snapshot of the store.
    pub fn state(&self) -> Rc<State> {
        self.dispatch.get()
    }

    pub fn timezone(&self) -> &TimeZone {
        &self.timezone
    }

    /// Today's date in the studio timezone.
    pub fn today(&self) -> Date {
        utils::time::today(&self.timezone)
    }
}
