pub mod use_fees;
pub mod use_payments;
pub mod use_session;
pub mod use_sport_plans;
pub mod use_sports;
pub mod use_students;

pub use use_fees::{FeesHook, use_fees};
pub use use_payments::{PaymentsHook, use_payments};
pub use use_session::{SessionHook, use_session};
pub use use_sport_plans::{SportPlansHook, use_sport_plans};
pub use use_sports::{SportsHook, use_sports};
pub use use_students::{StudentsHook, use_students};

use std::future::Future;

use payloads::{ClientError, requests::InvalidField};
use yewdux::prelude::*;

use crate::state::{Slice, State};

/// Why a hook operation failed. Nothing here is fatal; the view decides
/// whether to show it and the user can simply retry.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// A draft field didn't parse. No request was sent.
    #[error(transparent)]
    Invalid(#[from] InvalidField),
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl HookError {
    pub fn invalid_field(&self) -> Option<&InvalidField> {
        match self {
            Self::Invalid(invalid) => Some(invalid),
            Self::Client(_) => None,
        }
    }
}

/// Picks one slice out of the store.
pub(crate) type SliceOf<T> = fn(&mut State) -> &mut Slice<T>;

/// Shared body of every `fetch_all`: await the request, then load the
/// result into the slice or record the failure there as a banner.
pub(crate) async fn fetch_into<T, Fut>(
    dispatch: &Dispatch<State>,
    slice: SliceOf<T>,
    fetch: Fut,
) -> Result<Vec<T>, HookError>
where
    T: Clone,
    Fut: Future<Output = Result<Vec<T>, ClientError>>,
{
    match fetch.await {
        Ok(items) => {
            tracing::debug!(count = items.len(), "loaded");
            let loaded = items.clone();
            dispatch.reduce_mut(move |state| slice(state).load(loaded));
            Ok(items)
        }
        Err(e) => {
            tracing::warn!("fetch failed: {e}");
            let message = e.to_string();
            dispatch.reduce_mut(move |state| slice(state).set_error(message));
            Err(e.into())
        }
    }
}

/// Reset a slice's error banner.
pub(crate) fn clear_error<T>(dispatch: &Dispatch<State>, slice: SliceOf<T>) {
    dispatch.reduce_mut(move |state| slice(state).clear_error());
}
