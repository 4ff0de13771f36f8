use payloads::{Fee, FeeId, requests::FeeDraft};
use rust_decimal::Decimal;

use super::{HookError, SliceOf, clear_error, fetch_into};
use crate::AppContext;

const SLICE: SliceOf<Fee> = |state| &mut state.fees;

pub struct FeesHook<'a> {
    ctx: &'a AppContext,
}

/// Hook over the fee slice.
///
/// Paid amounts are maintained by the backend as payments are recorded, so
/// after recording a payment re-fetch fees to see updated balances.
pub fn use_fees(ctx: &AppContext) -> FeesHook<'_> {
    FeesHook { ctx }
}

impl FeesHook<'_> {
    pub fn fees(&self) -> Vec<Fee> {
        self.ctx.state().fees.items().to_vec()
    }

    /// Fees past their due date with money still owed, as of today in the
    /// studio timezone.
    pub fn overdue(&self) -> Vec<Fee> {
        let today = self.ctx.today();
        self.ctx
            .state()
            .overdue_fees(today)
            .into_iter()
            .cloned()
            .collect()
    }

    /// What is still owed across all loaded fees.
    pub fn total_outstanding(&self) -> Decimal {
        self.ctx
            .state()
            .fees
            .items()
            .iter()
            .map(Fee::remaining_balance)
            .sum()
    }

    pub fn is_loaded(&self) -> bool {
        self.ctx.state().fees.is_loaded()
    }

    pub fn error(&self) -> Option<String> {
        self.ctx.state().fees.error().map(str::to_string)
    }

    pub fn clear_error(&self) {
        clear_error(self.ctx.dispatch(), SLICE);
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Fee>, HookError> {
        fetch_into(self.ctx.dispatch(), SLICE, self.ctx.client().list_fees())
            .await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn create(&self, draft: &FeeDraft) -> Result<Fee, HookError> {
        let details = draft.validate()?;
        let fee = self.ctx.client().create_fee(&details).await?;
        tracing::info!(fee_id = %fee.id, "created fee");
        Ok(fee)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn update(
        &self,
        fee_id: FeeId,
        draft: &FeeDraft,
    ) -> Result<Fee, HookError> {
        let details = draft.validate()?;
        Ok(self.ctx.client().update_fee(&fee_id, &details).await?)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn delete(&self, fee_id: FeeId) -> Result<(), HookError> {
        self.ctx.client().delete_fee(&fee_id).await?;
        Ok(())
    }
}
