use payloads::{Payment, PaymentId, PaymentMethod, requests::PaymentDraft};
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::{HookError, SliceOf, clear_error, fetch_into};
use crate::AppContext;

const SLICE: SliceOf<Payment> = |state| &mut state.payments;

/// Hook over recorded payments. Payments are never edited; a mistaken one is
/// deleted and recorded again.
pub struct PaymentsHook<'a> {
    ctx: &'a AppContext,
}

pub fn use_payments(ctx: &AppContext) -> PaymentsHook<'_> {
    PaymentsHook { ctx }
}

impl PaymentsHook<'_> {
    pub fn payments(&self) -> Vec<Payment> {
        self.ctx.state().payments.items().to_vec()
    }

    /// Totals collected per payment method, for the cash-register summary.
    pub fn totals_by_method(&self) -> HashMap<PaymentMethod, Decimal> {
        let mut totals = HashMap::new();
        for payment in self.ctx.state().payments.items() {
            *totals.entry(payment.method).or_insert(Decimal::ZERO) +=
                payment.amount;
        }
        totals
    }

    pub fn is_loaded(&self) -> bool {
        self.ctx.state().payments.is_loaded()
    }

    pub fn error(&self) -> Option<String> {
        self.ctx.state().payments.error().map(str::to_string)
    }

    pub fn clear_error(&self) {
        clear_error(self.ctx.dispatch(), SLICE);
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Payment>, HookError> {
        fetch_into(
            self.ctx.dispatch(),
            SLICE,
            self.ctx.client().list_payments(),
        )
        .await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn create(
        &self,
        draft: &PaymentDraft,
    ) -> Result<Payment, HookError> {
        let details = draft.validate()?;
        let payment = self.ctx.client().create_payment(&details).await?;
        tracing::info!(payment_id = %payment.id, "recorded payment");
        Ok(payment)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn delete(&self, payment_id: PaymentId) -> Result<(), HookError> {
        self.ctx.client().delete_payment(&payment_id).await?;
        Ok(())
    }
}
