use payloads::{SportPlan, SportPlanId, requests::SportPlanDraft};

use super::{HookError, SliceOf, clear_error, fetch_into};
use crate::AppContext;

const SLICE: SliceOf<SportPlan> = |state| &mut state.sport_plans;

/// Hook over the sport plan slice.
pub struct SportPlansHook<'a> {
    ctx: &'a AppContext,
}

pub fn use_sport_plans(ctx: &AppContext) -> SportPlansHook<'_> {
    SportPlansHook { ctx }
}

impl SportPlansHook<'_> {
    pub fn plans(&self) -> Vec<SportPlan> {
        self.ctx.state().sport_plans.items().to_vec()
    }

    pub fn is_loaded(&self) -> bool {
        self.ctx.state().sport_plans.is_loaded()
    }

    pub fn error(&self) -> Option<String> {
        self.ctx.state().sport_plans.error().map(str::to_string)
    }

    pub fn clear_error(&self) {
        clear_error(self.ctx.dispatch(), SLICE);
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<SportPlan>, HookError> {
        fetch_into(
            self.ctx.dispatch(),
            SLICE,
            self.ctx.client().list_sport_plans(),
        )
        .await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn create(
        &self,
        draft: &SportPlanDraft,
    ) -> Result<SportPlan, HookError> {
        let details = draft.validate()?;
        let plan = self.ctx.client().create_sport_plan(&details).await?;
        tracing::info!(plan_id = %plan.id, "created sport plan");
        Ok(plan)
    }

    /// The draft must say whether the plan stays active; seed it with
    /// `SportPlanDraft::from(&plan)` to keep the current flag.
    #[tracing::instrument(skip(self), err)]
    pub async fn update(
        &self,
        plan_id: SportPlanId,
        draft: &SportPlanDraft,
    ) -> Result<SportPlan, HookError> {
        let details = draft.validate_update()?;
        Ok(self
            .ctx
            .client()
            .update_sport_plan(&plan_id, &details)
            .await?)
    }

    /// Plans with enrolled students can't be deleted; deactivate them instead.
    #[tracing::instrument(skip(self), err)]
    pub async fn set_active(
        &self,
        plan: &SportPlan,
        is_active: bool,
    ) -> Result<SportPlan, HookError> {
        let draft = SportPlanDraft {
            is_active: Some(is_active),
            ..SportPlanDraft::from(plan)
        };
        self.update(plan.id, &draft).await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn delete(&self, plan_id: SportPlanId) -> Result<(), HookError> {
        self.ctx.client().delete_sport_plan(&plan_id).await?;
        tracing::info!("deleted sport plan");
        Ok(())
    }
}
