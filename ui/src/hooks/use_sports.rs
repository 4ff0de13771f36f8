use payloads::{Sport, SportId, requests::SportDraft};

use super::{HookError, SliceOf, clear_error, fetch_into};
use crate::AppContext;

const SLICE: SliceOf<Sport> = |state| &mut state.sports;

pub struct SportsHook<'a> {
    ctx: &'a AppContext,
}

/// Hook over the sport slice. Creating, updating and deleting sports is an
/// admin action; the backend enforces that.
pub fn use_sports(ctx: &AppContext) -> SportsHook<'_> {
    SportsHook { ctx }
}

impl SportsHook<'_> {
    pub fn sports(&self) -> Vec<Sport> {
        self.ctx.state().sports.items().to_vec()
    }

    pub fn is_loaded(&self) -> bool {
        self.ctx.state().sports.is_loaded()
    }

    pub fn error(&self) -> Option<String> {
        self.ctx.state().sports.error().map(str::to_string)
    }

    pub fn clear_error(&self) {
        clear_error(self.ctx.dispatch(), SLICE);
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Sport>, HookError> {
        fetch_into(self.ctx.dispatch(), SLICE, self.ctx.client().list_sports())
            .await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn create(&self, draft: &SportDraft) -> Result<Sport, HookError> {
        let details = draft.validate()?;
        let sport = self.ctx.client().create_sport(&details).await?;
        tracing::info!(sport_id = %sport.id, "created sport");
        Ok(sport)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn update(
        &self,
        sport_id: SportId,
        draft: &SportDraft,
    ) -> Result<Sport, HookError> {
        let details = draft.validate()?;
        Ok(self.ctx.client().update_sport(&sport_id, &details).await?)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn delete(&self, sport_id: SportId) -> Result<(), HookError> {
        self.ctx.client().delete_sport(&sport_id).await?;
        Ok(())
    }
}
