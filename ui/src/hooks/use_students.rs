use payloads::{Student, StudentId, requests::StudentDraft};

use super::{HookError, SliceOf, clear_error, fetch_into};
use crate::AppContext;

const SLICE: SliceOf<Student> = |state| &mut state.students;

/// Hook over the student roster.
pub struct StudentsHook<'a> {
    ctx: &'a AppContext,
}

pub fn use_students(ctx: &AppContext) -> StudentsHook<'_> {
    StudentsHook { ctx }
}

impl StudentsHook<'_> {
    pub fn students(&self) -> Vec<Student> {
        self.ctx.state().students.items().to_vec()
    }

    /// Active students sorted by last name, the way rosters are listed.
    pub fn roster(&self) -> Vec<Student> {
        let mut roster: Vec<_> = self
            .ctx
            .state()
            .students
            .items()
            .iter()
            .filter(|student| student.is_active)
            .cloned()
            .collect();
        roster.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        roster
    }

    pub fn is_loaded(&self) -> bool {
        self.ctx.state().students.is_loaded()
    }

    pub fn error(&self) -> Option<String> {
        self.ctx.state().students.error().map(str::to_string)
    }

    pub fn clear_error(&self) {
        clear_error(self.ctx.dispatch(), SLICE);
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<Student>, HookError> {
        fetch_into(
            self.ctx.dispatch(),
            SLICE,
            self.ctx.client().list_students(),
        )
        .await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn create(
        &self,
        draft: &StudentDraft,
    ) -> Result<Student, HookError> {
        let details = draft.validate()?;
        let student = self.ctx.client().create_student(&details).await?;
        tracing::info!(student_id = %student.id, "enrolled student");
        Ok(student)
    }

    /// Fails with an invalid `isActive` when the draft leaves it unset.
    #[tracing::instrument(skip(self), err)]
    pub async fn update(
        &self,
        student_id: StudentId,
        draft: &StudentDraft,
    ) -> Result<Student, HookError> {
        let details = draft.validate_update()?;
        Ok(self
            .ctx
            .client()
            .update_student(&student_id, &details)
            .await?)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn delete(&self, student_id: StudentId) -> Result<(), HookError> {
        self.ctx.client().delete_student(&student_id).await?;
        Ok(())
    }
}
