use super::{StoreError, StoreResult, now};
use crate::entity::{profile, student_choice};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use internship_core::domain::{
    ChoiceId, ChoiceRanking, RankedChoice, SubjectId, SubjectStatus, UserId,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ChoiceRecord {
    pub id: ChoiceId,
    pub student_id: UserId,
    pub subject_id: SubjectId,
    pub rank: u8,
    pub created_at: NaiveDateTime,
}

#[async_trait]
pub trait ChoiceRepository: Send + Sync {
    /// Ordered by rank.
    async fn list_by_student(&self, student_id: UserId) -> StoreResult<Vec<ChoiceRecord>>;
    /// Every student's choices, most recent first.
    async fn list_all(&self) -> StoreResult<Vec<ChoiceRecord>>;
    /// Appends the subject after the student's current choices.
    ///
    /// Fails with `Rejected` when a ranking rule forbids it and with
    /// `Conflict` when a concurrent write for the same student won the race.
    async fn append(
        &self,
        student_id: UserId,
        subject_id: SubjectId,
        subject_status: SubjectStatus,
    ) -> StoreResult<ChoiceRecord>;
    /// Deletes the choice and closes the rank gap. `None` when the student had
    /// not chosen the subject.
    async fn remove(
        &self,
        student_id: UserId,
        subject_id: SubjectId,
    ) -> StoreResult<Option<Vec<ChoiceRecord>>>;
}

#[derive(Clone)]
pub struct SeaOrmChoiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmChoiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn map_model(model: student_choice::Model) -> anyhow::Result<ChoiceRecord> {
        let id = ChoiceId::from_str(&model.id)
            .map_err(|e| anyhow!("invalid student_choice.id '{}' from database: {e}", model.id))?;
        let student_id = UserId::from_str(&model.student_id).map_err(|e| {
            anyhow!(
                "invalid student_choice.student_id '{}' from database: {e}",
                model.student_id
            )
        })?;
        let subject_id = SubjectId::from_str(&model.subject_id).map_err(|e| {
            anyhow!(
                "invalid student_choice.subject_id '{}' from database: {e}",
                model.subject_id
            )
        })?;
        let rank = u8::try_from(model.choice_rank).map_err(|_| {
            anyhow!(
                "invalid student_choice.choice_rank from database: {}",
                model.choice_rank
            )
        })?;

        Ok(ChoiceRecord {
            id,
            student_id,
            subject_id,
            rank,
            created_at: model.created_at,
        })
    }

    async fn load_for_student<C: ConnectionTrait>(
        conn: &C,
        student_id: UserId,
    ) -> StoreResult<Vec<ChoiceRecord>> {
        let models = student_choice::Entity::find()
            .filter(student_choice::Column::StudentId.eq(student_id.to_string()))
            .order_by_asc(student_choice::Column::ChoiceRank)
            .all(conn)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    /// Takes the student's profile row for the rest of the transaction, so
    /// appends and removals of one student run one after another.
    async fn lock_student<C: ConnectionTrait>(conn: &C, student_id: UserId) -> StoreResult<()> {
        profile::Entity::find_by_id(student_id.to_string())
            .lock_exclusive()
            .one(conn)
            .await?;
        Ok(())
    }

    fn ranking(records: &[ChoiceRecord]) -> ChoiceRanking {
        ChoiceRanking::new(
            records
                .iter()
                .map(|record| RankedChoice {
                    subject_id: record.subject_id,
                    rank: record.rank,
                })
                .collect(),
        )
    }
}

#[async_trait]
impl ChoiceRepository for SeaOrmChoiceRepository {
    async fn list_by_student(&self, student_id: UserId) -> StoreResult<Vec<ChoiceRecord>> {
        Self::load_for_student(&self.db, student_id).await
    }

    async fn list_all(&self) -> StoreResult<Vec<ChoiceRecord>> {
        let models = student_choice::Entity::find()
            .order_by_desc(student_choice::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(Self::map_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn append(
        &self,
        student_id: UserId,
        subject_id: SubjectId,
        subject_status: SubjectStatus,
    ) -> StoreResult<ChoiceRecord> {
        let txn = self.db.begin().await?;
        Self::lock_student(&txn, student_id).await?;

        let current = Self::load_for_student(&txn, student_id).await?;
        let rank = Self::ranking(&current).next_rank_for(subject_id, subject_status)?;

        let active_model = student_choice::ActiveModel {
            id: Set(ChoiceId::new().to_string()),
            student_id: Set(student_id.to_string()),
            subject_id: Set(subject_id.to_string()),
            choice_rank: Set(i16::from(rank)),
            created_at: Set(now()),
        };
        let model = active_model.insert(&txn).await?;

        // A removal committed after our first read would leave a gap; let the
        // caller retry against fresh ranks instead.
        let after = Self::load_for_student(&txn, student_id).await?;
        if Self::ranking(&after).check_contiguous().is_err() {
            return Err(StoreError::Conflict(format!(
                "choices of student {student_id} changed concurrently"
            )));
        }

        txn.commit().await?;
        Ok(Self::map_model(model)?)
    }

    async fn remove(
        &self,
        student_id: UserId,
        subject_id: SubjectId,
    ) -> StoreResult<Option<Vec<ChoiceRecord>>> {
        let txn = self.db.begin().await?;
        Self::lock_student(&txn, student_id).await?;

        let current = Self::load_for_student(&txn, student_id).await?;
        let Some(changes) = Self::ranking(&current).renumber_without(subject_id) else {
            return Ok(None);
        };

        student_choice::Entity::delete_many()
            .filter(student_choice::Column::StudentId.eq(student_id.to_string()))
            .filter(student_choice::Column::SubjectId.eq(subject_id.to_string()))
            .exec(&txn)
            .await?;

        // Ascending order, so no update lands on a rank that is still taken.
        for change in changes {
            student_choice::Entity::update_many()
                .col_expr(
                    student_choice::Column::ChoiceRank,
                    Expr::value(i16::from(change.to)),
                )
                .filter(student_choice::Column::StudentId.eq(student_id.to_string()))
                .filter(student_choice::Column::SubjectId.eq(change.subject_id.to_string()))
                .exec(&txn)
                .await?;
        }

        let renumbered = Self::load_for_student(&txn, student_id).await?;
        if Self::ranking(&renumbered).check_contiguous().is_err() {
            return Err(StoreError::Conflict(format!(
                "choices of student {student_id} changed concurrently"
            )));
        }
        txn.commit().await?;
        Ok(Some(renumbered))
    }
}
