use super::{DomainError, SubjectId, SubjectStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedChoice {
    pub subject_id: SubjectId,
    pub rank: u8,
}

/// A rank that has to move after a choice was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankChange {
    pub subject_id: SubjectId,
    pub from: u8,
    pub to: u8,
}

/// One student's ordered subject preferences.
///
/// Ranks are always `1..=len` without gaps, and `len <= MAX_CHOICES`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceRanking {
    choices: Vec<RankedChoice>,
}

impl ChoiceRanking {
    pub const MAX_CHOICES: usize = 3;

    pub fn new(mut choices: Vec<RankedChoice>) -> Self {
        choices.sort_by_key(|choice| choice.rank);
        Self { choices }
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn choices(&self) -> &[RankedChoice] {
        &self.choices
    }

    pub fn rank_of(&self, subject_id: SubjectId) -> Option<u8> {
        self.choices
            .iter()
            .find(|choice| choice.subject_id == subject_id)
            .map(|choice| choice.rank)
    }

    pub fn check_contiguous(&self) -> Result<(), DomainError> {
        let contiguous = self
            .choices
            .iter()
            .enumerate()
            .all(|(idx, choice)| usize::from(choice.rank) == idx + 1);

        if contiguous && self.choices.len() <= Self::MAX_CHOICES {
            Ok(())
        } else {
            Err(DomainError::NonContiguousRanks(
                self.choices.iter().map(|choice| choice.rank).collect(),
            ))
        }
    }

    /// Rank the subject would get if appended, or the rule it breaks.
    pub fn next_rank_for(
        &self,
        subject_id: SubjectId,
        subject_status: SubjectStatus,
    ) -> Result<u8, DomainError> {
        if !subject_status.is_open_for_selection() {
            return Err(DomainError::SubjectNotAvailable);
        }
        if self.rank_of(subject_id).is_some() {
            return Err(DomainError::DuplicateChoice);
        }
        if self.choices.len() >= Self::MAX_CHOICES {
            return Err(DomainError::ChoiceLimitExceeded(Self::MAX_CHOICES));
        }

        // len < MAX_CHOICES, so this always fits in u8
        Ok(self.choices.len() as u8 + 1)
    }

    /// Ranks to rewrite once `subject_id` is gone, in ascending order.
    ///
    /// Applying the changes in order never moves a choice onto a rank that is
    /// still taken. Returns `None` when the subject is not among the choices.
    pub fn renumber_without(&self, subject_id: SubjectId) -> Option<Vec<RankChange>> {
        self.rank_of(subject_id)?;

        let remaining = ChoiceRanking {
            choices: self
                .choices
                .iter()
                .filter(|choice| choice.subject_id != subject_id)
                .copied()
                .collect(),
        };

        Some(remaining.compaction())
    }

    /// Ranks to rewrite so the choices read `1..=len` again, keeping their
    /// relative order. Empty when the ranking is already contiguous.
    pub fn compaction(&self) -> Vec<RankChange> {
        self.choices
            .iter()
            .enumerate()
            .filter_map(|(idx, choice)| {
                let to = idx as u8 + 1;
                (choice.rank != to).then_some(RankChange {
                    subject_id: choice.subject_id,
                    from: choice.rank,
                    to,
                })
            })
            .collect()
    }
}
