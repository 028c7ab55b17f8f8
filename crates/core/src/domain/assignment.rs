use super::DomainError;

/// Occupancy of both sides of a prospective student/subject pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentSlots {
    pub student_taken: bool,
    pub subject_taken: bool,
}

impl AssignmentSlots {
    /// The student side is checked first, so a pairing where both sides are
    /// taken reports the student.
    pub fn check(self) -> Result<(), DomainError> {
        if self.student_taken {
            return Err(DomainError::StudentAlreadyAssigned);
        }
        if self.subject_taken {
            return Err(DomainError::SubjectAlreadyAssigned);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_slots_allow_assignment() {
        assert_eq!(AssignmentSlots::default().check(), Ok(()));
    }

    #[test]
    fn student_is_checked_before_subject() {
        let slots = AssignmentSlots {
            student_taken: true,
            subject_taken: true,
        };
        assert_eq!(slots.check(), Err(DomainError::StudentAlreadyAssigned));
    }

    #[test]
    fn taken_subject_is_rejected() {
        let slots = AssignmentSlots {
            student_taken: false,
            subject_taken: true,
        };
        assert_eq!(slots.check(), Err(DomainError::SubjectAlreadyAssigned));
    }
}
