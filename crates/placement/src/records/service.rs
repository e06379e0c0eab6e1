use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use super::domain::{MockTest, Student, StudentId, StudentProfile, TestHeader, TestId};
use super::repository::{RepositoryError, StudentRepository};
use crate::engine::{
    PlacementEngine, RawScores, SchoolDirectory, ScorePolicy, ScoreValidationError,
};

/// Service composing the repository, the placement engine, and the score
/// ingestion policy.
pub struct PlacementService<R> {
    repository: Arc<R>,
    engine: Arc<PlacementEngine>,
    directory: Arc<SchoolDirectory>,
    policy: ScorePolicy,
    student_sequence: AtomicU64,
    test_sequence: AtomicU64,
}

impl<R> PlacementService<R>
where
    R: StudentRepository + 'static,
{
    pub fn new(
        repository: Arc<R>,
        engine: Arc<PlacementEngine>,
        directory: Arc<SchoolDirectory>,
        policy: ScorePolicy,
    ) -> Self {
        Self {
            repository,
            engine,
            directory,
            policy,
            student_sequence: AtomicU64::new(1),
            test_sequence: AtomicU64::new(1),
        }
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    pub fn directory(&self) -> &SchoolDirectory {
        &self.directory
    }

    fn next_student_id(&self) -> StudentId {
        let id = self.student_sequence.fetch_add(1, Ordering::Relaxed);
        StudentId(format!("stu-{id:06}"))
    }

    fn next_test_id(&self) -> TestId {
        let id = self.test_sequence.fetch_add(1, Ordering::Relaxed);
        TestId(format!("MT{id:06}"))
    }

    /// Register a student after checking the profile and index-number uniqueness.
    pub fn register_student(
        &self,
        profile: StudentProfile,
    ) -> Result<Student, PlacementServiceError> {
        let problems = profile.problems();
        if !problems.is_empty() {
            return Err(PlacementServiceError::InvalidProfile { problems });
        }
        if self
            .repository
            .find_by_index(&profile.index_number)?
            .is_some()
        {
            return Err(PlacementServiceError::DuplicateIndexNumber(
                profile.index_number.trim().to_string(),
            ));
        }

        let student = Student::new(self.next_student_id(), profile);
        let stored = self.repository.insert(student)?;
        info!(student = %stored.id, index = %stored.index_number(), "registered student");
        Ok(stored)
    }

    /// Grade a new mock test and append it to the student's record.
    pub fn record_test(
        &self,
        student_id: &StudentId,
        header: TestHeader,
        scores: RawScores,
    ) -> Result<MockTest, PlacementServiceError> {
        let mut student = self.get(student_id)?;
        let test = self.grade(header, scores)?;
        student.mock_tests.push(test.clone());
        self.repository.update(student)?;

        info!(
            student = %student_id,
            test = %test.id,
            aggregate = test.aggregate(),
            category = test.category().label(),
            "recorded mock test"
        );
        Ok(test)
    }

    /// Same as [`Self::record_test`], addressed by the student's exam index number.
    pub fn record_test_by_index(
        &self,
        index_number: &str,
        header: TestHeader,
        scores: RawScores,
    ) -> Result<MockTest, PlacementServiceError> {
        let student = self
            .repository
            .find_by_index(index_number)?
            .ok_or_else(|| PlacementServiceError::UnknownIndexNumber(index_number.to_string()))?;
        self.record_test(&student.id, header, scores)
    }

    /// Record a test for `profile.index_number`, registering the student first
    /// when the index number is new. Scores are validated before the student
    /// is registered.
    pub fn record_test_or_register(
        &self,
        profile: StudentProfile,
        header: TestHeader,
        scores: RawScores,
    ) -> Result<MockTest, PlacementServiceError> {
        let scores = scores.validated(self.policy)?;
        let student = match self.repository.find_by_index(&profile.index_number)? {
            Some(student) => student,
            None => self.register_student(profile)?,
        };
        self.record_test(&student.id, header, scores)
    }

    /// Replace the raw scores of an existing test and regrade it.
    pub fn rescore_test(
        &self,
        student_id: &StudentId,
        test_id: &TestId,
        scores: RawScores,
    ) -> Result<MockTest, PlacementServiceError> {
        let scores = scores.validated(self.policy)?;
        let mut student = self.get(student_id)?;
        let test = student
            .test_mut(test_id)
            .ok_or_else(|| PlacementServiceError::UnknownTest(test_id.clone()))?;
        test.rescore(scores, &self.engine, &self.directory);
        let updated = test.clone();
        self.repository.update(student)?;

        info!(
            student = %student_id,
            test = %test_id,
            aggregate = updated.aggregate(),
            "rescored mock test"
        );
        Ok(updated)
    }

    /// Regrade every stored test of a student whose frozen fields no longer
    /// match its raw scores, returning how many were rewritten.
    pub fn reconcile(&self, student_id: &StudentId) -> Result<usize, PlacementServiceError> {
        let mut student = self.get(student_id)?;
        let mut refreshed = 0;
        for test in &mut student.mock_tests {
            if test.refresh(&self.engine, &self.directory) {
                debug!(student = %student_id, test = %test.id, "regraded stale mock test");
                refreshed += 1;
            }
        }

        if refreshed > 0 {
            self.repository.update(student)?;
            info!(student = %student_id, refreshed, "reconciled stale mock tests");
        }
        Ok(refreshed)
    }

    /// Fetch a student and their tests.
    pub fn get(&self, student_id: &StudentId) -> Result<Student, PlacementServiceError> {
        let student = self
            .repository
            .fetch(student_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(student)
    }

    pub fn students(&self) -> Result<Vec<Student>, PlacementServiceError> {
        Ok(self.repository.list()?)
    }

    fn grade(
        &self,
        header: TestHeader,
        scores: RawScores,
    ) -> Result<MockTest, PlacementServiceError> {
        let scores = scores.validated(self.policy)?;
        Ok(MockTest::record(
            self.next_test_id(),
            header,
            scores,
            &self.engine,
            &self.directory,
        ))
    }
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error("invalid student profile: {}", .problems.join("; "))]
    InvalidProfile { problems: Vec<String> },
    #[error("index number {0} is already registered")]
    DuplicateIndexNumber(String),
    #[error("no student registered with index number {0}")]
    UnknownIndexNumber(String),
    #[error("mock test {0} not found")]
    UnknownTest(TestId),
    #[error(transparent)]
    Scores(#[from] ScoreValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
