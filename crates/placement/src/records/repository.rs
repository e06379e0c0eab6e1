use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{Student, StudentId};

/// Storage abstraction so the service can be exercised without a database.
pub trait StudentRepository: Send + Sync {
    fn insert(&self, student: Student) -> Result<Student, RepositoryError>;
    fn update(&self, student: Student) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError>;
    fn find_by_index(&self, index_number: &str) -> Result<Option<Student>, RepositoryError>;
    fn list(&self) -> Result<Vec<Student>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local repository used by the CLI and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStudentRepository {
    records: Arc<Mutex<BTreeMap<StudentId, Student>>>,
}

impl InMemoryStudentRepository {
    fn records(&self) -> Result<MutexGuard<'_, BTreeMap<StudentId, Student>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("student store lock poisoned".to_string()))
    }
}

impl StudentRepository for InMemoryStudentRepository {
    fn insert(&self, student: Student) -> Result<Student, RepositoryError> {
        let mut guard = self.records()?;
        if guard.contains_key(&student.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(student.id.clone(), student.clone());
        Ok(student)
    }

    fn update(&self, student: Student) -> Result<(), RepositoryError> {
        let mut guard = self.records()?;
        match guard.get_mut(&student.id) {
            Some(existing) => {
                *existing = student;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        Ok(self.records()?.get(id).cloned())
    }

    fn find_by_index(&self, index_number: &str) -> Result<Option<Student>, RepositoryError> {
        let wanted = index_number.trim();
        Ok(self
            .records()?
            .values()
            .find(|student| student.index_number().trim() == wanted)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Student>, RepositoryError> {
        Ok(self.records()?.values().cloned().collect())
    }
}
