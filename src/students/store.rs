//! # Store de Estudiantes en Memoria
//! src/students/store.rs
//!
//! Colección de registros indexada por matrícula normalizada. No hay
//! persistencia: al reiniciar el proceso los datos se pierden.
//!
//! Un único lock protege todas las operaciones, de modo que nunca hay dos
//! mutaciones concurrentes aunque el servidor use un thread por conexión.

use crate::error::{Result, StudentError};
use crate::students::record::{normalize_code, StudentRecord};
use crate::students::types::StatusFilter;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

/// Store de registros, ordenado por inserción
pub struct RecordStore {
    records: Arc<Mutex<IndexMap<String, StudentRecord>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(IndexMap::new())),
        }
    }

    /// Inserta un registro nuevo
    ///
    /// Falla con `Conflict` si ya existe la matrícula (sin distinguir
    /// mayúsculas).
    pub fn add(&self, record: StudentRecord) -> Result<StudentRecord> {
        let key = record.key();
        let mut records = self.records.lock();

        if records.contains_key(&key) {
            return Err(StudentError::Conflict(
                "Enrollment code already registered".to_string(),
            ));
        }

        records.insert(key, record.clone());
        Ok(record)
    }

    /// Busca por matrícula
    pub fn find_by_code(&self, code: &str) -> Result<StudentRecord> {
        self.records
            .lock()
            .get(&normalize_code(code))
            .cloned()
            .ok_or_else(StudentError::student_not_found)
    }

    /// Lista todos los registros, o solo los del estado indicado
    ///
    /// `NotFound` si el store está vacío (antes de filtrar) o si el filtro
    /// no coincide con ningún registro.
    pub fn list(&self, filter: StatusFilter) -> Result<Vec<StudentRecord>> {
        let records = self.records.lock();

        if records.is_empty() {
            return Err(StudentError::NotFound("No students registered".to_string()));
        }

        let matching: Vec<StudentRecord> = records
            .values()
            .filter(|r| filter.matches(r.status))
            .cloned()
            .collect();

        if matching.is_empty() {
            return Err(StudentError::NotFound(
                "No students match the given status".to_string(),
            ));
        }

        Ok(matching)
    }

    /// Ejecuta `f` sobre el registro bajo el lock
    ///
    /// Si `f` falla, el error se propaga tal cual; lo que `f` haya
    /// modificado antes de fallar queda aplicado, así que las validaciones
    /// deben ir antes de escribir.
    pub fn update<T, F>(&self, code: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut StudentRecord) -> Result<T>,
    {
        let mut records = self.records.lock();
        let record = records
            .get_mut(&normalize_code(code))
            .ok_or_else(StudentError::student_not_found)?;
        f(record)
    }

    /// Elimina el registro y lo retorna
    pub fn remove(&self, code: &str) -> Result<StudentRecord> {
        self.records
            .lock()
            .shift_remove(&normalize_code(code))
            .ok_or_else(StudentError::student_not_found)
    }

    /// Registros con notas completas, en orden de inserción
    pub fn with_grades(&self) -> Vec<StudentRecord> {
        self.records
            .lock()
            .values()
            .filter(|r| r.grades.is_some())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RecordStore {
    /// Los clones comparten el mismo estado
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::students::types::{Grades, StudentStatus};

    fn student(name: &str, code: &str, status: StudentStatus) -> StudentRecord {
        StudentRecord::new(name.to_string(), code.to_string(), status)
    }

    // ==================== Add / Find ====================

    #[test]
    fn test_add_and_find() {
        let store = RecordStore::new();
        let stored = store.add(student("Ana", "A-1", StudentStatus::Active)).unwrap();
        assert_eq!(stored.enrollment_code, "A-1");

        let found = store.find_by_code("A-1").unwrap();
        assert_eq!(found.name, "Ana");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_duplicate_any_case_conflicts() {
        let store = RecordStore::new();
        store.add(student("Ana", "abc", StudentStatus::Active)).unwrap();

        let result = store.add(student("Bia", "ABC", StudentStatus::Active));
        assert!(matches!(result, Err(StudentError::Conflict(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let store = RecordStore::new();
        store.add(student("Ana", "Xy-9", StudentStatus::Active)).unwrap();

        let found = store.find_by_code("xY-9").unwrap();
        assert_eq!(found.enrollment_code, "Xy-9");
    }

    #[test]
    fn test_find_missing() {
        let store = RecordStore::new();
        assert!(matches!(store.find_by_code("nope"), Err(StudentError::NotFound(_))));
    }

    // ==================== List ====================

    #[test]
    fn test_list_empty_store_not_found() {
        let store = RecordStore::new();
        assert!(matches!(store.list(StatusFilter::Any), Err(StudentError::NotFound(_))));
        assert!(matches!(
            store.list(StatusFilter::Only(StudentStatus::Active)),
            Err(StudentError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let store = RecordStore::new();
        store.add(student("Caio", "C", StudentStatus::Active)).unwrap();
        store.add(student("Ana", "A", StudentStatus::Inactive)).unwrap();
        store.add(student("Bia", "B", StudentStatus::Active)).unwrap();

        let codes: Vec<String> = store
            .list(StatusFilter::Any)
            .unwrap()
            .into_iter()
            .map(|r| r.enrollment_code)
            .collect();
        assert_eq!(codes, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_list_filter() {
        let store = RecordStore::new();
        store.add(student("Ana", "A", StudentStatus::Active)).unwrap();
        store.add(student("Bia", "B", StudentStatus::Inactive)).unwrap();

        let active = store.list(StatusFilter::Only(StudentStatus::Active)).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].enrollment_code, "A");
    }

    #[test]
    fn test_list_filter_without_matches_is_not_found() {
        let store = RecordStore::new();
        store.add(student("Ana", "A", StudentStatus::Active)).unwrap();

        let result = store.list(StatusFilter::Only(StudentStatus::Inactive));
        assert!(matches!(result, Err(StudentError::NotFound(_))));
    }

    #[test]
    fn test_list_unknown_filter_matches_nothing() {
        let store = RecordStore::new();
        store.add(student("Ana", "A", StudentStatus::Active)).unwrap();
        store.add(student("Bia", "B", StudentStatus::Inactive)).unwrap();

        match store.list(StatusFilter::Unknown) {
            Err(StudentError::NotFound(msg)) => {
                assert_eq!(msg, "No students match the given status")
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    // ==================== Update ====================

    #[test]
    fn test_update_mutates_in_place() {
        let store = RecordStore::new();
        store.add(student("Ana", "A", StudentStatus::Active)).unwrap();

        store
            .update("a", |r| {
                r.record_grades(Grades::new([9.0; 4]).unwrap());
                Ok(())
            })
            .unwrap();

        assert!(store.find_by_code("A").unwrap().grades.is_some());
    }

    #[test]
    fn test_update_missing_record() {
        let store = RecordStore::new();
        let result = store.update("ghost", |_| Ok(()));
        assert!(matches!(result, Err(StudentError::NotFound(_))));
    }

    #[test]
    fn test_update_propagates_closure_error() {
        let store = RecordStore::new();
        store.add(student("Ana", "A", StudentStatus::Active)).unwrap();

        let result: Result<()> =
            store.update("A", |_| Err(StudentError::Forbidden("no".to_string())));
        assert!(matches!(result, Err(StudentError::Forbidden(_))));
    }

    // ==================== Remove ====================

    #[test]
    fn test_remove() {
        let store = RecordStore::new();
        store.add(student("Ana", "A", StudentStatus::Active)).unwrap();
        store.add(student("Bia", "B", StudentStatus::Active)).unwrap();
        store.add(student("Caio", "C", StudentStatus::Active)).unwrap();

        let removed = store.remove("b").unwrap();
        assert_eq!(removed.name, "Bia");
        assert_eq!(store.len(), 2);

        let codes: Vec<String> = store
            .list(StatusFilter::Any)
            .unwrap()
            .into_iter()
            .map(|r| r.enrollment_code)
            .collect();
        assert_eq!(codes, vec!["A", "C"]);
    }

    #[test]
    fn test_remove_missing() {
        let store = RecordStore::new();
        assert!(matches!(store.remove("A"), Err(StudentError::NotFound(_))));
    }

    #[test]
    fn test_code_reusable_after_remove() {
        let store = RecordStore::new();
        store.add(student("Ana", "A", StudentStatus::Active)).unwrap();
        store.remove("A").unwrap();
        assert!(store.add(student("Ana", "a", StudentStatus::Active)).is_ok());
    }

    // ==================== With Grades / Clone ====================

    #[test]
    fn test_with_grades() {
        let store = RecordStore::new();
        assert!(store.with_grades().is_empty());

        store.add(student("Ana", "A", StudentStatus::Active)).unwrap();
        store.add(student("Bia", "B", StudentStatus::Active)).unwrap();
        store
            .update("B", |r| {
                r.record_grades(Grades::new([5.0; 4]).unwrap());
                Ok(())
            })
            .unwrap();

        let graded = store.with_grades();
        assert_eq!(graded.len(), 1);
        assert_eq!(graded[0].enrollment_code, "B");
    }

    #[test]
    fn test_clone_shares_state() {
        let store = RecordStore::new();
        let other = store.clone();

        other.add(student("Ana", "A", StudentStatus::Active)).unwrap();
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_concurrent_adds_same_code() {
        let store = RecordStore::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let code = if i % 2 == 0 { "dup" } else { "DUP" };
                    store.add(student("Ana", code, StudentStatus::Active)).is_ok()
                })
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }
}
