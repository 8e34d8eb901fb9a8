//! Thread-safe archive handle.

use super::Archive;
use crate::solution::Solution;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A cloneable handle to an archive behind a mutex.
///
/// Concurrent [`add`](SharedArchive::add) calls are serialized, so the
/// archive stays mutually non-dominated no matter how many threads insert.
/// Readers take a [`snapshot`](SharedArchive::snapshot).
///
/// # Examples
///
/// ```
/// use u_moea::archive::{NondominatedPopulation, SharedArchive};
/// use u_moea::solution::Solution;
///
/// let shared = SharedArchive::new(NondominatedPopulation::new());
/// let handle = shared.clone();
/// std::thread::spawn(move || handle.add(Solution::from_objectives(vec![1.0, 2.0])))
///     .join()
///     .unwrap();
/// assert_eq!(shared.len(), 1);
/// ```
#[derive(Debug)]
pub struct SharedArchive<A> {
    inner: Arc<Mutex<A>>,
}

impl<A> Clone for SharedArchive<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Archive> SharedArchive<A> {
    pub fn new(archive: A) -> Self {
        Self {
            inner: Arc::new(Mutex::new(archive)),
        }
    }

    // Poisoning is ignored: an archive is never left half updated.
    fn lock(&self) -> MutexGuard<'_, A> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, solution: Solution) -> bool {
        self.lock().add(solution)
    }

    /// Adds the batch under a single lock acquisition.
    pub fn add_all<I: IntoIterator<Item = Solution>>(&self, solutions: I) -> usize {
        self.lock().add_all(solutions)
    }

    /// Copy of the current members.
    pub fn snapshot(&self) -> Vec<Solution> {
        self.lock().as_slice().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Runs `f` with exclusive access to the archive.
    pub fn with<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Unwraps the archive if this is the last handle.
    pub fn try_into_inner(self) -> Result<A, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner().unwrap_or_else(PoisonError::into_inner)),
            Err(inner) => Err(Self { inner }),
        }
    }
}
