//! A single memoized node of the dashboard's dependency graph.

use std::future::Future;

/// Caches the last successful value of a computation together with the
/// dependency values it was computed from.
///
/// Asking again with an equal key returns the stored value; a different key
/// recomputes. Failed computations are not stored, so the next request retries.
///
/// # Examples
///
/// ```
/// use heatpump_counter::Memo;
///
/// let mut square: Memo<i32, i32> = Memo::new();
/// assert_eq!(*square.get_or_compute(4, || 16), 16);
/// assert_eq!(*square.get_or_compute(4, || unreachable!()), 16);
/// assert_eq!(*square.get_or_compute(5, || 25), 25);
/// assert_eq!(square.computations(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Memo<K, V> {
    slot: Option<(K, V)>,
    computations: usize,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            slot: None,
            computations: 0,
        }
    }
}

impl<K: PartialEq, V> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if !matches!(&self.slot, Some((cached, _)) if *cached == key) {
            self.computations += 1;
            self.slot = Some((key, compute()));
        }
        &self.slot.as_ref().expect("slot is filled above").1
    }

    pub fn get_or_try_compute<E>(
        &mut self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        if !matches!(&self.slot, Some((cached, _)) if *cached == key) {
            self.computations += 1;
            let value = compute()?;
            self.slot = Some((key, value));
        }
        Ok(&self.slot.as_ref().expect("slot is filled above").1)
    }

    pub async fn get_or_try_compute_async<E, Fut>(
        &mut self,
        key: K,
        compute: impl FnOnce() -> Fut,
    ) -> Result<&V, E>
    where
        Fut: Future<Output = Result<V, E>>,
    {
        if !matches!(&self.slot, Some((cached, _)) if *cached == key) {
            self.computations += 1;
            let value = compute().await?;
            self.slot = Some((key, value));
        }
        Ok(&self.slot.as_ref().expect("slot is filled above").1)
    }

    /// The stored value, whatever key it belongs to.
    pub fn cached(&self) -> Option<&V> {
        self.slot.as_ref().map(|(_, value)| value)
    }

    /// How many times a computation has been started, including failed ones.
    pub fn computations(&self) -> usize {
        self.computations
    }
}
