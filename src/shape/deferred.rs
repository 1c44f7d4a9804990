use std::fmt;
use std::sync::{Arc, OnceLock};

/// A provider of geometric data that may not be available yet.
///
/// This is the seam with asset loading: `load` is polled by
/// [`DeferredArray::validate`] and returns `None` while the data is still
/// being produced. It must never block.
pub trait ArraySource<T>: Send + Sync {
    /// Returns the data if it is ready.
    fn load(&self) -> Option<Vec<T>>;
}

impl<T, F> ArraySource<T> for F
where
    F: Fn() -> Option<Vec<T>> + Send + Sync,
{
    fn load(&self) -> Option<Vec<T>> {
        self()
    }
}

/// An array which is either ready or loaded later from an [`ArraySource`].
///
/// Once loaded the data never changes.
#[derive(Clone)]
pub struct DeferredArray<T> {
    data: OnceLock<Vec<T>>,
    source: Option<Arc<dyn ArraySource<T>>>,
}

impl<T> DeferredArray<T> {
    /// An array whose data is already available.
    pub fn ready(data: Vec<T>) -> Self {
        DeferredArray {
            data: OnceLock::from(data),
            source: None,
        }
    }

    /// An array whose data will be polled from `source`.
    pub fn deferred(source: Arc<dyn ArraySource<T>>) -> Self {
        DeferredArray {
            data: OnceLock::new(),
            source: Some(source),
        }
    }

    /// Is the data available?
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.data.get().is_some()
    }

    /// Polls the source once if the data is not available yet.
    ///
    /// Returns `true` if the data is available.
    pub fn validate(&self) -> bool {
        if self.is_ready() {
            return true;
        }

        if let Some(data) = self.source.as_ref().and_then(|source| source.load()) {
            // Concurrent loads of the same source are equivalent: keep the first one.
            let _ = self.data.set(data);
        }

        self.is_ready()
    }

    /// The data, if available.
    #[inline]
    pub fn get(&self) -> Option<&[T]> {
        self.data.get().map(|data| &data[..])
    }

    /// The data, or an empty slice if it is not available yet.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.get().unwrap_or(&[])
    }
}

impl<T> From<Vec<T>> for DeferredArray<T> {
    fn from(data: Vec<T>) -> Self {
        DeferredArray::ready(data)
    }
}

impl<T: fmt::Debug> fmt::Debug for DeferredArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data.get() {
            Some(data) => f.debug_tuple("DeferredArray").field(data).finish(),
            None => f.write_str("DeferredArray(<pending>)"),
        }
    }
}
