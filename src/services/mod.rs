//! # Dependency provider boundary.
//!
//! The registry needs a provider that can
//! (a) create an isolated, disposable [`ServiceScope`], and
//! (b) resolve typed services inside that scope while a behaviour is built.
//!
//! [`Services`] is a small type-map implementation of [`ServiceProvider`]:
//! singletons are shared by every scope, scoped services are built lazily
//! once per scope and dropped when the scope is disposed.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use behaviourd::{ServiceProvider, Services};
//!
//! struct Settings { prefix: &'static str }
//! struct Greeter { prefix: &'static str }
//!
//! let services = Services::new()
//!     .singleton(Settings { prefix: "hello" })
//!     .scoped(|scope| {
//!         let settings = scope.resolve::<Settings>()?;
//!         Ok(Greeter { prefix: settings.prefix })
//!     });
//!
//! let scope = services.create_scope().unwrap();
//! let greeter: Arc<Greeter> = scope.resolve().unwrap();
//! assert_eq!(greeter.prefix, "hello");
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::ProviderError;

/// Type-erased service instance.
pub type Service = Arc<dyn Any + Send + Sync>;

type Factory = Arc<dyn Fn(&dyn ServiceScope) -> Result<Service, ProviderError> + Send + Sync>;

static SCOPE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Isolated, disposable resolution context owned by one behaviour.
pub trait ServiceScope: Send + Sync {
    /// Process-unique scope id (for logs).
    fn id(&self) -> u64;

    /// Resolves a service by type id.
    fn resolve_any(&self, type_id: TypeId, type_name: &'static str)
    -> Result<Service, ProviderError>;

    /// Releases every scoped instance; later resolutions fail with `Disposed`.
    fn dispose(&self);

    /// True once `dispose` was called.
    fn is_disposed(&self) -> bool;
}

impl<'a> dyn ServiceScope + 'a {
    /// Resolves a service of type `T`.
    pub fn resolve<T>(&self) -> Result<Arc<T>, ProviderError>
    where
        T: Any + Send + Sync,
    {
        self.resolve_any(TypeId::of::<T>(), type_name::<T>())?
            .downcast::<T>()
            .map_err(|_| ProviderError::Missing {
                type_name: type_name::<T>(),
            })
    }
}

/// Creates scopes.
pub trait ServiceProvider: Send + Sync {
    /// Creates a new scope, isolated from every other scope.
    fn create_scope(&self) -> Result<Box<dyn ServiceScope>, ProviderError>;
}

#[derive(Clone)]
enum Registration {
    Singleton(Service),
    Scoped(Factory),
}

/// Type-map service container.
#[derive(Clone, Default)]
pub struct Services {
    registrations: Arc<HashMap<TypeId, Registration>>,
}

impl Services {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a value shared by all scopes.
    pub fn singleton<T>(self, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.singleton_arc(Arc::new(value))
    }

    /// Registers an already shared value.
    pub fn singleton_arc<T>(mut self, value: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        Arc::make_mut(&mut self.registrations)
            .insert(TypeId::of::<T>(), Registration::Singleton(value));
        self
    }

    /// Registers a service built once per scope.
    ///
    /// The factory may resolve other services from the same scope.
    pub fn scoped<T, F>(mut self, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn ServiceScope) -> Result<T, ProviderError> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |scope| Ok(Arc::new(factory(scope)?) as Service));
        Arc::make_mut(&mut self.registrations)
            .insert(TypeId::of::<T>(), Registration::Scoped(factory));
        self
    }

    /// True if a service of type `T` is registered.
    pub fn contains<T: Any>(&self) -> bool {
        self.registrations.contains_key(&TypeId::of::<T>())
    }
}

impl ServiceProvider for Services {
    fn create_scope(&self) -> Result<Box<dyn ServiceScope>, ProviderError> {
        let scope = Scope {
            id: SCOPE_SEQ.fetch_add(1, Ordering::Relaxed) + 1,
            registrations: Arc::clone(&self.registrations),
            instances: Mutex::new(HashMap::new()),
            disposed: AtomicBool::new(false),
        };
        debug!(scope = scope.id, "service scope created");
        Ok(Box::new(scope))
    }
}

struct Scope {
    id: u64,
    registrations: Arc<HashMap<TypeId, Registration>>,
    instances: Mutex<HashMap<TypeId, Service>>,
    disposed: AtomicBool,
}

impl Scope {
    fn cached(&self, type_id: TypeId) -> Option<Service> {
        self.instances
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&type_id)
            .cloned()
    }
}

impl ServiceScope for Scope {
    fn id(&self) -> u64 {
        self.id
    }

    fn resolve_any(
        &self,
        type_id: TypeId,
        type_name: &'static str,
    ) -> Result<Service, ProviderError> {
        if self.is_disposed() {
            return Err(ProviderError::Disposed);
        }
        match self.registrations.get(&type_id) {
            Some(Registration::Singleton(value)) => Ok(Arc::clone(value)),
            Some(Registration::Scoped(factory)) => {
                if let Some(existing) = self.cached(type_id) {
                    return Ok(existing);
                }
                // Built outside the lock: the factory may resolve other services.
                let built = factory(self)?;
                let mut instances = self.instances.lock().unwrap_or_else(|p| p.into_inner());
                Ok(Arc::clone(instances.entry(type_id).or_insert(built)))
            }
            None => Err(ProviderError::Missing { type_name }),
        }
    }

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::AcqRel) {
            let released = {
                let mut instances = self.instances.lock().unwrap_or_else(|p| p.into_inner());
                std::mem::take(&mut *instances)
            };
            debug!(scope = self.id, released = released.len(), "service scope disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Counter(AtomicUsize);
    struct PerScope(u64);

    fn services() -> Services {
        Services::new()
            .singleton(Counter(AtomicUsize::new(0)))
            .scoped(|scope| {
                let counter = scope.resolve::<Counter>()?;
                let n = counter.0.fetch_add(1, Ordering::SeqCst) as u64;
                Ok(PerScope(n))
            })
    }

    #[test]
    fn test_singleton_is_shared_across_scopes() {
        let services = services();
        let a = services.create_scope().unwrap();
        let b = services.create_scope().unwrap();
        let ca = a.resolve::<Counter>().unwrap();
        let cb = b.resolve::<Counter>().unwrap();
        assert!(Arc::ptr_eq(&ca, &cb));
    }

    #[test]
    fn test_scoped_is_cached_per_scope() {
        let services = services();
        let a = services.create_scope().unwrap();
        let b = services.create_scope().unwrap();

        let a1 = a.resolve::<PerScope>().unwrap();
        let a2 = a.resolve::<PerScope>().unwrap();
        let b1 = b.resolve::<PerScope>().unwrap();

        assert!(Arc::ptr_eq(&a1, &a2));
        assert_ne!(a1.0, b1.0);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_disposed_scope_rejects_resolution() {
        let services = services();
        let scope = services.create_scope().unwrap();
        scope.resolve::<PerScope>().unwrap();
        scope.dispose();

        assert!(scope.is_disposed());
        assert_eq!(
            scope.resolve::<PerScope>().err(),
            Some(ProviderError::Disposed)
        );
    }

    #[test]
    fn test_missing_service() {
        let scope = Services::new().create_scope().unwrap();
        let err = scope.resolve::<String>().err().unwrap();
        assert_eq!(err.as_label(), "provider_missing");
    }

    #[test]
    fn test_contains() {
        let services = services();
        assert!(services.contains::<Counter>());
        assert!(!services.contains::<String>());
    }
}
