//! # Behaviour descriptors and discovery catalog.
//!
//! A [`BehaviourDescriptor`] names a concrete behaviour type and knows how
//! to build it inside a [`ServiceScope`]. Descriptors created with
//! [`BehaviourDescriptor::non_instantiable`] stand for abstract types
//! (trait objects, base types): discovery skips them.
//!
//! A [`BehaviourCatalog`] is the container discovery enumerates, in
//! insertion order.
//!
//! ## Example
//! ```rust
//! # use std::sync::Arc;
//! # use async_trait::async_trait;
//! # use tokio::sync::watch;
//! use behaviourd::{Behaviour, BehaviourCatalog, BehaviourFactory, ProviderError, ServiceScope};
//! # use behaviourd::{BehaviourState, Failure, Outcome};
//! # struct Audit;
//! # #[async_trait]
//! # impl Behaviour for Audit {
//! #     fn name(&self) -> &str { "audit" }
//! #     fn state(&self) -> BehaviourState { BehaviourState::Idle }
//! #     fn watch_state(&self) -> watch::Receiver<BehaviourState> { watch::channel(BehaviourState::Idle).1 }
//! #     fn last_failure(&self) -> Option<Failure> { None }
//! #     async fn start(&self) -> Outcome { Ok(()) }
//! #     async fn stop(&self) -> Outcome { Ok(()) }
//! # }
//!
//! impl BehaviourFactory for Audit {
//!     fn build(_scope: &dyn ServiceScope) -> Result<Self, ProviderError> {
//!         Ok(Audit)
//!     }
//! }
//!
//! let catalog = BehaviourCatalog::new()
//!     .with::<Audit>()
//!     .with_non_instantiable::<dyn Behaviour>();
//!
//! assert_eq!(catalog.len(), 2);
//! assert_eq!(catalog.iter().filter(|d| d.is_instantiable()).count(), 1);
//! ```

use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use crate::core::behaviour::Behaviour;
use crate::error::ProviderError;
use crate::services::ServiceScope;

/// Constructor of a behaviour inside its own dependency scope.
pub trait BehaviourFactory: Behaviour + Sized {
    /// Builds a new, idle instance. Services are resolved from `scope`,
    /// which stays alive for as long as the instance is registered.
    fn build(scope: &dyn ServiceScope) -> Result<Self, ProviderError>;
}

/// Type-erased behaviour constructor.
pub type BuildFn = fn(&dyn ServiceScope) -> Result<Arc<dyn Behaviour>, ProviderError>;

fn build_erased<T: BehaviourFactory>(
    scope: &dyn ServiceScope,
) -> Result<Arc<dyn Behaviour>, ProviderError> {
    Ok(Arc::new(T::build(scope)?))
}

/// Type-level description of a behaviour.
#[derive(Clone, Copy)]
pub struct BehaviourDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    build: Option<BuildFn>,
}

impl BehaviourDescriptor {
    /// Descriptor of a concrete, instantiable behaviour type.
    pub fn of<T: BehaviourFactory>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            build: Some(build_erased::<T>),
        }
    }

    /// Descriptor built by a plain function, keyed on `T`.
    ///
    /// Lets generic behaviours such as
    /// [`EventBehaviour`](crate::EventBehaviour) be registered under the type
    /// of their handler.
    pub fn from_fn<T: ?Sized + 'static>(build: BuildFn) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            build: Some(build),
        }
    }

    /// Descriptor of a type that cannot be instantiated.
    pub fn non_instantiable<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            build: None,
        }
    }

    /// Identity of the described type; registry entries are unique per id.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// False for abstract types.
    pub fn is_instantiable(&self) -> bool {
        self.build.is_some()
    }

    pub(crate) fn builder(&self) -> Option<BuildFn> {
        self.build
    }
}

impl fmt::Debug for BehaviourDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviourDescriptor")
            .field("type_name", &self.type_name)
            .field("instantiable", &self.is_instantiable())
            .finish()
    }
}

/// Ordered container of descriptors, enumerated by discovery.
#[derive(Clone, Debug, Default)]
pub struct BehaviourCatalog {
    descriptors: Vec<BehaviourDescriptor>,
}

impl BehaviourCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a concrete behaviour type.
    pub fn with<T: BehaviourFactory>(self) -> Self {
        self.with_descriptor(BehaviourDescriptor::of::<T>())
    }

    /// Adds a behaviour built by `build`, keyed on `T`.
    pub fn with_fn<T: ?Sized + 'static>(self, build: BuildFn) -> Self {
        self.with_descriptor(BehaviourDescriptor::from_fn::<T>(build))
    }

    /// Adds an abstract type; discovery skips it.
    pub fn with_non_instantiable<T: ?Sized + 'static>(self) -> Self {
        self.with_descriptor(BehaviourDescriptor::non_instantiable::<T>())
    }

    /// Adds a prepared descriptor.
    pub fn with_descriptor(mut self, descriptor: BehaviourDescriptor) -> Self {
        self.push(descriptor);
        self
    }

    /// Appends a descriptor.
    pub fn push(&mut self, descriptor: BehaviourDescriptor) {
        self.descriptors.push(descriptor);
    }

    /// Descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BehaviourDescriptor> {
        self.descriptors.iter()
    }

    /// Number of descriptors, abstract ones included.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True if the catalog holds no descriptor.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a BehaviourCatalog {
    type Item = &'a BehaviourDescriptor;
    type IntoIter = std::slice::Iter<'a, BehaviourDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}
