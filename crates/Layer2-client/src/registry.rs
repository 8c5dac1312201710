//! Class registry - default resource types and their caller-supplied replacements
//!
//! Every place the library builds a resource wrapper goes through
//! [`ClassMapping::resolve`]. A mapping entry swaps the built-in type for a
//! replacement that implements the same interface trait, so the replacement is
//! what gets built everywhere, including inside other resources' methods.
//!
//! ```ignore
//! let mapping = ClassMapping::new()
//!     .replace::<ProjectCollection, MyProjectCollection>();
//! let client = Client::builder(auth).class_mapping(mapping).build()?;
//! ```
//!
//! Compatibility is checked at compile time: `R` can only replace `D` when `R`
//! implements `D`'s interface trait (see [`Substitute`]).

use crate::resource::ResourceParts;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a resource behind an extension point's interface
pub type Factory<T> = Arc<dyn Fn(ResourceParts) -> Arc<T> + Send + Sync>;

/// Construction from `(client_context, optional_payload, resource_path)`
pub trait FromParts: Sized {
    fn from_parts(parts: ResourceParts) -> Self;
}

/// A built-in resource type that callers may replace
///
/// Implemented by the library's default wrappers (`ProjectCollection`,
/// `Dataset`, ...). `Target` is the interface trait object every replacement
/// is handed out as.
pub trait ExtensionPoint: Send + Sync + 'static {
    type Target: ?Sized + Send + Sync + 'static;

    fn build_default(parts: ResourceParts) -> Arc<Self::Target>;
}

/// `Self` can stand in for the extension point `D`
///
/// Blanket-implemented for every type implementing `D`'s interface trait.
pub trait Substitute<D: ExtensionPoint>: Send + Sync + 'static {
    fn into_target(self: Arc<Self>) -> Arc<D::Target>;
}

/// Implements [`ExtensionPoint`] for a default type and [`Substitute`] for
/// every implementor of its interface trait.
macro_rules! extension_point {
    ($default:ident => $api:ident) => {
        impl $crate::registry::ExtensionPoint for $default {
            type Target = dyn $api;

            fn build_default(
                parts: $crate::resource::ResourceParts,
            ) -> ::std::sync::Arc<dyn $api> {
                ::std::sync::Arc::new(<$default as $crate::registry::FromParts>::from_parts(parts))
            }
        }

        impl<T: $api> $crate::registry::Substitute<$default> for T {
            fn into_target(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<dyn $api> {
                self
            }
        }
    };
}

pub(crate) use extension_point;

// ============================================================================
// ResolvedClass
// ============================================================================

/// Result of resolving an extension point: the concrete type to build and
/// how to build it
pub struct ResolvedClass<D: ExtensionPoint> {
    type_id: TypeId,
    type_name: &'static str,
    factory: Factory<D::Target>,
}

impl<D: ExtensionPoint> ResolvedClass<D> {
    fn default_class() -> Self {
        Self {
            type_id: TypeId::of::<D>(),
            type_name: type_name::<D>(),
            factory: Arc::new(D::build_default),
        }
    }

    fn replacement<R, F>(factory: F) -> Self
    where
        R: Substitute<D>,
        F: Fn(ResourceParts) -> R + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<R>(),
            type_name: type_name::<R>(),
            factory: Arc::new(move |parts| {
                <R as Substitute<D>>::into_target(Arc::new(factory(parts)))
            }),
        }
    }

    /// `TypeId` of the concrete type this resolves to
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether this resolves to `T`
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Whether no replacement was registered
    pub fn is_default(&self) -> bool {
        self.type_id == TypeId::of::<D>()
    }

    /// Build an instance of the resolved type
    pub fn construct(&self, parts: ResourceParts) -> Arc<D::Target> {
        (self.factory)(parts)
    }
}

impl<D: ExtensionPoint> Clone for ResolvedClass<D> {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            type_name: self.type_name,
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<D: ExtensionPoint> PartialEq for ResolvedClass<D> {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl<D: ExtensionPoint> Eq for ResolvedClass<D> {}

impl<D: ExtensionPoint> fmt::Debug for ResolvedClass<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedClass")
            .field("extension_point", &type_name::<D>())
            .field("resolved", &self.type_name)
            .finish()
    }
}

// ============================================================================
// ClassMapping
// ============================================================================

/// A `ResolvedClass<D>` with `D` erased
trait ErasedClass: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

impl<D: ExtensionPoint> ErasedClass for ResolvedClass<D> {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Clone)]
struct Entry {
    default: &'static str,
    // always a ResolvedClass<D> for the D keyed by this entry
    resolved: Arc<dyn ErasedClass>,
}

/// Default type → replacement type, fixed at client construction
#[derive(Clone, Default)]
pub struct ClassMapping {
    entries: HashMap<TypeId, Entry>,
}

impl ClassMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `R` wherever the library would build `D`
    pub fn replace<D, R>(self) -> Self
    where
        D: ExtensionPoint,
        R: FromParts + Substitute<D>,
    {
        self.replace_with::<D, R, _>(R::from_parts)
    }

    /// Like [`replace`](Self::replace), with a custom constructor for `R`
    pub fn replace_with<D, R, F>(mut self, factory: F) -> Self
    where
        D: ExtensionPoint,
        R: Substitute<D>,
        F: Fn(ResourceParts) -> R + Send + Sync + 'static,
    {
        tracing::debug!(
            "Registering {} as replacement for {}",
            type_name::<R>(),
            type_name::<D>()
        );
        let resolved = ResolvedClass::<D>::replacement::<R, F>(factory);
        self.entries.insert(
            TypeId::of::<D>(),
            Entry {
                default: type_name::<D>(),
                resolved: Arc::new(resolved),
            },
        );
        self
    }

    /// Whether `D` has a replacement
    pub fn contains<D: ExtensionPoint>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<D>())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The replacement registered for `D`, or `D` itself
    pub fn resolve<D: ExtensionPoint>(&self) -> ResolvedClass<D> {
        self.entries
            .get(&TypeId::of::<D>())
            .and_then(|entry| entry.resolved.as_any().downcast_ref::<ResolvedClass<D>>())
            .cloned()
            .unwrap_or_else(ResolvedClass::default_class)
    }
}

impl fmt::Debug for ClassMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .values()
                    .map(|entry| (entry.default, entry.resolved.type_name())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dataset::{Dataset, DatasetApi};
    use crate::models::project::{ProjectCollection, ProjectCollectionApi};
    use crate::resource::Resource;
    use crate::testing::test_context;

    struct AuditedProjects {
        parts: ResourceParts,
    }

    impl FromParts for AuditedProjects {
        fn from_parts(parts: ResourceParts) -> Self {
            Self { parts }
        }
    }

    impl Resource for AuditedProjects {
        fn parts(&self) -> &ResourceParts {
            &self.parts
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl ProjectCollectionApi for AuditedProjects {}

    #[test]
    fn test_unmapped_resolves_to_default() {
        let mapping = ClassMapping::new();
        let resolved = mapping.resolve::<ProjectCollection>();
        assert!(resolved.is::<ProjectCollection>());
        assert!(resolved.is_default());
        assert!(mapping.resolve::<Dataset>().is::<Dataset>());
    }

    #[test]
    fn test_mapped_resolves_to_replacement() {
        let mapping = ClassMapping::new().replace::<ProjectCollection, AuditedProjects>();
        let resolved = mapping.resolve::<ProjectCollection>();
        assert!(resolved.is::<AuditedProjects>());
        assert!(!resolved.is_default());
        assert!(mapping.contains::<ProjectCollection>());
        assert!(!mapping.contains::<Dataset>());
        // other extension points are untouched
        assert!(mapping.resolve::<Dataset>().is_default());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mapping = ClassMapping::new().replace::<ProjectCollection, AuditedProjects>();
        assert_eq!(
            mapping.resolve::<ProjectCollection>(),
            mapping.resolve::<ProjectCollection>()
        );
        assert_eq!(mapping.resolve::<Dataset>(), mapping.resolve::<Dataset>());
    }

    #[test]
    fn test_later_registration_wins() {
        let mapping = ClassMapping::new()
            .replace::<ProjectCollection, AuditedProjects>()
            .replace::<ProjectCollection, ProjectCollection>();
        assert_eq!(mapping.len(), 1);
        assert!(mapping.resolve::<ProjectCollection>().is::<ProjectCollection>());
    }

    #[test]
    fn test_construct_builds_resolved_type() {
        let context = test_context(
            ClassMapping::new().replace::<ProjectCollection, AuditedProjects>(),
        );
        let projects = context.construct::<ProjectCollection>(None, "projects");
        assert!(projects.as_any().is::<AuditedProjects>());
        assert_eq!(projects.api_path(), "projects");

        let dataset = context.construct::<Dataset>(None, "datasets/1");
        assert!(dataset.as_any().is::<Dataset>());
        assert_eq!(dataset.resource_id(), "1");
    }

    #[test]
    fn test_replace_with_custom_constructor() {
        let mapping = ClassMapping::new().replace_with::<Dataset, Dataset, _>(|parts| {
            Dataset::from_parts(ResourceParts::new(
                parts.context().clone(),
                parts.data().cloned(),
                format!("{}/v2", parts.api_path()),
            ))
        });
        let context = test_context(mapping);
        let dataset = context.construct::<Dataset>(None, "datasets/1");
        assert_eq!(dataset.api_path(), "datasets/1/v2");
        assert!(dataset.name().is_none());
    }

    #[test]
    fn test_debug_lists_replacements() {
        let mapping = ClassMapping::new().replace::<ProjectCollection, AuditedProjects>();
        let rendered = format!("{:?}", mapping);
        assert!(rendered.contains("ProjectCollection"));
        assert!(rendered.contains("AuditedProjects"));
    }
}
