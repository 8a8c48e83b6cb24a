//! Dependency and feature resolution.
//!
//! Decides which package descriptors become dependencies of the generated
//! package. A descriptor is active when it is forced, when its model
//! predicate holds, or, by default, when the type resolver referenced it
//! during this run. Ignored descriptors are never emitted.
//!
//! # Examples
//!
//! ```
//! use apigen_codegen::packages::DependencyResolver;
//! use apigen_codegen::ResolveState;
//! use apigen_core::{Api, PackageOption};
//!
//! let mut serde = PackageOption::new("serde");
//! serde.force_used = true;
//! let bytes = PackageOption::new("bytes");
//!
//! let options = [serde, bytes];
//! let resolver = DependencyResolver::new(&options);
//! let mut state = ResolveState::new();
//! let api = Api::new("test", "test.v1");
//!
//! let names: Vec<_> = resolver.resolve(&api, &state).dependencies.into_iter().map(|d| d.name).collect();
//! assert_eq!(names, vec!["serde"]);
//!
//! state.mark_used("bytes");
//! let names: Vec<_> = resolver.resolve(&api, &state).dependencies.into_iter().map(|d| d.name).collect();
//! assert_eq!(names, vec!["bytes", "serde"]);
//! ```

use crate::state::ResolveState;
use apigen_core::{Api, PackageOption, UsedIf};
use serde::{Deserialize, Serialize};

/// When a package descriptor becomes a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Always
    Always,
    /// When referenced during type resolution
    Referenced,
    /// When the model predicate holds
    When(UsedIf),
}

impl Activation {
    /// Activation rule of a configured descriptor.
    #[must_use]
    pub const fn of(package: &PackageOption) -> Self {
        if package.force_used {
            Self::Always
        } else if let Some(predicate) = package.used_if {
            Self::When(predicate)
        } else {
            Self::Referenced
        }
    }
}

/// Evaluates a model predicate.
#[must_use]
pub fn evaluate(predicate: UsedIf, api: &Api) -> bool {
    match predicate {
        UsedIf::Services => api.has_services(),
        UsedIf::Lro => api.has_lro_methods(),
        UsedIf::Pagination => api.methods().any(|m| api.is_pageable(m)),
        UsedIf::Streaming => api.has_streamed_responses(),
    }
}

/// One dependency declaration of the generated package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Display name, used as the local alias
    pub name: String,
    /// Wire package id
    pub package: String,
    /// Local path, if any
    pub path: Option<String>,
    /// Version requirement, if any
    pub version: Option<String>,
    /// Enabled features
    pub features: Vec<String>,
    /// The display name differs from the package id
    pub renamed: bool,
}

/// Output of the dependency resolver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependencies {
    /// Active dependencies sorted by display name
    pub dependencies: Vec<Dependency>,
    /// Display names of active streaming-capable packages, present only when
    /// the model has paginated or server-streaming methods
    pub streaming_feature: Option<Vec<String>>,
}

/// Resolves package descriptors into dependency declarations.
#[derive(Debug, Clone)]
pub struct DependencyResolver<'a> {
    packages: &'a [PackageOption],
}

impl<'a> DependencyResolver<'a> {
    /// Creates a resolver over `packages`.
    #[must_use]
    pub const fn new(packages: &'a [PackageOption]) -> Self {
        Self { packages }
    }

    /// Returns `true` if `package` is emitted for this run.
    #[must_use]
    pub fn is_active(package: &PackageOption, api: &Api, state: &ResolveState) -> bool {
        if package.ignore {
            return false;
        }
        match Activation::of(package) {
            Activation::Always => true,
            Activation::Referenced => state.is_used(&package.alias),
            Activation::When(predicate) => evaluate(predicate, api),
        }
    }

    /// Resolves the dependencies of the generated package.
    ///
    /// Must run after every type and link of the run has been resolved, so
    /// the used-package set is complete.
    #[must_use]
    pub fn resolve(&self, api: &Api, state: &ResolveState) -> ResolvedDependencies {
        let mut active: Vec<&PackageOption> = self
            .packages
            .iter()
            .filter(|p| Self::is_active(p, api, state))
            .collect();
        active.sort_by(|a, b| a.alias.cmp(&b.alias));

        let streaming_feature = api.has_streamed_responses().then(|| {
            active
                .iter()
                .filter(|p| p.streaming)
                .map(|p| p.alias.clone())
                .collect()
        });

        let dependencies = active
            .into_iter()
            .map(|p| Dependency {
                name: p.alias.clone(),
                package: p.package.clone(),
                path: p.path.clone(),
                version: p.version.clone(),
                features: p.features.clone(),
                renamed: p.alias != p.package,
            })
            .collect();

        tracing::debug!(?streaming_feature, "resolved dependencies");
        ResolvedDependencies {
            dependencies,
            streaming_feature,
        }
    }
}
