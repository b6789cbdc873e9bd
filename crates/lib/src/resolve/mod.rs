//! Dependency closure over ID and category tokens.
//!
//! A token addresses every component whose ID equals it or lies beneath it in
//! the hierarchy (see [`Component::matches`]). Resolution follows each
//! included component's dependencies depth-first, visiting every component at
//! most once, so a dependency shared by several targets is queued once at the
//! position where it was first reached.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::manifest::{Catalog, Component};

/// Outcome of resolving a set of tokens.
#[derive(Debug, Default)]
pub struct Resolution<'a> {
  /// Included components, deduplicated, in discovery order.
  pub queue: Vec<&'a Component>,
  /// Tokens (requested or dependency) that matched nothing.
  pub unmatched: Vec<String>,
}

impl Resolution<'_> {
  /// IDs of the queued components.
  pub fn ids(&self) -> Vec<&str> {
    self.queue.iter().map(|c| c.id.as_str()).collect()
  }
}

struct Resolver<'a, F> {
  catalog: &'a Catalog,
  include: F,
  visited: HashSet<&'a str>,
  resolution: Resolution<'a>,
}

impl<'a, F> Resolver<'a, F>
where
  F: Fn(&Component) -> bool,
{
  fn visit(&mut self, token: &str) {
    let matches = self.catalog.find(token);
    if matches.is_empty() {
      debug!(token = %token, "token matched no component");
      self.resolution.unmatched.push(token.to_string());
      return;
    }

    for component in matches {
      if !self.visited.insert(component.id.as_str()) {
        continue;
      }
      if !(self.include)(component) {
        trace!(id = %component.id, "excluded");
        continue;
      }

      trace!(id = %component.id, "queued");
      self.resolution.queue.push(component);
      for dependency in &component.dependencies {
        self.visit(dependency);
      }
    }
  }
}

/// Resolve `tokens` into a dependency-closed queue of components satisfying `include`.
///
/// With no tokens, every catalog component is requested in manifest order.
/// A component that fails `include` is still marked visited and its
/// dependencies are not followed.
pub fn resolve<'a, S, F>(catalog: &'a Catalog, tokens: &[S], include: F) -> Resolution<'a>
where
  S: AsRef<str>,
  F: Fn(&Component) -> bool,
{
  let mut resolver = Resolver {
    catalog,
    include,
    visited: HashSet::new(),
    resolution: Resolution::default(),
  };

  if tokens.is_empty() {
    for component in catalog.iter() {
      resolver.visit(&component.id);
    }
  } else {
    for token in tokens {
      resolver.visit(token.as_ref());
    }
  }

  resolver.resolution
}
