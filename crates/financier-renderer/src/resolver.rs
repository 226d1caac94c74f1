//! Resolution of image reference tokens to renderable sources.
//!
//! Markdown images in a Financier document usually point at a generated
//! resource identifier (`![](3f2a...)`) rather than a URL. The renderer asks a
//! [`ResourceResolver`] for each image; tokens it does not know are emitted
//! as literal URLs.

use std::collections::{BTreeMap, HashMap};

/// Maps an image reference token to a renderable source.
///
/// Implementations must be side-effect free; the renderer may call
/// [`resolve`](Self::resolve) any number of times during one render.
pub trait ResourceResolver {
    /// Return the renderable source for `token`, or `None` when unknown.
    fn resolve(&self, token: &str) -> Option<String>;
}

/// Resolver that knows no resources. Every token is a literal URL.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResources;

impl ResourceResolver for NoResources {
    fn resolve(&self, _token: &str) -> Option<String> {
        None
    }
}

impl ResourceResolver for HashMap<String, String> {
    fn resolve(&self, token: &str) -> Option<String> {
        self.get(token).cloned()
    }
}

impl ResourceResolver for BTreeMap<String, String> {
    fn resolve(&self, token: &str) -> Option<String> {
        self.get(token).cloned()
    }
}

impl<T: ResourceResolver + ?Sized> ResourceResolver for &T {
    fn resolve(&self, token: &str) -> Option<String> {
        (**self).resolve(token)
    }
}

/// Resolve `token`, falling back to the token itself.
pub(crate) fn image_source(resolver: &dyn ResourceResolver, token: &str) -> String {
    resolver.resolve(token).unwrap_or_else(|| token.to_owned())
}
