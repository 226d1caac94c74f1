//! CLI command implementations.

pub(crate) mod import;
pub(crate) mod new;
pub(crate) mod render;
pub(crate) mod resources;

pub(crate) use import::ImportArgs;
pub(crate) use new::NewArgs;
pub(crate) use render::RenderArgs;
pub(crate) use resources::ResourcesCommand;
