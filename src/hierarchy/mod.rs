mod build;
mod classify;

pub use build::{GroupNode, NodeKind, group};
pub use classify::{NodeClasses, classify};
