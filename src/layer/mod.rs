pub(crate) mod canvas;
#[allow(clippy::module_inception)]
pub(crate) mod layer;
