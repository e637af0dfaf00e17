pub(crate) mod config;
pub(crate) mod solver;
pub(crate) mod trim;
pub(crate) mod viewport;
