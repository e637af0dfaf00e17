pub(crate) mod app;
pub(crate) mod context;
pub(crate) mod runtime;
pub(crate) mod session;
