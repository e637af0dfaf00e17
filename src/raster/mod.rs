pub(crate) mod bitmap;
pub(crate) mod composite;
pub(crate) mod pixel;
