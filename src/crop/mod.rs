pub(crate) mod region;
pub(crate) mod session;
pub(crate) mod transform;
