pub(crate) mod composer;
pub(crate) mod config;
pub(crate) mod export;
pub(crate) mod notify;
