pub(crate) mod draft;
pub(crate) mod form;
pub(crate) mod validate;
