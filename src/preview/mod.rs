pub(crate) mod card;
pub(crate) mod layout;
pub(crate) mod raster;
pub(crate) mod svg;
pub(crate) mod text;
