pub(crate) mod rename;
pub(crate) mod upload;
