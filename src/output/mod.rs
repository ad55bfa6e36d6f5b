pub(crate) mod archive;
pub(crate) mod descriptor;
pub(crate) mod layout;
pub(crate) mod png;
