pub(crate) mod crop;
pub(crate) mod normalize;
pub(crate) mod quantize;
