pub(crate) mod material;
pub(crate) mod object;
pub(crate) mod transform;
