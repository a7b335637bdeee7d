mod codec;
mod overlay;
pub mod transform;

pub use codec::decode_mask;
pub use codec::encode_mask;

pub use overlay::blend;

pub use transform::ResizeFilter;
