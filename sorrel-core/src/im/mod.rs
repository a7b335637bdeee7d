mod buffer;
mod colormap;
mod onehot;
mod rgb;

pub use buffer::SorrelBuffer;

pub use colormap::ClassEntry;
pub use colormap::ColorMap;

pub use onehot::OneHotMask;

pub use rgb::SorrelImage;
