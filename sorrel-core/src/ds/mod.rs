mod paired;

pub use paired::Batches;
pub use paired::PairedDataset;
