pub mod analysis;
pub mod decode;
pub mod downsample;
pub mod features;
pub mod onset;
pub mod peaks;
pub mod spectrum;
pub mod tempo;
