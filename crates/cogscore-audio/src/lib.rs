pub mod features;
pub mod wav;

pub use features::{extract_features, segment, Segment, Segmentation};
pub use wav::{decode_wav, encode_wav, parse_header, WavHeader};
