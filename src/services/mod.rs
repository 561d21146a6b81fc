pub mod export;
pub mod image_codec;
pub mod separation_service;

pub use export::export_result;
pub use image_codec::{decode_data_url, gray_data_url, rgb_data_url, CodecError};
pub use separation_service::SeparationService;
