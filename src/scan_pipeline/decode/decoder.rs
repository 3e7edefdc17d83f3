use crate::scan_pipeline::common::error::Result;
use crate::scan_pipeline::decode::types::ColorRaster;

pub trait ImageDecoder {
    fn decode(&self, data: &[u8]) -> Result<ColorRaster>;
}
