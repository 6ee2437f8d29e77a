pub mod manifest_decoder;
pub mod raw_object;
