pub mod image_ref;

pub use image_ref::{EncodedImage, ImageRef};
