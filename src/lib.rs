//! Editing of Qualcomm ath10k/ath11k board data files (BDF).
//!
//! Every write goes through [`image::Image::put`], which keeps the 16-bit XOR checksum of the file in
//! step with its contents so the firmware loader still accepts the result.

pub mod checksum;
pub mod error;
pub mod file;
pub mod format;
pub mod image;
pub mod locate;
pub mod number;
pub mod ops;

pub use error::{BdfError, Result};
pub use format::{FormatDescriptor, Generation};
pub use image::Image;
