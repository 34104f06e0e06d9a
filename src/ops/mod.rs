use core::fmt;

use crate::error::BdfError;
use crate::image::Image;
use crate::locate::{self, RegdbLocation};

pub mod patch;
pub mod regdb;
pub mod regdomain;
#[cfg(test)]
mod test;

pub use patch::{patch_range, PatchReport};
pub use regdb::{extract_regdb, update_regdb, RegdbReport};
pub use regdomain::{remove_regdomain, RegdomainReport};

/// Outcome of one operation: a status line, and whether the image needs writing back.
pub trait Report: fmt::Display
{
	fn changed(&self) -> bool;
}

/// Read-only overview of an image, for the `info` command.
#[derive(Debug)]
pub struct Summary
{
	pub format: String,
	pub len: usize,
	pub checksum: u16,
	pub regdomain: Option<u16>,
	pub regdb: Result<RegdbLocation, BdfError>,
}

pub fn summarize(img: &Image<'_>) -> Summary
{
	let desc = img.descriptor();
	let regdomain = desc.regdomain_offsets.first()
		.and_then(|&off| img.get(off, 2).ok())
		.map(|raw| u16::from_le_bytes([raw[0], raw[1]]));
	Summary
	{
		format: desc.name.clone(),
		len: img.len(),
		checksum: img.checksum().get_value(),
		regdomain,
		regdb: locate::locate_regdb(img),
	}
}

impl fmt::Display for Summary
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		writeln!(f, "format: {} ({} bytes)", self.format, self.len)?;
		writeln!(f, "checksum: {:#06x}", self.checksum)?;
		match self.regdomain
		{
			None => writeln!(f, "regdomain: out of bounds")?,
			Some(0) => writeln!(f, "regdomain: not set")?,
			Some(code) => writeln!(f, "regdomain: {code:#06x}")?,
		}
		match &self.regdb
		{
			Ok(loc) => write!(f, "regdb: {loc}"),
			Err(e) => write!(f, "regdb: {e}"),
		}
	}
}
