use core::fmt;
use std::ops::Range;

use log::{debug, warn};

use crate::error::{BdfError, Result};
use crate::image::Image;

pub const UNKNOWN_CHIPSET: &str = "unknown";

/// Where an embedded regulatory database sits inside a board data file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegdbLocation
{
	pub offset: usize,
	pub size: usize,
	/// Offset of the version byte within the database, if the format has a version table.
	pub version_offset: Option<usize>,
	pub version: Option<u8>,
	pub chipset: Option<String>,
}

impl RegdbLocation
{
	pub fn range(&self) -> Range<usize>
	{
		self.offset..self.offset + self.size
	}

	pub fn chipset_name(&self) -> &str
	{
		self.chipset.as_deref().unwrap_or(UNKNOWN_CHIPSET)
	}

	/// Reads the version byte of another database blob with this one's layout.
	pub fn version_of(&self, blob: &[u8]) -> Option<u8>
	{
		self.version_offset.and_then(|off| blob.get(off).copied())
	}
}

impl fmt::Display for RegdbLocation
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "{} regdb at {:#x} ({} bytes", self.chipset_name(), self.offset, self.size)?;
		if let Some(ver) = self.version {write!(f, ", version {ver:#04x}")?;}
		f.write_str(")")
	}
}

pub fn find_signature(img: &Image<'_>, signature: &[u8]) -> Result<usize>
{
	img.find(signature).ok_or(BdfError::SignatureNotFound)
}

/// Finds the embedded regulatory database and probes its size, version and chipset.
pub fn locate_regdb(img: &Image<'_>) -> Result<RegdbLocation>
{
	let layout = &img.descriptor().regdb;
	let offset = find_signature(img, &layout.signature)?;
	let raw = img.get_relative(offset, layout.size.offset(), layout.size.width())?;
	let size = layout.size.decode(raw);
	debug!("regdb signature at {offset:#x}, size {size:#x}");
	let blob = img.get(offset, size)?;

	let (version_offset, version) = match &layout.versions
	{
		None => (None, None),
		Some(table) =>
		{
			let &off = table.get(&size).ok_or(BdfError::UnrecognizedBlobSize{size})?;
			match blob.get(off)
			{
				Some(&ver) => (Some(off), Some(ver)),
				None => return Err(BdfError::OutOfBounds{offset: (offset + off) as isize, len: 1, have: offset + size}),
			}
		},
	};

	let chipset = layout.chipset(offset).map(str::to_owned);
	if chipset.is_none()
	{
		warn!("no chipset known for regdb at {offset:#x}, treating as {UNKNOWN_CHIPSET}");
	}
	Ok(RegdbLocation{offset, size, version_offset, version, chipset})
}
