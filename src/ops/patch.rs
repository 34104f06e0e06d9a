use core::fmt;
use std::path::Path;

use log::debug;

use crate::error::{BdfError, Result};
use crate::file;
use crate::image::Image;
use crate::number;
use crate::ops::Report;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PatchReport
{
	Patched{address: usize, len: usize},
	NotNeeded{address: usize, len: usize},
}

impl Report for PatchReport
{
	fn changed(&self) -> bool
	{
		matches!(self, Self::Patched{..})
	}
}

impl fmt::Display for PatchReport
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		match self
		{
			Self::Patched{address, len} => write!(f, "Patched {len} bytes at {address:#x}"),
			Self::NotNeeded{address, len} => write!(f, "Patch not needed ({len} bytes at {address:#x} already match)"),
		}
	}
}

pub fn parse_address(text: &str) -> Result<usize>
{
	number::parse_usize(text).ok_or_else(|| BdfError::BadAddress(text.to_owned()))
}

/// Resolves a patch value: the contents of `text` if it names an existing file, otherwise `text` as hex digits.
pub fn resolve_value(text: &str) -> Result<Vec<u8>>
{
	let path = Path::new(text);
	let value = if path.is_file()
	{
		debug!("reading patch value from {}", path.display());
		file::load(path)?
	}
	else {hex::decode(text).map_err(|_| BdfError::BadValue(text.to_owned()))?};
	if value.is_empty() {Err(BdfError::EmptyPatch)}
	else {Ok(value)}
}

/// Writes `value` at `address`, leaving every byte outside that range as it was (except the checksum).
pub fn patch_range(img: &mut Image<'_>, address: usize, value: &[u8]) -> Result<PatchReport>
{
	if value.is_empty()
	{
		return Err(BdfError::EmptyPatch);
	}
	let len = value.len();
	if img.get(address, len)? == value
	{
		return Ok(PatchReport::NotNeeded{address, len});
	}
	img.put(address, value)?;
	Ok(PatchReport::Patched{address, len})
}
