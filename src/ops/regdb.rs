use core::fmt;

use log::debug;
use ripemd::{Digest, Ripemd128};

use crate::error::{BdfError, Result};
use crate::image::Image;
use crate::locate::{self, RegdbLocation};
use crate::ops::Report;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegdbReport
{
	Extracted{location: RegdbLocation},
	Updated{location: RegdbLocation, old_version: Option<u8>, new_version: Option<u8>},
	UpToDate{location: RegdbLocation},
}

impl Report for RegdbReport
{
	fn changed(&self) -> bool
	{
		!matches!(self, Self::UpToDate{..})
	}
}

fn version(f: &mut fmt::Formatter<'_>, ver: Option<u8>) -> fmt::Result
{
	match ver
	{
		None => f.write_str("?"),
		Some(ver) => write!(f, "{ver:#04x}"),
	}
}

impl fmt::Display for RegdbReport
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		match self
		{
			Self::Extracted{location} => write!(f, "Extracting regdb from {} BDF ({location})", location.chipset_name()),
			Self::Updated{location, old_version, new_version} =>
			{
				write!(f, "Updating regdb in {} BDF", location.chipset_name())?;
				if old_version.is_some() || new_version.is_some()
				{
					f.write_str(" (version ")?;
					version(f, *old_version)?;
					f.write_str(" -> ")?;
					version(f, *new_version)?;
					f.write_str(")")?;
				}
				Ok(())
			},
			Self::UpToDate{..} => f.write_str("Regdb is up to date"),
		}
	}
}

/// Copies the embedded regulatory database out of the image.
pub fn extract_regdb(img: &Image<'_>) -> Result<(RegdbReport, Vec<u8>)>
{
	let location = locate::locate_regdb(img)?;
	let blob = img.get(location.offset, location.size)?.to_owned();
	Ok((RegdbReport::Extracted{location}, blob))
}

/// Replaces the embedded regulatory database with `replacement`, which must have the same size.
pub fn update_regdb(img: &mut Image<'_>, replacement: &[u8]) -> Result<RegdbReport>
{
	let location = locate::locate_regdb(img)?;
	img.descriptor().check_regdb_header(replacement)?;
	if replacement.len() != location.size
	{
		return Err(BdfError::SizeMismatch{expect: location.size, have: replacement.len()});
	}
	img.check_put(location.offset, location.size)?;

	let current = img.get(location.offset, location.size)?;
	if Ripemd128::digest(current) == Ripemd128::digest(replacement)
	{
		debug!("regdb digest matches replacement");
		return Ok(RegdbReport::UpToDate{location});
	}
	img.put(location.offset, replacement)?;
	let old_version = location.version;
	let new_version = location.version_of(replacement);
	Ok(RegdbReport::Updated{location, old_version, new_version})
}
