use core::fmt;

use log::debug;

use crate::error::{BdfError, Result};
use crate::image::Image;
use crate::ops::Report;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegdomainReport
{
	Removed{code: u16, fields: usize},
	AlreadyClear,
}

impl Report for RegdomainReport
{
	fn changed(&self) -> bool
	{
		matches!(self, Self::Removed{..})
	}
}

impl fmt::Display for RegdomainReport
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		match self
		{
			Self::Removed{code, fields} =>
			{
				write!(f, "Removed regdomain {code:#06x} ({fields} field{})", if *fields == 1 {""} else {"s"})
			},
			Self::AlreadyClear => f.write_str("Regdomain is not set"),
		}
	}
}

/// Clears every regdomain field that carries the same code as the first one.
pub fn remove_regdomain(img: &mut Image<'_>) -> Result<RegdomainReport>
{
	let desc = img.descriptor();
	let &first = desc.regdomain_offsets.first()
		.ok_or_else(|| BdfError::Descriptor("no regdomain offsets".to_owned()))?;
	let current = img.get(first, 2)?.to_owned();
	if current == desc.regdomain_clear
	{
		return Ok(RegdomainReport::AlreadyClear);
	}

	let mut targets = Vec::with_capacity(desc.regdomain_offsets.len());
	for &off in &desc.regdomain_offsets
	{
		match img.get(off, 2)
		{
			Ok(raw) if raw == current.as_slice() =>
			{
				img.check_put(off, 2)?;
				targets.push(off);
			},
			Ok(..) => debug!("regdomain field at {off:#x} differs, skipping"),
			Err(..) => debug!("regdomain field at {off:#x} is past the end of the file, skipping"),
		}
	}
	let mut fields = 0;
	for &off in &targets
	{
		// a repeated offset is already clear the second time around
		if img.put(off, &desc.regdomain_clear)? {fields += 1;}
	}
	Ok(RegdomainReport::Removed{code: u16::from_le_bytes([current[0], current[1]]), fields})
}
