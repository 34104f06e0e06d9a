use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::ops::Report;

pub fn load(path: &Path) -> Result<Vec<u8>>
{
	let mut buff = Vec::new();
	let mut fi = OpenOptions::new().read(true).open(path)?;
	fi.read_to_end(&mut buff)?;
	debug!("read {} bytes from {}", buff.len(), path.display());
	Ok(buff)
}

/// Replaces `path` with `data` in one step: the bytes go to a temporary file next to it, which is then renamed.
pub fn store(path: &Path, data: &[u8]) -> Result<()>
{
	let dir = match path.parent()
	{
		Some(dir) if !dir.as_os_str().is_empty() => dir,
		_ => Path::new("."),
	};
	let mut fo = NamedTempFile::new_in(dir)?;
	fo.write_all(data)?;
	fo.as_file().sync_all()?;
	// keep the permissions of the file being replaced
	if let Ok(meta) = fs::metadata(path)
	{
		fs::set_permissions(fo.path(), meta.permissions())?;
	}
	fo.persist(path).map_err(|e| e.error)?;
	debug!("wrote {} bytes to {}", data.len(), path.display());
	Ok(())
}

/// Stores `data` to `path` only if `report` says the operation changed something; returns whether it did.
pub fn commit(report: &impl Report, path: &Path, data: &[u8]) -> Result<bool>
{
	if !report.changed()
	{
		debug!("nothing changed, leaving {} alone", path.display());
		return Ok(false);
	}
	store(path, data)?;
	Ok(true)
}
