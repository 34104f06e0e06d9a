use log::trace;

use crate::checksum::{self, Checksum};
use crate::error::{BdfError, Result};
use crate::format::FormatDescriptor;


/// One board data file held in memory, edited through checksum-preserving writes.
#[derive(Clone, Debug)]
pub struct Image<'d>
{
	desc: &'d FormatDescriptor,
	data: Vec<u8>,
	dirty: bool,
}

impl<'d> Image<'d>
{
	pub fn new(desc: &'d FormatDescriptor, data: Vec<u8>) -> Result<Self>
	{
		desc.check_header(&data)?;
		if data.len() < desc.checksum_offset + 2
		{
			return Err(BdfError::OutOfBounds{offset: desc.checksum_offset as isize, len: 2, have: data.len()});
		}
		Ok(Self{desc, data, dirty: false})
	}

	pub fn descriptor(&self) -> &'d FormatDescriptor
	{
		self.desc
	}

	pub fn len(&self) -> usize
	{
		self.data.len()
	}

	pub fn is_dirty(&self) -> bool
	{
		self.dirty
	}

	pub fn as_bytes(&self) -> &[u8]
	{
		&self.data
	}

	pub fn into_bytes(self) -> Vec<u8>
	{
		self.data
	}

	pub fn get(&self, offset: usize, len: usize) -> Result<&[u8]>
	{
		match offset.checked_add(len)
		{
			Some(end) if end <= self.data.len() => Ok(&self.data[offset..end]),
			_ => Err(BdfError::OutOfBounds{offset: offset as isize, len, have: self.data.len()}),
		}
	}

	/// Like [`get`](Self::get) but for an offset relative to `base`, which may point before it.
	pub fn get_relative(&self, base: usize, rel: isize, len: usize) -> Result<&[u8]>
	{
		match base.checked_add_signed(rel)
		{
			Some(offset) => self.get(offset, len),
			None => Err(BdfError::OutOfBounds{offset: (base as isize).wrapping_add(rel), len, have: self.data.len()}),
		}
	}

	pub fn find(&self, pattern: &[u8]) -> Option<usize>
	{
		if pattern.is_empty() || pattern.len() > self.data.len() {return None;}
		self.data.windows(pattern.len()).position(|w| w == pattern)
	}

	pub fn checksum(&self) -> Checksum
	{
		let off = self.desc.checksum_offset;
		Checksum::from_bytes([self.data[off], self.data[off + 1]], self.desc.checksum_endian)
	}

	/// Checks that `put` could write `len` bytes at `offset`, without writing anything.
	pub fn check_put(&self, offset: usize, len: usize) -> Result<()>
	{
		self.get(offset, len)?;
		let sum_off = self.desc.checksum_offset;
		if len > 0 && offset < sum_off + 2 && sum_off < offset + len
		{
			return Err(BdfError::ChecksumOverlap{offset, len});
		}
		Ok(())
	}

	/// Overwrites `offset..offset + data.len()` and folds the edit into the checksum field.
	///
	/// Returns `false` without touching anything if the bytes already match.
	pub fn put(&mut self, offset: usize, data: &[u8]) -> Result<bool>
	{
		if data.is_empty() || self.get(offset, data.len())? == data {return Ok(false);}
		self.check_put(offset, data.len())?;
		let end = offset + data.len();
		let sum_off = self.desc.checksum_offset;

		// padding bytes are identical in both halves, past the end they read as zero
		let span = checksum::aligned_span(offset, data.len());
		let mut old = vec![0u8; span.len()];
		let avail = span.end.min(self.data.len());
		old[..avail - span.start].copy_from_slice(&self.data[span.start..avail]);
		let mut new = old.clone();
		new[offset - span.start..end - span.start].copy_from_slice(data);

		let mut sum = self.checksum();
		let prev = sum.get_value();
		sum.update(&old, &new);
		trace!("fold {:#x}..{:#x}: checksum {prev:#06x} -> {:#06x}", span.start, span.end, sum.get_value());
		self.data[offset..end].copy_from_slice(data);
		self.data[sum_off..sum_off + 2].copy_from_slice(&sum.to_bytes());
		self.dirty = true;
		Ok(true)
	}
}
