use std::ops::Range;

use crate::format::Endian;

/// Running 16-bit XOR checksum as stored in a board data file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Checksum
{
	value: u16,
	endian: Endian,
}

impl Checksum
{
	pub fn new(value: u16, endian: Endian) -> Self
	{
		Self{value, endian}
	}

	pub fn from_bytes(bytes: [u8; 2], endian: Endian) -> Self
	{
		Self{value: endian.read_u16(&bytes), endian}
	}

	pub fn update_word(&mut self, word: u16)
	{
		self.value ^= word;
	}

	pub fn update_slice(&mut self, data: &[u8])
	{
		debug_assert!(data.len() % 2 == 0, "unaligned checksum input ({} bytes)", data.len());
		data.chunks_exact(2).for_each(|w| self.update_word(self.endian.read_u16(w)));
	}

	/// Folds both the replaced and the replacing bytes of one edit.
	pub fn update(&mut self, old: &[u8], new: &[u8])
	{
		debug_assert_eq!(old.len(), new.len());
		self.update_slice(old);
		self.update_slice(new);
	}

	pub fn get_value(&self) -> u16
	{
		self.value
	}

	pub fn to_bytes(&self) -> [u8; 2]
	{
		self.endian.to_bytes(self.value)
	}
}

pub fn update(checksum: [u8; 2], old: &[u8], new: &[u8], endian: Endian) -> [u8; 2]
{
	let mut sum = Checksum::from_bytes(checksum, endian);
	sum.update(old, new);
	sum.to_bytes()
}

/// Widens `offset..offset + len` to whole 16-bit words: one byte to the left if the start is odd,
/// then one byte to the right if the length is still odd.
pub fn aligned_span(offset: usize, len: usize) -> Range<usize>
{
	let start = offset - offset % 2;
	let mut end = offset + len;
	if (end - start) % 2 != 0 {end += 1;}
	start..end
}
