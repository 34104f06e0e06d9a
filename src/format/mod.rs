use core::fmt;
use std::collections::BTreeMap;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use log::debug;
use serde::Deserialize;

use crate::error::{BdfError, Result};

pub mod config;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian
{
	Big,
	Little,
}

impl Endian
{
	pub fn read_u16(self, buf: &[u8]) -> u16
	{
		match self
		{
			Self::Big => BigEndian::read_u16(buf),
			Self::Little => LittleEndian::read_u16(buf),
		}
	}

	pub fn write_u16(self, buf: &mut [u8], value: u16)
	{
		match self
		{
			Self::Big => BigEndian::write_u16(buf, value),
			Self::Little => LittleEndian::write_u16(buf, value),
		}
	}

	pub fn to_bytes(self, value: u16) -> [u8; 2]
	{
		let mut out = [0u8; 2];
		self.write_u16(&mut out, value);
		out
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Generation
{
	Ath10k,
	Ath11k,
}

impl Generation
{
	pub const ALL: [Generation; 2] = [Generation::Ath10k, Generation::Ath11k];

	pub fn descriptor(self) -> FormatDescriptor
	{
		match self
		{
			Self::Ath10k => FormatDescriptor::ath10k(),
			Self::Ath11k => FormatDescriptor::ath11k(),
		}
	}
}

impl fmt::Display for Generation
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		match self
		{
			Self::Ath10k => f.write_str("ath10k"),
			Self::Ath11k => f.write_str("ath11k"),
		}
	}
}

/// How the byte count of an embedded regulatory database is stored, relative to its signature.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizeField
{
	/// A single byte multiplied by `scale`.
	ScaledByte{offset: isize, scale: usize},
	/// A little-endian `u16`.
	Le16{offset: isize},
}

impl SizeField
{
	pub fn offset(&self) -> isize
	{
		match *self
		{
			Self::ScaledByte{offset, ..} | Self::Le16{offset} => offset,
		}
	}

	pub fn width(&self) -> usize
	{
		match self
		{
			Self::ScaledByte{..} => 1,
			Self::Le16{..} => 2,
		}
	}

	pub fn decode(&self, raw: &[u8]) -> usize
	{
		match *self
		{
			Self::ScaledByte{scale, ..} => raw[0] as usize * scale,
			Self::Le16{..} => LittleEndian::read_u16(raw) as usize,
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegdbLayout
{
	pub signature: Vec<u8>,
	pub size: SizeField,
	/// Blob size to version byte offset; `None` skips the version lookup entirely.
	pub versions: Option<BTreeMap<usize, usize>>,
	/// Absolute signature offset to chipset label.
	pub names: BTreeMap<usize, String>,
}

impl RegdbLayout
{
	pub fn chipset(&self, offset: usize) -> Option<&str>
	{
		self.names.get(&offset).map(String::as_str)
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormatDescriptor
{
	pub name: String,
	pub header: Vec<u8>,
	pub checksum_offset: usize,
	pub checksum_endian: Endian,
	pub regdomain_offsets: Vec<usize>,
	pub regdomain_clear: [u8; 2],
	pub regdb: RegdbLayout,
}

impl FormatDescriptor
{
	pub fn ath11k() -> Self
	{
		const NAMES: [(usize, &str); 6] = [
			(0x127C8, "IPQ5018/QCN6122"),
			(0x10F48, "IPQ5018/QCN6122(old)"),
			(0xAE2E, "IPQ6018"),
			(0x1978E, "IPQ8074"),
			(0x12DF0, "IPQ9574"),
			(0x12DEE, "QCN9074"),
		];
		Self
		{
			name: Generation::Ath11k.to_string(),
			header: vec![0x01, 0x00, 0x04, 0x04, 0x00, 0x00],
			checksum_offset: 0x0A,
			checksum_endian: Endian::Big,
			regdomain_offsets: vec![0x34, 0x450, 0x458, 0x500, 0x5A8],
			regdomain_clear: [0x00, 0x00],
			regdb: RegdbLayout
			{
				signature: vec![0x00, 0x00, 0x04, 0x00, 0x37, 0x00],
				size: SizeField::ScaledByte{offset: -3, scale: 0x100},
				versions: None,
				names: NAMES.iter().map(|&(off, name)| (off, name.to_owned())).collect(),
			},
		}
	}

	pub fn ath10k() -> Self
	{
		Self
		{
			name: Generation::Ath10k.to_string(),
			header: vec![0x20, 0x2F],
			checksum_offset: 0x02,
			checksum_endian: Endian::Little,
			regdomain_offsets: vec![0x0C],
			regdomain_clear: [0x00, 0x00],
			regdb: RegdbLayout
			{
				signature: b"RDB1".to_vec(),
				size: SizeField::Le16{offset: -2},
				versions: Some([(0x800, 0x06), (0x1000, 0x06), (0x2000, 0x0A)].into_iter().collect()),
				names: BTreeMap::new(),
			},
		}
	}

	/// Picks the built-in format whose header starts `data`, preferring longer headers.
	pub fn detect(data: &[u8]) -> Result<Self>
	{
		let mut known: Vec<_> = Generation::ALL.iter().map(|g| g.descriptor()).collect();
		known.sort_by(|a, b| b.header.len().cmp(&a.header.len()));
		match known.into_iter().find(|d| data.starts_with(&d.header))
		{
			Some(desc) =>
			{
				debug!("detected {} board data file", desc.name);
				Ok(desc)
			},
			None => Err(BdfError::InvalidHeader{name: "ath10k/ath11k".to_owned()}),
		}
	}

	pub fn check_header(&self, data: &[u8]) -> Result<()>
	{
		if data.starts_with(&self.header) {Ok(())}
		else {Err(BdfError::InvalidHeader{name: self.name.clone()})}
	}

	pub fn check_regdb_header(&self, data: &[u8]) -> Result<()>
	{
		if data.starts_with(&self.regdb.signature) {Ok(())}
		else {Err(BdfError::InvalidReplacementHeader{name: self.name.clone()})}
	}
}
