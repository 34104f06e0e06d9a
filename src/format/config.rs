//! JSON format descriptors, for board data file generations without a built-in table.
//!
//! Byte sequences are hex strings; map keys are integer literals (`"0x127c8"`).

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{BdfError, Result};
use crate::file;
use crate::format::{Endian, FormatDescriptor, RegdbLayout, SizeField};
use crate::number;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DescriptorFile
{
	name: String,
	header: String,
	checksum_offset: usize,
	checksum_endian: Endian,
	regdomain_offsets: Vec<usize>,
	#[serde(default = "clear_default")]
	regdomain_clear: String,
	regdb: RegdbFile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegdbFile
{
	signature: String,
	size: SizeField,
	#[serde(default)]
	versions: Option<BTreeMap<String, usize>>,
	#[serde(default)]
	names: BTreeMap<String, String>,
}

fn clear_default() -> String
{
	"0000".to_owned()
}

fn bytes(field: &str, text: &str) -> Result<Vec<u8>>
{
	hex::decode(text).map_err(|e| BdfError::Descriptor(format!("{field}: {e}")))
}

fn keys<V>(field: &str, map: BTreeMap<String, V>) -> Result<BTreeMap<usize, V>>
{
	map.into_iter().map(|(k, v)| match number::parse_usize(&k)
	{
		Some(key) => Ok((key, v)),
		None => Err(BdfError::Descriptor(format!("{field}: invalid offset {k:?}"))),
	}).collect()
}

fn convert(raw: DescriptorFile) -> Result<FormatDescriptor>
{
	let header = bytes("header", &raw.header)?;
	if header.is_empty()
	{
		return Err(BdfError::Descriptor("header: empty signature".to_owned()));
	}
	let signature = bytes("regdb.signature", &raw.regdb.signature)?;
	if signature.is_empty()
	{
		return Err(BdfError::Descriptor("regdb.signature: empty signature".to_owned()));
	}
	if raw.regdomain_offsets.is_empty()
	{
		return Err(BdfError::Descriptor("regdomain_offsets: no offsets".to_owned()));
	}
	let regdomain_clear: [u8; 2] = bytes("regdomain_clear", &raw.regdomain_clear)?.try_into()
		.map_err(|v: Vec<u8>| BdfError::Descriptor(format!("regdomain_clear: expected 2 bytes, got {}", v.len())))?;
	let versions = match raw.regdb.versions
	{
		None => None,
		Some(map) => Some(keys("regdb.versions", map)?),
	};
	Ok(FormatDescriptor
	{
		name: raw.name,
		header,
		checksum_offset: raw.checksum_offset,
		checksum_endian: raw.checksum_endian,
		regdomain_offsets: raw.regdomain_offsets,
		regdomain_clear,
		regdb: RegdbLayout
		{
			signature,
			size: raw.regdb.size,
			versions,
			names: keys("regdb.names", raw.regdb.names)?,
		},
	})
}

impl FormatDescriptor
{
	pub fn from_json(text: &str) -> Result<Self>
	{
		let raw: DescriptorFile = serde_json::from_str(text).map_err(|e| BdfError::Descriptor(e.to_string()))?;
		convert(raw)
	}

	pub fn load(path: &Path) -> Result<Self>
	{
		let data = file::load(path)?;
		let text = String::from_utf8(data).map_err(|e| BdfError::Descriptor(e.to_string()))?;
		Self::from_json(&text)
	}
}
