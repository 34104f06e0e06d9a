use thiserror::Error;

#[derive(Debug, Error)]
pub enum BdfError
{
	#[error("not a valid {name} board data file")]
	InvalidHeader{name: String},
	#[error("unable to find regulatory database")]
	SignatureNotFound,
	#[error("unrecognized regulatory database size ({size:#x})")]
	UnrecognizedBlobSize{size: usize},
	#[error("incorrect regulatory database size (should be {expect}B, got {have}B)")]
	SizeMismatch{expect: usize, have: usize},
	#[error("not a valid {name} regulatory database")]
	InvalidReplacementHeader{name: String},
	#[error("range out of bounds ({len} bytes at {offset:#x}, file is {have} bytes)")]
	OutOfBounds{offset: isize, len: usize, have: usize},
	#[error("edit at {offset:#x} ({len} bytes) would overwrite the checksum field")]
	ChecksumOverlap{offset: usize, len: usize},
	#[error("invalid address {0:?}")]
	BadAddress(String),
	#[error("invalid patch value {0:?}")]
	BadValue(String),
	#[error("empty patch value")]
	EmptyPatch,
	#[error("invalid format descriptor: {0}")]
	Descriptor(String),
	#[error("I/O error")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BdfError>;
