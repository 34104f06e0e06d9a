use crate::checksum;
use crate::error::BdfError;
use crate::format::{Endian, FormatDescriptor, Generation};
use crate::image::Image;
use crate::ops::{extract_regdb, patch_range, remove_regdomain, summarize, update_regdb};
use crate::ops::{PatchReport, RegdbReport, RegdomainReport, Report};
use crate::ops::patch::{parse_address, resolve_value};

const HDR11: [u8; 6] = [0x01, 0x00, 0x04, 0x04, 0x00, 0x00];
const SIG11: [u8; 6] = [0x00, 0x00, 0x04, 0x00, 0x37, 0x00];
const REGDB11: usize = 0xAE2E;

fn ath11k() -> Vec<u8>
{
	let mut data = vec![0u8; 0x600];
	data[..6].copy_from_slice(&HDR11);
	data[0x0A..0x0C].copy_from_slice(&[0xAA, 0xBB]);
	data
}

/// An ath11k image with a two-page regdb at the IPQ6018 offset, filled with `fill`.
fn ath11k_regdb(fill: u8) -> Vec<u8>
{
	let mut data = ath11k();
	data.resize(REGDB11 + 0x200 + 0x20, 0);
	data[REGDB11 - 3] = 2;
	regdb11(&mut data[REGDB11..REGDB11 + 0x200], fill);
	data
}

fn regdb11(dst: &mut [u8], fill: u8)
{
	dst.fill(fill);
	dst[..6].copy_from_slice(&SIG11);
}

fn ath10k_regdb(version: u8) -> Vec<u8>
{
	let mut data = vec![0u8; 0x80 + 0x800];
	data[..2].copy_from_slice(&[0x20, 0x2F]);
	data[0x02..0x04].copy_from_slice(&[0x11, 0x22]);
	data[0x0C..0x0E].copy_from_slice(&[0x48, 0x00]);
	data[0x3E..0x40].copy_from_slice(&0x800u16.to_le_bytes());
	data[0x40..0x44].copy_from_slice(b"RDB1");
	data[0x46] = version;
	data
}

#[test]
fn remove_regdomain_example()
{
	let desc = Generation::Ath11k.descriptor();
	let mut data = ath11k();
	data[0x34..0x36].copy_from_slice(&[0x34, 0x12]);
	let mut img = Image::new(&desc, data).unwrap();
	let report = remove_regdomain(&mut img).unwrap();
	assert_eq!(report, RegdomainReport::Removed{code: 0x1234, fields: 1});
	assert!(report.changed());
	assert_eq!(report.to_string(), "Removed regdomain 0x1234 (1 field)");
	assert_eq!(img.get(0x34, 2).unwrap(), &[0x00, 0x00]);
	assert_eq!(img.get(0x0A, 2).unwrap(), &checksum::update([0xAA, 0xBB], &[0x34, 0x12], &[0x00, 0x00], Endian::Big));
	assert_eq!(img.checksum().get_value(), 0xAABB ^ 0x3412);
}

#[test]
fn remove_regdomain_matching()
{
	let desc = Generation::Ath11k.descriptor();
	let mut data = ath11k();
	data[0x34..0x36].copy_from_slice(&[0x34, 0x12]);
	data[0x450..0x452].copy_from_slice(&[0x34, 0x12]);
	data[0x458..0x45A].copy_from_slice(&[0x99, 0x00]);
	data[0x5A8..0x5AA].copy_from_slice(&[0x34, 0x12]);
	let mut img = Image::new(&desc, data).unwrap();
	assert_eq!(remove_regdomain(&mut img).unwrap(), RegdomainReport::Removed{code: 0x1234, fields: 3});
	assert_eq!(img.get(0x450, 2).unwrap(), &[0x00, 0x00]);
	assert_eq!(img.get(0x458, 2).unwrap(), &[0x99, 0x00]);
	assert_eq!(img.get(0x5A8, 2).unwrap(), &[0x00, 0x00]);
	// three identical words folded in twice cancel out to one
	assert_eq!(img.checksum().get_value(), 0xAABB ^ 0x3412);
}

#[test]
fn remove_regdomain_idempotent()
{
	let desc = Generation::Ath11k.descriptor();
	let mut data = ath11k();
	data[0x34..0x36].copy_from_slice(&[0x34, 0x12]);
	let mut img = Image::new(&desc, data).unwrap();
	remove_regdomain(&mut img).unwrap();
	let once = img.into_bytes();
	let mut img = Image::new(&desc, once.clone()).unwrap();
	let report = remove_regdomain(&mut img).unwrap();
	assert_eq!(report, RegdomainReport::AlreadyClear);
	assert!(!report.changed());
	assert!(!img.is_dirty());
	assert_eq!(img.into_bytes(), once);
}

#[test]
fn remove_regdomain_short_file()
{
	let desc = Generation::Ath11k.descriptor();
	let mut data = ath11k();
	data.truncate(0x100);
	data[0x34..0x36].copy_from_slice(&[0x34, 0x12]);
	let mut img = Image::new(&desc, data).unwrap();
	// 0x450 and beyond are past the end of the file
	assert_eq!(remove_regdomain(&mut img).unwrap(), RegdomainReport::Removed{code: 0x1234, fields: 1});
	assert_eq!(img.len(), 0x100);
	assert_eq!(img.get(0x34, 2).unwrap(), &[0x00, 0x00]);
	assert_eq!(img.checksum().get_value(), 0xAABB ^ 0x3412);

	// ends inside the field at 0x450
	let mut data = ath11k();
	data.truncate(0x451);
	data[0x34..0x36].copy_from_slice(&[0x34, 0x12]);
	data[0x450] = 0x34;
	let mut img = Image::new(&desc, data).unwrap();
	assert_eq!(remove_regdomain(&mut img).unwrap(), RegdomainReport::Removed{code: 0x1234, fields: 1});
	assert_eq!(img.get(0x450, 1).unwrap(), &[0x34]);
}

#[test]
fn remove_regdomain_repeated_offset()
{
	let mut desc = FormatDescriptor::ath11k();
	desc.regdomain_offsets = vec![0x34, 0x450, 0x34];
	let mut data = ath11k();
	data[0x34..0x36].copy_from_slice(&[0x34, 0x12]);
	data[0x450..0x452].copy_from_slice(&[0x34, 0x12]);
	let mut img = Image::new(&desc, data).unwrap();
	let report = remove_regdomain(&mut img).unwrap();
	assert_eq!(report, RegdomainReport::Removed{code: 0x1234, fields: 2});
	assert_eq!(report.to_string(), "Removed regdomain 0x1234 (2 fields)");
	assert_eq!(img.checksum().get_value(), 0xAABB);
}

#[test]
fn remove_regdomain_ath10k()
{
	let desc = FormatDescriptor::ath10k();
	let mut img = Image::new(&desc, ath10k_regdb(1)).unwrap();
	assert_eq!(remove_regdomain(&mut img).unwrap(), RegdomainReport::Removed{code: 0x0048, fields: 1});
	assert_eq!(img.get(0x02, 2).unwrap(), &[0x11 ^ 0x48, 0x22]);
}

#[test]
fn extract()
{
	let desc = Generation::Ath11k.descriptor();
	let data = ath11k_regdb(0x5A);
	let img = Image::new(&desc, data.clone()).unwrap();
	let (report, blob) = extract_regdb(&img).unwrap();
	assert_eq!(blob.as_slice(), &data[REGDB11..REGDB11 + 0x200]);
	assert!(matches!(&report, RegdbReport::Extracted{location} if location.chipset_name() == "IPQ6018"));
	assert!(report.changed());
	assert!(!img.is_dirty());
}

#[test]
fn extract_then_update()
{
	let desc = Generation::Ath11k.descriptor();
	let data = ath11k_regdb(0x5A);
	let img = Image::new(&desc, data.clone()).unwrap();
	let (_, blob) = extract_regdb(&img).unwrap();
	let mut img = Image::new(&desc, data.clone()).unwrap();
	let report = update_regdb(&mut img, &blob).unwrap();
	assert!(matches!(report, RegdbReport::UpToDate{..}));
	assert!(!report.changed());
	assert_eq!(report.to_string(), "Regdb is up to date");
	assert_eq!(img.into_bytes(), data);
}

#[test]
fn update()
{
	let desc = Generation::Ath11k.descriptor();
	let data = ath11k_regdb(0x5A);
	let mut replacement = vec![0u8; 0x200];
	regdb11(&mut replacement, 0xA5);
	let mut img = Image::new(&desc, data.clone()).unwrap();
	let report = update_regdb(&mut img, &replacement).unwrap();
	assert!(report.changed());
	assert_eq!(report.to_string(), "Updating regdb in IPQ6018 BDF");
	assert_eq!(img.get(REGDB11, 0x200).unwrap(), replacement.as_slice());
	let expect = checksum::update([0xAA, 0xBB], &data[REGDB11..REGDB11 + 0x200], &replacement, Endian::Big);
	assert_eq!(img.get(0x0A, 2).unwrap(), &expect);

	// and back again
	let mut img = Image::new(&desc, img.into_bytes()).unwrap();
	update_regdb(&mut img, &data[REGDB11..REGDB11 + 0x200]).unwrap();
	assert_eq!(img.into_bytes(), data);
}

#[test]
fn update_versions()
{
	let desc = FormatDescriptor::ath10k();
	let mut img = Image::new(&desc, ath10k_regdb(0x03)).unwrap();
	let mut replacement = ath10k_regdb(0x04)[0x40..0x840].to_vec();
	replacement[0x100] = 0xFF;
	let report = update_regdb(&mut img, &replacement).unwrap();
	assert!(matches!(report, RegdbReport::Updated{old_version: Some(0x03), new_version: Some(0x04), ..}));
	assert_eq!(report.to_string(), "Updating regdb in unknown BDF (version 0x03 -> 0x04)");
}

#[test]
fn update_errors()
{
	let desc = Generation::Ath11k.descriptor();
	let data = ath11k_regdb(0x5A);

	let mut short = vec![0u8; 0x1FF];
	regdb11(&mut short, 0xA5);
	let mut img = Image::new(&desc, data.clone()).unwrap();
	assert!(matches!(update_regdb(&mut img, &short), Err(BdfError::SizeMismatch{expect: 0x200, have: 0x1FF})));
	assert_eq!(img.as_bytes(), data.as_slice());

	let mut bad = vec![0u8; 0x200];
	regdb11(&mut bad, 0xA5);
	bad[4] = 0x38;
	assert!(matches!(update_regdb(&mut img, &bad), Err(BdfError::InvalidReplacementHeader{..})));
	assert!(!img.is_dirty());

	let mut img = Image::new(&desc, ath11k()).unwrap();
	assert!(matches!(update_regdb(&mut img, &short), Err(BdfError::SignatureNotFound)));
	assert!(matches!(extract_regdb(&img), Err(BdfError::SignatureNotFound)));
}

#[test]
fn patch()
{
	let desc = Generation::Ath11k.descriptor();
	let mut data = ath11k();
	data[0x34] = 0x12;
	let mut img = Image::new(&desc, data).unwrap();
	let report = patch_range(&mut img, 0x35, &[0xAB]).unwrap();
	assert_eq!(report, PatchReport::Patched{address: 0x35, len: 1});
	assert_eq!(report.to_string(), "Patched 1 bytes at 0x35");
	assert_eq!(img.get(0x34, 3).unwrap(), &[0x12, 0xAB, 0x00]);
	// big endian words 0x1200 -> 0x12AB
	assert_eq!(img.checksum().get_value(), 0xAABB ^ 0x1200 ^ 0x12AB);

	let report = patch_range(&mut img, 0x35, &[0xAB]).unwrap();
	assert_eq!(report, PatchReport::NotNeeded{address: 0x35, len: 1});
	assert!(!report.changed());
}

#[test]
fn patch_unaligned_span()
{
	let desc = FormatDescriptor::ath10k();
	let mut data = ath10k_regdb(1);
	data[0x20..0x28].copy_from_slice(&[0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80]);
	let before = data.clone();
	let mut img = Image::new(&desc, data).unwrap();
	patch_range(&mut img, 0x21, &[0xA1, 0xA2, 0xA3, 0xA4]).unwrap();
	let after = img.as_bytes();
	assert_eq!(&after[0x20..0x28], &[0x10, 0xA1, 0xA2, 0xA3, 0xA4, 0x60, 0x70, 0x80]);
	let expect = checksum::update([0x11, 0x22], &before[0x20..0x26], &after[0x20..0x26], Endian::Little);
	assert_eq!(&after[0x02..0x04], &expect);
}

#[test]
fn patch_errors()
{
	let desc = Generation::Ath11k.descriptor();
	let mut img = Image::new(&desc, ath11k()).unwrap();
	assert!(matches!(patch_range(&mut img, 0x10, &[]), Err(BdfError::EmptyPatch)));
	assert!(matches!(patch_range(&mut img, 0x5FF, &[0x01, 0x02]), Err(BdfError::OutOfBounds{..})));
	assert!(matches!(patch_range(&mut img, 0x0A, &[0x01]), Err(BdfError::ChecksumOverlap{..})));
	assert!(!img.is_dirty());
}

#[test]
fn patch_arguments()
{
	assert_eq!(parse_address("0x35").unwrap(), 0x35);
	assert_eq!(parse_address("53").unwrap(), 53);
	assert_eq!(parse_address("065").unwrap(), 0o65);
	assert!(matches!(parse_address("0xq"), Err(BdfError::BadAddress(..))));
	assert_eq!(resolve_value("ab01").unwrap(), vec![0xAB, 0x01]);
	assert!(matches!(resolve_value("abc"), Err(BdfError::BadValue(..))));
	assert!(matches!(resolve_value("zz"), Err(BdfError::BadValue(..))));
	assert!(matches!(resolve_value(""), Err(BdfError::EmptyPatch)));
}

#[test]
fn summary()
{
	let desc = FormatDescriptor::ath10k();
	let img = Image::new(&desc, ath10k_regdb(0x07)).unwrap();
	let summary = summarize(&img);
	assert_eq!(summary.regdomain, Some(0x0048));
	assert_eq!(summary.checksum, 0x2211);
	assert_eq!(summary.to_string(), "format: ath10k (2176 bytes)\nchecksum: 0x2211\nregdomain: 0x0048\nregdb: unknown regdb at 0x40 (2048 bytes, version 0x07)");

	let desc = Generation::Ath11k.descriptor();
	let img = Image::new(&desc, ath11k()).unwrap();
	let summary = summarize(&img);
	assert_eq!(summary.regdomain, Some(0));
	assert!(summary.to_string().ends_with("regdomain: not set\nregdb: unable to find regulatory database"));
}
