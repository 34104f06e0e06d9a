/// Parses an unsigned integer literal: `0x` hexadecimal, `0b` binary, `0o` or a leading `0` octal, otherwise decimal.
pub fn parse_u64(text: &str) -> Option<u64>
{
	let text = text.trim();
	let (radix, digits) = if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {(16, rest)}
	else if let Some(rest) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {(2, rest)}
	else if let Some(rest) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {(8, rest)}
	else if text.len() > 1 && text.starts_with('0') {(8, &text[1..])}
	else {(10, text)};
	// `from_str_radix` accepts a sign, literals don't
	if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {return None;}
	u64::from_str_radix(digits, radix).ok()
}

pub fn parse_usize(text: &str) -> Option<usize>
{
	parse_u64(text).and_then(|v| usize::try_from(v).ok())
}
