use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record};

use bdfedit::{file, FormatDescriptor, Generation, Image, Result};
use bdfedit::ops::{self, Report};

macro_rules!print_err
{
	($err:ident, $($print:expr),+) =>
	{
		{
			use std::error::Error;
			use std::io::Write;
			let mut stderr = std::io::stderr().lock();
			let _ = write!(stderr, $($print),+);
			let _ = write!(stderr, ": {}\n", $err);
			let mut source = $err.source();
			while let Some(src) = source
			{
				let _ = write!(stderr, "\tsource: {src}\n");
				source = src.source();
			}
		}
	};
}

const REGDB_FILE: &str = "regdb.bin";

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg
{
	Ath10k,
	Ath11k,
}

impl From<FormatArg> for Generation
{
	fn from(value: FormatArg) -> Self
	{
		match value
		{
			FormatArg::Ath10k => Generation::Ath10k,
			FormatArg::Ath11k => Generation::Ath11k,
		}
	}
}

#[derive(Parser, Debug)]
#[command(name = "bdfedit", version, about = "ath10k/ath11k board data file tool")]
struct Cli
{
	/// Board data file generation (detected from the header if omitted)
	#[arg(short, long, value_enum, global = true)]
	format: Option<FormatArg>,
	/// JSON format descriptor to use instead of a built-in one
	#[arg(short, long, value_name = "FILE", global = true, conflicts_with = "format")]
	descriptor: Option<PathBuf>,
	/// Output file name
	#[arg(short, long, value_name = "FILE", global = true)]
	output: Option<PathBuf>,
	/// Log more details to stderr (repeat for more)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command
{
	/// Remove the regdomain from a BDF
	#[command(visible_alias = "r")]
	RemoveRegdomain{bdf: PathBuf},
	/// Extract the regdb from a BDF (to regdb.bin by default)
	#[command(visible_alias = "e")]
	ExtractRegdb{bdf: PathBuf},
	/// Replace the regdb in a BDF
	#[command(visible_alias = "u")]
	UpdateRegdb{bdf: PathBuf, regdb: PathBuf},
	/// Overwrite bytes at ADDRESS with VALUE (hex digits, or a file to copy)
	#[command(visible_alias = "p")]
	Patch{bdf: PathBuf, address: String, value: String},
	/// Show the format, checksum, regdomain and regdb of a BDF
	Info{bdf: PathBuf},
}

struct StderrLog;

impl Log for StderrLog
{
	fn enabled(&self, metadata: &Metadata) -> bool
	{
		metadata.level() <= log::max_level()
	}

	fn log(&self, record: &Record)
	{
		if self.enabled(record.metadata())
		{
			let level = match record.level()
			{
				Level::Error => "error",
				Level::Warn => "warning",
				Level::Info => "info",
				Level::Debug => "debug",
				Level::Trace => "trace",
			};
			eprintln!("{level}: {}", record.args());
		}
	}

	fn flush(&self) {}
}

static LOGGER: StderrLog = StderrLog;

fn init_log(verbose: u8)
{
	let level = match verbose
	{
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};
	if log::set_logger(&LOGGER).is_ok() {log::set_max_level(level);}
}

fn descriptor(cli: &Cli, data: &[u8]) -> Result<FormatDescriptor>
{
	if let Some(path) = &cli.descriptor {FormatDescriptor::load(path)}
	else
	{
		match cli.format
		{
			Some(fmt) => Ok(Generation::from(fmt).descriptor()),
			None => FormatDescriptor::detect(data),
		}
	}
}

fn finish(report: &impl Report, data: &[u8], path: &Path) -> Result<()>
{
	println!("{report}");
	file::commit(report, path, data)?;
	Ok(())
}

fn run(cli: &Cli) -> Result<()>
{
	match &cli.command
	{
		Command::RemoveRegdomain{bdf} =>
		{
			let data = file::load(bdf)?;
			let desc = descriptor(cli, &data)?;
			let mut img = Image::new(&desc, data)?;
			let report = ops::remove_regdomain(&mut img)?;
			finish(&report, img.as_bytes(), cli.output.as_deref().unwrap_or(bdf.as_path()))
		},
		Command::ExtractRegdb{bdf} =>
		{
			let data = file::load(bdf)?;
			let desc = descriptor(cli, &data)?;
			let img = Image::new(&desc, data)?;
			let (report, blob) = ops::extract_regdb(&img)?;
			finish(&report, &blob, cli.output.as_deref().unwrap_or(Path::new(REGDB_FILE)))
		},
		Command::UpdateRegdb{bdf, regdb} =>
		{
			let data = file::load(bdf)?;
			let desc = descriptor(cli, &data)?;
			let mut img = Image::new(&desc, data)?;
			let replacement = file::load(regdb)?;
			let report = ops::update_regdb(&mut img, &replacement)?;
			finish(&report, img.as_bytes(), cli.output.as_deref().unwrap_or(bdf.as_path()))
		},
		Command::Patch{bdf, address, value} =>
		{
			let address = ops::patch::parse_address(address)?;
			let value = ops::patch::resolve_value(value)?;
			let data = file::load(bdf)?;
			let desc = descriptor(cli, &data)?;
			let mut img = Image::new(&desc, data)?;
			let report = ops::patch_range(&mut img, address, &value)?;
			finish(&report, img.as_bytes(), cli.output.as_deref().unwrap_or(bdf.as_path()))
		},
		Command::Info{bdf} =>
		{
			let data = file::load(bdf)?;
			let desc = descriptor(cli, &data)?;
			let img = Image::new(&desc, data)?;
			println!("{}", ops::summarize(&img));
			Ok(())
		},
	}
}

pub fn main() -> ExitCode
{
	let cli = Cli::parse();
	init_log(cli.verbose);
	match run(&cli)
	{
		Ok(()) => ExitCode::SUCCESS,
		Err(e) =>
		{
			print_err!(e, "error");
			ExitCode::FAILURE
		},
	}
}
