use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use pool::{Difference, Ipv4Pool};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pool-diff")]
#[command(
    about = "Prints the addresses of an old pool which are missing from a new pool",
    long_about = None
)]
struct Cli {
    /// File with the old pool, or `-` for standard input
    #[arg(long)]
    old: PathBuf,
    /// File with the new pool, or `-` for standard input
    #[arg(long)]
    new: PathBuf,
    /// Notation of the printed ranges
    #[arg(long, value_enum, env = "POOL_DIFF_FORMAT", default_value_t = Format::Ipv4)]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Dotted quads, `10.0.0.1-10.0.0.20`
    Ipv4,
    /// Decimal integers, `167772161-167772180`
    Int,
}

fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

fn check_inputs(cli: &Cli) -> Result<()> {
    if is_stdin(&cli.old) && is_stdin(&cli.new) {
        bail!("only one of --old and --new can read standard input");
    }

    Ok(())
}

fn read_pool(path: &Path) -> Result<Ipv4Pool> {
    let text = if is_stdin(path) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        text
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };

    let pool: Ipv4Pool = text
        .parse()
        .with_context(|| format!("failed to parse {}", path.display()))?;

    debug!(path = %path.display(), ranges = pool.len_ranges(), "read pool");

    Ok(pool)
}

fn render(pool: &Ipv4Pool, format: Format) -> String {
    match format {
        Format::Ipv4 => pool.to_string_ipv4(),
        Format::Int => pool
            .normalized()
            .map(|range| format!("{range}\n"))
            .collect(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    check_inputs(&cli)?;

    let old = read_pool(&cli.old)?;
    let new = read_pool(&cli.new)?;

    let diff = old.difference(&new);

    info!(
        ranges = diff.len_ranges(),
        addresses = %diff.len(),
        "computed difference"
    );

    print!("{}", render(&diff, cli.format));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_render() {
        let pool = Ipv4Pool::from([0x0a00_0010..=0x0a00_001f, 0x0a00_0001..=0x0a00_0001]);

        assert_eq!(render(&pool, Format::Ipv4), "10.0.0.1\n10.0.0.16-10.0.0.31\n");
        assert_eq!(render(&pool, Format::Int), "167772161\n167772176-167772191\n");
        assert_eq!(render(&Ipv4Pool::default(), Format::Int), "");
    }

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from([
            "pool-diff", "--old", "a.txt", "--new", "-", "--format", "int",
        ])
        .unwrap();

        assert_eq!(cli.old, PathBuf::from("a.txt"));
        assert!(is_stdin(&cli.new));
        assert_eq!(cli.format, Format::Int);

        assert!(Cli::try_parse_from(["pool-diff", "--old", "a.txt"]).is_err());
    }

    #[test]
    fn test_check_inputs() {
        let cli = Cli::try_parse_from(["pool-diff", "--old", "-", "--new", "b.txt"]).unwrap();
        assert!(check_inputs(&cli).is_ok());

        let cli = Cli::try_parse_from(["pool-diff", "--old", "a.txt", "--new", "-"]).unwrap();
        assert!(check_inputs(&cli).is_ok());

        let cli = Cli::try_parse_from(["pool-diff", "--old", "-", "--new", "-"]).unwrap();
        let err = check_inputs(&cli).unwrap_err();
        assert!(err.to_string().contains("standard input"));
    }

    #[test]
    fn test_read_pool() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10.0.0.0/30 # block").unwrap();
        writeln!(file, "10.0.0.8").unwrap();

        let pool = read_pool(file.path()).unwrap();
        assert_eq!(
            pool,
            Ipv4Pool::from([0x0a00_0000..=0x0a00_0003, 0x0a00_0008..=0x0a00_0008])
        );
    }

    #[test]
    fn test_read_pool_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let err = read_pool(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read"));
    }

    #[test]
    fn test_read_pool_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "10.0.0.1").unwrap();
        writeln!(file, "10.0.0.9-10.0.0.3").unwrap();

        let err = format!("{:#}", read_pool(file.path()).unwrap_err());
        assert!(err.contains("failed to parse"));
        assert!(err.contains("line 2"));
        assert!(err.contains("range start is greater than range end"));
    }
}
