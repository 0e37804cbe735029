use crate::fold::FoldParams;
use crate::motif::MotifParams;
use crate::search::SearchParams;
use crate::utils::Result;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="rnamotif",
          author="Benjamin Strauch",
          version=&**FULL_VERSION,
          about="RNA structural motif profiling and search",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{author}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    #[clap(global = true)]
    pub verbosity: u8,

    #[clap(short = 'q')]
    #[clap(long = "quiet")]
    #[clap(help = "Only report errors")]
    #[clap(global = true)]
    #[clap(conflicts_with = "verbosity")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Search a reference collection for structural motifs")]
    Search(SearchArgs),
    #[clap(about = "Write structural profiles of alignment families")]
    Profile(ProfileArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("search")))]
#[command(arg_required_else_help(true))]
pub struct SearchArgs {
    #[clap(help = "Stockholm file with seed alignments")]
    #[clap(value_name = "ALIGNMENT")]
    #[arg(value_parser = check_file_exists)]
    pub alignment_path: PathBuf,

    #[clap(help = "FASTA file with reference sequences")]
    #[clap(value_name = "GENOME")]
    #[arg(value_parser = check_file_exists)]
    pub genome_path: PathBuf,

    #[clap(short = 'r')]
    #[clap(long = "reference")]
    #[clap(help = "Reference position table of known family members")]
    #[clap(value_name = "POSITIONS")]
    pub positions_path: Option<PathBuf>,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads used to build motifs")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(long = "max-length")]
    #[clap(help = "Skip alignments with more columns than this")]
    #[clap(value_name = "LENGTH")]
    #[clap(default_value = "1000")]
    pub max_length: usize,

    #[clap(short = 'f')]
    #[clap(long = "freq")]
    #[clap(help = "Minimum frequency of a profile symbol, in percent")]
    #[clap(value_name = "PERCENT")]
    #[clap(default_value = "0")]
    #[arg(value_parser = percentage_in_range)]
    pub min_frequency: f64,

    #[clap(short = 'm')]
    #[clap(long = "match-length")]
    #[clap(help = "Skip stem-loops spelling fewer bases than this")]
    #[clap(value_name = "LENGTH")]
    #[clap(default_value = "0")]
    pub match_length: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "min-probability")]
    #[clap(help = "Minimum profile probability of a candidate")]
    #[clap(value_name = "PROBABILITY")]
    #[clap(default_value = "0.0")]
    #[arg(value_parser = ensure_unit_float)]
    pub min_probability: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "fold")]
    #[clap(help = "Fold the alignment consensus instead of using SS_cons")]
    pub fold: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "pseudoknot")]
    #[clap(help = "Fold with IPknot to allow pseudoknots")]
    #[clap(requires = "fold")]
    pub pseudoknot: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "constrain")]
    #[clap(help = "Constrain folding with SS_cons")]
    #[clap(requires = "fold")]
    pub constrain: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "include-reverse")]
    #[clap(help = "Report reverse-strand hits and reverse reference records")]
    pub include_reverse: bool,
}

impl SearchArgs {
    pub fn motif_params(&self) -> MotifParams {
        MotifParams {
            max_length: self.max_length,
            fold: fold_params(self.fold, self.pseudoknot, self.constrain),
        }
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            min_frequency: self.min_frequency,
            min_probability: self.min_probability,
            min_seed_length: self.match_length,
            include_reverse: self.include_reverse,
        }
    }
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("profile")))]
#[command(arg_required_else_help(true))]
pub struct ProfileArgs {
    #[clap(help = "Stockholm file with seed alignments")]
    #[clap(value_name = "ALIGNMENT")]
    #[arg(value_parser = check_file_exists)]
    pub alignment_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(long = "max-length")]
    #[clap(help = "Skip alignments with more columns than this")]
    #[clap(value_name = "LENGTH")]
    #[clap(default_value = "1000")]
    pub max_length: usize,

    #[clap(short = 'f')]
    #[clap(long = "freq")]
    #[clap(help = "Minimum frequency of a profile symbol, in percent")]
    #[clap(value_name = "PERCENT")]
    #[clap(default_value = "0")]
    #[arg(value_parser = percentage_in_range)]
    pub min_frequency: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "fold")]
    #[clap(help = "Fold the alignment consensus instead of using SS_cons")]
    pub fold: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "pseudoknot")]
    #[clap(help = "Fold with IPknot to allow pseudoknots")]
    #[clap(requires = "fold")]
    pub pseudoknot: bool,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "constrain")]
    #[clap(help = "Constrain folding with SS_cons")]
    #[clap(requires = "fold")]
    pub constrain: bool,
}

impl ProfileArgs {
    pub fn motif_params(&self) -> MotifParams {
        MotifParams {
            max_length: self.max_length,
            fold: fold_params(self.fold, self.pseudoknot, self.constrain),
        }
    }
}

fn fold_params(fold: bool, pseudoknot: bool, constrain: bool) -> Option<FoldParams> {
    fold.then_some(FoldParams {
        pseudoknot,
        constrain,
    })
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

/// Integer percentage, returned as a fraction.
fn percentage_in_range(s: &str) -> Result<f64> {
    let percent: u32 = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid integer percentage", s))?;
    if percent <= 100 {
        Ok(percent as f64 / 100.0)
    } else {
        Err(format!("Percentage must be between 0 and 100, got: {}", percent))
    }
}

fn ensure_unit_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_converted_to_fraction() {
        assert_eq!(percentage_in_range("25"), Ok(0.25));
        assert_eq!(percentage_in_range("0"), Ok(0.0));
        assert!(percentage_in_range("101").is_err());
        assert!(percentage_in_range("12.5").is_err());
    }

    #[test]
    fn thread_count_must_be_positive() {
        assert_eq!(threads_in_range("4"), Ok(4));
        assert!(threads_in_range("0").is_err());
    }

    #[test]
    fn unit_float_bounds() {
        assert_eq!(ensure_unit_float("0.5"), Ok(0.5));
        assert!(ensure_unit_float("1.5").is_err());
    }

    #[test]
    fn search_arguments_map_to_params() {
        let alignment = tempfile::NamedTempFile::new().unwrap();
        let genome = tempfile::NamedTempFile::new().unwrap();
        let cli = Cli::try_parse_from([
            "rnamotif",
            "search",
            alignment.path().to_str().unwrap(),
            genome.path().to_str().unwrap(),
            "-o",
            "out",
            "-f",
            "10",
            "-m",
            "8",
            "--fold",
            "--pseudoknot",
        ])
        .unwrap();
        let Command::Search(args) = cli.command else {
            panic!("expected search subcommand");
        };
        let motif_params = args.motif_params();
        assert_eq!(motif_params.max_length, 1000);
        assert_eq!(
            motif_params.fold,
            Some(FoldParams {
                pseudoknot: true,
                constrain: false
            })
        );
        let search_params = args.search_params();
        assert_eq!(search_params.min_frequency, 0.1);
        assert_eq!(search_params.min_seed_length, 8);
        assert!(!search_params.include_reverse);
    }

    #[test]
    fn pseudoknot_requires_fold() {
        let alignment = tempfile::NamedTempFile::new().unwrap();
        let result = Cli::try_parse_from([
            "rnamotif",
            "profile",
            alignment.path().to_str().unwrap(),
            "-o",
            "out",
            "--pseudoknot",
        ]);
        assert!(result.is_err());
    }
}
