use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

// Shared game UI/constants.
pub const DEFAULT_RATE: f64 = 1.0;
pub const DEFAULT_RATE_STEP: f64 = 0.05;
pub const DEFAULT_LENGTH: usize = 60;
pub const DEFAULT_WIDTH: usize = 12;
pub const DEFAULT_SYMBOLS: [char; 5] = ['!', '@', '#', '$', '%'];
// One advance every `ADVANCE_SECS / rate` seconds.
pub const ADVANCE_SECS: f64 = 2.0;
pub const INFO_H: u16 = 5;
pub const CONTROLS_H: u16 = 5;
// Cabinet border plus well walls around the playfield.
pub const CHROME_W: u16 = 4;
pub const CHROME_H: u16 = 4 + INFO_H + CONTROLS_H;
// Narrowest cabinet that still fits the info and controls text.
pub const MIN_PANE_WIDTH: u16 = 36;

/// A cursed Panel de Pon clone.
#[derive(Parser, Debug)]
#[clap(name = "cursed-panels", version, about, long_about = None)]
pub struct Cli {
    /// Initial speed for the stack to advance at.
    #[clap(short, long, value_name = "RT", default_value_t = DEFAULT_RATE, allow_negative_numbers = true)]
    pub rate: f64,
    /// Speed gained for every panel cleared.
    #[clap(long, value_name = "STEP", default_value_t = DEFAULT_RATE_STEP, allow_negative_numbers = true)]
    pub rate_step: f64,
    /// Symbols that make up the panels.
    #[clap(short, long, value_name = "SYM", num_args = 1..)]
    pub symbols: Option<Vec<String>>,
    /// Total length of the stack, in columns.
    #[clap(short, long, value_name = "LEN", default_value_t = DEFAULT_LENGTH as i64, allow_negative_numbers = true)]
    pub length: i64,
    /// Width of the stack, in rows.
    #[clap(short, long, value_name = "WDT", default_value_t = DEFAULT_WIDTH as i64, allow_negative_numbers = true)]
    pub width: i64,
    /// Seed for panel generation; random when omitted.
    #[clap(long)]
    pub seed: Option<u64>,
    /// Write logs to this file. Filter with RUST_LOG.
    #[clap(long, env = "CURSED_PANELS_LOG")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("rate must be a positive number, got {0}")]
    Rate(f64),
    #[error("rate step must be zero or a positive number, got {0}")]
    RateStep(f64),
    #[error("length must be a positive integer, got {0}")]
    Length(i64),
    #[error("width must be a positive integer, got {0}")]
    Width(i64),
    #[error("at least one symbol is required")]
    NoSymbols,
    #[error("symbol {0:?} is not a single character")]
    NotSingleChar(String),
    #[error("symbol {0:?} is given more than once")]
    DuplicateSymbol(char),
}

/// Validated startup settings. Built once, never changed by the game.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub rate: f64,
    pub rate_step: f64,
    pub symbols: Vec<char>,
    pub length: usize,
    pub width: usize,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            rate_step: DEFAULT_RATE_STEP,
            symbols: DEFAULT_SYMBOLS.to_vec(),
            length: DEFAULT_LENGTH,
            width: DEFAULT_WIDTH,
            seed: None,
        }
    }
}

impl Cli {
    pub fn into_config(self) -> Result<Config, ConfigError> {
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(ConfigError::Rate(self.rate));
        }
        if !(self.rate_step.is_finite() && self.rate_step >= 0.0) {
            return Err(ConfigError::RateStep(self.rate_step));
        }
        let length = usize::try_from(self.length)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(ConfigError::Length(self.length))?;
        let width = usize::try_from(self.width)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(ConfigError::Width(self.width))?;
        let symbols = match self.symbols {
            Some(raw) => parse_symbols(&raw)?,
            None => DEFAULT_SYMBOLS.to_vec(),
        };

        Ok(Config {
            rate: self.rate,
            rate_step: self.rate_step,
            symbols,
            length,
            width,
            seed: self.seed,
        })
    }
}

fn parse_symbols(raw: &[String]) -> Result<Vec<char>, ConfigError> {
    let mut symbols = Vec::with_capacity(raw.len());
    for text in raw {
        let mut chars = text.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_whitespace() => ch,
            _ => return Err(ConfigError::NotSingleChar(text.clone())),
        };
        if symbols.contains(&symbol) {
            return Err(ConfigError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }
    if symbols.is_empty() {
        return Err(ConfigError::NoSymbols);
    }
    Ok(symbols)
}

impl Config {
    /// Shrinks the playfield to fit a `cols` x `rows` terminal. Returns
    /// whether anything had to change.
    pub fn fit_to(&mut self, cols: u16, rows: u16) -> bool {
        let max_length = usize::from(cols.saturating_sub(CHROME_W)).max(1);
        let max_width = usize::from(rows.saturating_sub(CHROME_H)).max(1);
        let before = (self.length, self.width);
        self.length = self.length.min(max_length);
        self.width = self.width.min(max_width);
        before != (self.length, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, ConfigError> {
        let cli = Cli::try_parse_from(std::iter::once("cursed-panels").chain(args.iter().copied()))
            .expect("arguments should parse");
        cli.into_config()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.symbols, vec!['!', '@', '#', '$', '%']);
        assert_eq!(config.length, 60);
        assert_eq!(config.width, 12);
    }

    #[test]
    fn test_custom_values() {
        let config = parse(&["-r", "2.5", "-l", "30", "-w", "6", "-s", "A", "B", "C", "--seed", "9"])
            .unwrap();
        assert_eq!(config.rate, 2.5);
        assert_eq!(config.length, 30);
        assert_eq!(config.width, 6);
        assert_eq!(config.symbols, vec!['A', 'B', 'C']);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_rejects_non_positive_numbers() {
        assert_eq!(parse(&["-r", "0"]), Err(ConfigError::Rate(0.0)));
        assert_eq!(parse(&["-r", "-1"]), Err(ConfigError::Rate(-1.0)));
        assert_eq!(parse(&["-l", "0"]), Err(ConfigError::Length(0)));
        assert_eq!(parse(&["-w", "-3"]), Err(ConfigError::Width(-3)));
        assert_eq!(parse(&["--rate-step", "-0.5"]), Err(ConfigError::RateStep(-0.5)));
    }

    #[test]
    fn test_rejects_bad_symbols() {
        assert_eq!(
            parse(&["-s", "A", "BC"]),
            Err(ConfigError::NotSingleChar("BC".to_string()))
        );
        assert_eq!(parse(&["-s", "A", "B", "A"]), Err(ConfigError::DuplicateSymbol('A')));
        assert_eq!(parse_symbols(&[]), Err(ConfigError::NoSymbols));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let err = parse(&["-l", "0"]).unwrap_err();
        assert_eq!(err.to_string(), "length must be a positive integer, got 0");
    }

    #[test]
    fn test_fit_to_terminal() {
        let mut config = Config::default();
        assert!(config.fit_to(40, 20));
        assert_eq!(config.length, 36);
        assert_eq!(config.width, 6);

        let mut small = Config {
            length: 10,
            width: 4,
            ..Config::default()
        };
        assert!(!small.fit_to(200, 60));
        assert_eq!((small.length, small.width), (10, 4));
    }
}
