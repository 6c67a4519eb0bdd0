//! Operator Console - Pair Selection and Threshold Entry
//!
//! The minimal interactive surface: pick one pair from the configured
//! catalogue and enter the two spread thresholds. Invalid input is
//! rejected with a re-prompt, never propagated into the loop. Reads are
//! parameterized over `BufRead` so the re-prompt loops are testable with
//! an in-memory cursor.

use std::io::BufRead;

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;

use crate::config::PairConfig;
use crate::domain::instrument::PairInstruments;
use crate::domain::portfolio::PortfolioSnapshot;
use crate::domain::spread::ThresholdBand;

/// Read one trimmed line, failing if the input is closed.
fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    let n = input.read_line(&mut line).context("Failed to read input")?;
    if n == 0 {
        bail!("input closed before a valid entry was made");
    }
    Ok(line.trim().to_string())
}

/// Let the operator pick one pair from the catalogue.
///
/// Re-prompts until a valid menu number is entered.
pub fn select_pair<'a, R: BufRead>(
    input: &mut R,
    pairs: &'a [PairConfig],
) -> Result<&'a PairConfig> {
    loop {
        println!("Select a company:");
        for (i, pair) in pairs.iter().enumerate() {
            println!("{} - {} ({}/{})", i + 1, pair.name, pair.ordinary, pair.preferred);
        }

        let line = read_line(input)?;
        match line.parse::<usize>() {
            Ok(choice) if (1..=pairs.len()).contains(&choice) => {
                let pair = &pairs[choice - 1];
                println!("Selected {}.", pair.name);
                return Ok(pair);
            }
            _ => {
                println!("Invalid choice. Please enter a number from 1 to {}.", pairs.len());
            }
        }
    }
}

/// Prompt for the two spread thresholds.
///
/// Re-prompts until both parse and the lower bound is strictly below the
/// upper bound.
pub fn prompt_thresholds<R: BufRead>(input: &mut R) -> Result<ThresholdBand> {
    loop {
        println!("Enter the spread below which preferred is sold and ordinary bought:");
        let lower = read_line(input)?;
        println!("Enter the spread above which ordinary is sold and preferred bought:");
        let upper = read_line(input)?;

        let parsed = lower
            .parse::<Decimal>()
            .and_then(|lo| upper.parse::<Decimal>().map(|hi| (lo, hi)));
        match parsed {
            Ok((lo, hi)) => match ThresholdBand::new(lo, hi) {
                Ok(band) => return Ok(band),
                Err(_) => {
                    println!("Invalid values. The first number must be below the second.");
                }
            },
            Err(_) => {
                println!("Invalid values. Please enter two decimal numbers.");
            }
        }
    }
}

/// Print the startup portfolio summary for the selected pair.
pub fn print_portfolio(snapshot: &PortfolioSnapshot, pair: &PairInstruments) {
    println!("Your portfolio:");
    println!("  Cash: {}", snapshot.cash());
    println!(
        "  Ordinary {} = {} units",
        pair.ordinary.ticker,
        snapshot.quantity_of(&pair.ordinary.id)
    );
    println!(
        "  Preferred {} = {} units",
        pair.preferred.ticker,
        snapshot.quantity_of(&pair.preferred.id)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    fn pairs() -> Vec<PairConfig> {
        vec![
            PairConfig {
                name: "Sberbank".to_string(),
                ordinary: "SBER".to_string(),
                preferred: "SBERP".to_string(),
            },
            PairConfig {
                name: "Tatneft".to_string(),
                ordinary: "TATN".to_string(),
                preferred: "TATNP".to_string(),
            },
        ]
    }

    #[test]
    fn test_select_pair_valid_choice() {
        let catalogue = pairs();
        let mut input = Cursor::new("2\n");
        let selected = select_pair(&mut input, &catalogue).unwrap();
        assert_eq!(selected.name, "Tatneft");
    }

    #[test]
    fn test_select_pair_reprompts_on_garbage() {
        let catalogue = pairs();
        let mut input = Cursor::new("zero\n9\n1\n");
        let selected = select_pair(&mut input, &catalogue).unwrap();
        assert_eq!(selected.name, "Sberbank");
    }

    #[test]
    fn test_select_pair_fails_on_closed_input() {
        let catalogue = pairs();
        let mut input = Cursor::new("");
        assert!(select_pair(&mut input, &catalogue).is_err());
    }

    #[test]
    fn test_prompt_thresholds_accepts_ordered_bounds() {
        let mut input = Cursor::new("-1.5\n1.5\n");
        let band = prompt_thresholds(&mut input).unwrap();
        assert_eq!(band.lower(), dec!(-1.5));
        assert_eq!(band.upper(), dec!(1.5));
    }

    #[test]
    fn test_prompt_thresholds_reprompts_on_inverted_bounds() {
        let mut input = Cursor::new("2\n1\n-1\n1\n");
        let band = prompt_thresholds(&mut input).unwrap();
        assert_eq!(band.lower(), dec!(-1));
        assert_eq!(band.upper(), dec!(1));
    }

    #[test]
    fn test_prompt_thresholds_reprompts_on_unparseable() {
        let mut input = Cursor::new("abc\ndef\n-0.5\n0.5\n");
        let band = prompt_thresholds(&mut input).unwrap();
        assert_eq!(band.lower(), dec!(-0.5));
    }
}
