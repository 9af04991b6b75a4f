use crate::output;
use crate::SourceArgs;
use cuvee_core::error::CuveeError;
use cuvee_core::model::{parse_decimal, Attribute, MeasurementRecord};
use cuvee_core::rules::schema::ReferenceTable;
use cuvee_core::Session;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};

#[derive(Debug, PartialEq)]
enum Command {
    Set(Attribute, Decimal),
    Show,
    Analyze,
    Reset,
    Help,
    Quit,
    Nothing,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Nothing);
    };

    match head.to_lowercase().as_str() {
        "set" => {
            let name = words.next().ok_or("usage: set <attribute> <value>")?;
            let value = words.next().ok_or("usage: set <attribute> <value>")?;
            let attribute = Attribute::from_str_loose(name)
                .ok_or_else(|| format!("unknown attribute '{name}' (try 'show')"))?;
            let value = parse_decimal(value).map_err(|e| e.to_string())?;
            Ok(Command::Set(attribute, value))
        }
        "show" => Ok(Command::Show),
        "analyze" | "a" => Ok(Command::Analyze),
        "reset" => Ok(Command::Reset),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

pub fn run(sources: &SourceArgs) -> Result<(), CuveeError> {
    let evaluator = super::load_evaluator(sources)?;
    let mut session = Session::new(evaluator);
    let mut record = MeasurementRecord::default();

    println!("Wine quality evaluation. Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("cuvee> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let command = match parse_command(&line) {
            Ok(c) => c,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match command {
            Command::Set(attribute, value) => {
                match check_value(session.evaluator().reference(), attribute, value) {
                    Ok(()) => record = record.with(attribute, value),
                    Err(msg) => println!("{msg}"),
                }
            }
            Command::Show => print_record(&record, session.evaluator().reference()),
            Command::Analyze => match session.analyze(&record) {
                Ok(evaluation) => output::table::print(evaluation, false),
                Err(msg) => {
                    println!("{msg}");
                    if session.last().is_some() {
                        println!("(previous result unchanged)");
                    }
                }
            },
            Command::Reset => {
                record = MeasurementRecord::default();
                println!("Measurements reset to defaults.");
            }
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Nothing => {}
        }
    }

    Ok(())
}

/// Reject values the input form would not accept.
fn check_value(reference: &ReferenceTable, attribute: Attribute, value: Decimal) -> Result<(), String> {
    let Some(entry) = reference.entry(attribute) else {
        return Err(format!("no reference range for {}", attribute.label()));
    };
    if !entry.contains(value) {
        return Err(format!(
            "{} must be between {} and {} {}",
            attribute.label(),
            entry.min,
            entry.max,
            entry.unit
        ));
    }
    if attribute.is_integral() && !value.fract().is_zero() {
        return Err(format!("{} must be a whole number", attribute.label()));
    }
    Ok(())
}

fn print_record(record: &MeasurementRecord, reference: &ReferenceTable) {
    let width = Attribute::ALL.iter().map(|a| a.key().len()).max().unwrap_or(20);
    for (attribute, value) in record.values() {
        let range = reference
            .entry(attribute)
            .map(|e| format!("[{} - {}] {}", e.min, e.max, e.unit))
            .unwrap_or_default();
        println!(
            "  {:<width$}  {:<10} {}",
            attribute.key(),
            value.to_string(),
            range,
            width = width
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  set <attribute> <value>   e.g. 'set alcohol 12,5' or 'set fixed_acidity 7.4'");
    println!("  show                      list current measurements and valid ranges");
    println!("  analyze                   predict quality and show the analysis");
    println!("  reset                     restore default measurements");
    println!("  quit                      leave");
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuvee_core::rules::builtin;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            parse_command("set alcohol 12,5").unwrap(),
            Command::Set(Attribute::Alcohol, dec!(12.5))
        );
        assert_eq!(
            parse_command("  SET free-sulfur-dioxide 35\n").unwrap(),
            Command::Set(Attribute::FreeSulfurDioxide, dec!(35))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("set alcohol").is_err());
        assert!(parse_command("set tannin 3").is_err());
        assert!(parse_command("set ph acid").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("analyze").unwrap(), Command::Analyze);
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
        assert_eq!(parse_command("   ").unwrap(), Command::Nothing);
    }

    #[test]
    fn test_check_value_enforces_form_limits() {
        let reference = builtin::reference_table().unwrap();
        assert!(check_value(&reference, Attribute::Alcohol, dec!(8.4)).is_ok());
        assert!(check_value(&reference, Attribute::Alcohol, dec!(15)).is_err());
        assert!(check_value(&reference, Attribute::FreeSulfurDioxide, dec!(30.5)).is_err());
    }
}
