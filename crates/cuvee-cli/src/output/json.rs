use cuvee_core::error::CuveeError;
use cuvee_core::Evaluation;

pub fn print(evaluation: &Evaluation) -> Result<(), CuveeError> {
    let json = serde_json::to_string_pretty(evaluation)?;
    println!("{json}");
    Ok(())
}
