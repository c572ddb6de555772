use extrato_core::error::ExtractError;
use extrato_core::model::RecordSet;

pub fn print(records: &RecordSet) -> Result<(), ExtractError> {
    let json = serde_json::to_string_pretty(&records.records)?;
    println!("{json}");
    Ok(())
}
