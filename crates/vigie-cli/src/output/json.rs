use serde::Serialize;
use vigie_core::error::VigieError;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), VigieError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
