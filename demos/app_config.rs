use serde_json::json;
use sovran_deepset::{get, set, set_with, ElementKind, SetError, SetOptions, TypedArray, Value};

fn main() -> Result<(), SetError> {
    // Start from whatever the user configured
    let mut config = Value::from(json!({
        "server": {"port": 9000},
        "features": ["search"]
    }));

    // User values win over defaults
    let defaults = SetOptions::default().with_overwrite(false);
    let port = set_with(&mut config, ["server", "port"], 8080, &defaults)?;
    let host = set_with(&mut config, ["server", "host"], "0.0.0.0", &defaults)?;
    println!("Using {}:{}", host.as_str().unwrap_or("?"), port.to_number());

    // Deep writes create the records they need
    set(&mut config, ["logging", "targets", "stderr", "level"], "info")?;

    // Arrays grow when written past their end
    set(&mut config, vec!["features", "2"], "export")?;

    // Tags are kept in a set, replaced by position
    set(&mut config, "tags", Value::set_of(["alpha", "beta", "gamma"]))?;
    set(&mut config, ["tags", "1"], "stable")?;

    // A fixed-width palette, coerced on every write
    set(&mut config, "palette", TypedArray::new(ElementKind::Uint8Clamped, 3))?;
    set(&mut config, ["palette", "0"], 300)?;
    set(&mut config, ["palette", "1"], 127.5)?;

    // Writing through a leaf is refused
    match set(&mut config, ["server", "port", "number"], 1) {
        Ok(_) => println!("This shouldn't happen"),
        Err(e) => println!("Refused: {}", e),
    }

    if let Some(level) = get(&config, ["logging", "targets", "stderr", "level"]) {
        println!("stderr level: {:?}", level.as_str());
    }

    let rendered = serde_json::Value::from(&config);
    match serde_json::to_string_pretty(&rendered) {
        Ok(text) => println!("{}", text),
        Err(e) => println!("Failed to render config: {}", e),
    }

    Ok(())
}
