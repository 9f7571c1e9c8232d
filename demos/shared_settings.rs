use sovran_deepset::{set, SetError, SetOptions, SharedValue, Value};
use std::thread;

struct PluginLoader {
    settings: SharedValue,
}

impl PluginLoader {
    fn new(settings: SharedValue) -> Self {
        Self { settings }
    }

    fn register(&self, name: &str, version: &str) -> Result<(), SetError> {
        self.settings
            .set(vec!["plugins".to_string(), name.to_string(), "version".to_string()], version)?;
        Ok(())
    }
}

struct ThemeService {
    settings: SharedValue,
}

impl ThemeService {
    fn new(settings: SharedValue) -> Self {
        Self { settings }
    }

    /// Claims the theme only if nobody has set one yet
    fn propose(&self, theme: &str) -> Result<Value, SetError> {
        let options = SetOptions::default().with_overwrite(false);
        self.settings.set_with(["ui", "theme"], theme, &options)
    }
}

fn main() -> Result<(), SetError> {
    let settings = SharedValue::new(Value::record());

    let loaders: Vec<_> = ["search", "export", "sync"]
        .into_iter()
        .map(|name| {
            let loader = PluginLoader::new(settings.clone());
            thread::spawn(move || loader.register(name, "1.0.0"))
        })
        .collect();

    let themes: Vec<_> = ["dark", "light"]
        .into_iter()
        .map(|theme| {
            let service = ThemeService::new(settings.clone());
            thread::spawn(move || service.propose(theme))
        })
        .collect();

    for handle in loaders {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => println!("A plugin loader panicked"),
        }
    }
    for handle in themes {
        match handle.join() {
            Ok(result) => println!("Theme in effect: {:?}", result?.as_str()),
            Err(_) => println!("A theme service panicked"),
        }
    }

    // Several writes that must land together
    settings.with_mut(|root| -> Result<(), SetError> {
        set(root, ["window", "width"], 1280)?;
        set(root, ["window", "height"], 800)?;
        Ok(())
    })??;

    let snapshot = settings.snapshot()?;
    match serde_json::to_string_pretty(&serde_json::Value::from(&snapshot)) {
        Ok(text) => println!("{}", text),
        Err(e) => println!("Failed to render settings: {}", e),
    }

    Ok(())
}
