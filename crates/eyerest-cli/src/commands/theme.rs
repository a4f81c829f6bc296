use clap::Args;
use eyerest_core::{FilePreferences, PreferenceStore, ThemePreference};

#[derive(Args)]
pub struct ThemeArgs {
    /// New theme: system, dark or light. Prints the current one if omitted.
    pub theme: Option<ThemePreference>,
}

pub fn run(args: ThemeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut prefs = FilePreferences::open()?;
    if let Some(theme) = args.theme {
        prefs.set_theme(theme)?;
    }
    println!("{}", prefs.theme());
    Ok(())
}
