use inquire::{CustomType, Text};
use meteo_core::Config;

/// Walk through the editable settings and save them.
pub fn run() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let language = Text::new("Language for city search results:")
        .with_default(&config.language)
        .with_help_message("Two-letter code, e.g. en, pt, de")
        .prompt()?;
    if !language.trim().is_empty() {
        config.language = language.trim().to_lowercase();
    }

    let city = Text::new("Default city (leave empty for none):")
        .with_default(config.default_city.as_deref().unwrap_or(""))
        .prompt()?;
    config.set_default_city(Some(city));

    let minutes = CustomType::<u64>::new("Auto-refresh interval in minutes:")
        .with_default((config.refresh_interval_secs / 60).max(1))
        .with_error_message("Please enter a whole number of minutes")
        .prompt()?;
    config.refresh_interval_secs = minutes_to_secs(minutes);

    config.timeout_secs = CustomType::<u64>::new("Request timeout in seconds:")
        .with_default(config.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?
        .max(1);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// At least one minute; huge inputs saturate instead of overflowing.
fn minutes_to_secs(minutes: u64) -> u64 {
    minutes.max(1).saturating_mul(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_minutes_convert_to_seconds() {
        assert_eq!(minutes_to_secs(0), 60);
        assert_eq!(minutes_to_secs(15), 900);
        assert_eq!(minutes_to_secs(u64::MAX), u64::MAX);
    }
}
