//! Interactive `atmosphere configure`.

use anyhow::Result;
use atmosphere_core::{Config, Coordinates, LocationSource};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Select};

pub fn run() -> Result<()> {
    let mut config = Config::load()?;

    configure_advisor(&mut config)?;
    configure_location(&mut config)?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn configure_advisor(config: &mut Config) -> Result<()> {
    let change = if config.is_advisor_configured() {
        Confirm::new("An advisor API key is already set. Replace it?")
            .with_default(false)
            .prompt()?
    } else {
        true
    };

    if change {
        let key = Password::new("Gemini API key (leave empty to disable the advisor):")
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()?;

        let key = key.trim();
        config.advisor.api_key = (!key.is_empty()).then(|| key.to_string());
    }

    Ok(())
}

fn configure_location(config: &mut Config) -> Result<()> {
    let source = Select::new("Location source:", LocationSource::all().to_vec())
        .with_starting_cursor(starting_cursor(config.location.source))
        .with_help_message("ip: approximate, from your IP address · fixed: coordinates you enter")
        .prompt()?;

    match source {
        LocationSource::Fixed => {
            let latitude = CustomType::<f64>::new("Latitude:")
                .with_error_message("Please enter a number, e.g. 40.71")
                .prompt()?;
            let longitude = CustomType::<f64>::new("Longitude:")
                .with_error_message("Please enter a number, e.g. -74.01")
                .prompt()?;

            config.location.set_fixed(Coordinates::new(latitude, longitude));
        }
        other => config.location.source = other,
    }

    Ok(())
}

fn starting_cursor(current: LocationSource) -> usize {
    LocationSource::all().iter().position(|s| *s == current).unwrap_or(0)
}
