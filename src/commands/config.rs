use agenda_core::config::AgendaConfig;
use agenda_core::notify::Permission;
use anyhow::Result;
use owo_colors::OwoColorize;

pub fn run(config: &AgendaConfig) -> Result<()> {
    let config_path = AgendaConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Events:     {}", config.data_path().display());

    println!();
    println!("{}", "Settings".bold());
    println!("  Reminder check:  every {}", config.reminder_interval);
    println!("  Weekday names:   {:?}", config.weekday_names);
    println!(
        "  Notifications:   {}",
        match config.notifications {
            Permission::Granted => "granted".green().to_string(),
            Permission::Denied => "denied".red().to_string(),
            Permission::Default => "not asked yet".dimmed().to_string(),
        }
    );

    Ok(())
}
