use std::path::PathBuf;

use jeda_core::util::is_http_url;

use crate::cli::ConfigCommands;
use crate::commands::common::resolve_settings_path;
use crate::config_profiles::{normalize_text_option, CliProfile, CliProfilesConfig, API_BASE_URL_ENV};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            settings_path,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            api_base_url,
            settings_path,
            no_activate,
        ),
        ConfigCommands::Show { profile } => run_config_show(profile.as_deref().or(global_profile)),
    }
}

pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    settings_path: Option<PathBuf>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged_api_base_url = normalize_text_option(api_base_url)
        .or_else(|| normalize_text_option(std::env::var(API_BASE_URL_ENV).ok()))
        .or_else(|| existing_profile.api_base_url());

    let profile = config.profile_mut_or_default(&profile_name);
    if let Some(value) = merged_api_base_url {
        profile.api_base_url = Some(value);
    }
    if let Some(path) = settings_path {
        profile.settings_path = Some(path);
    }

    validate_profile(profile)?;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let has_api = config
        .profile(&profile_name)
        .and_then(CliProfile::api_base_url)
        .is_some();
    if has_api {
        println!("Profile '{profile_name}' is ready. Run `jeda auth login` to sync settings.");
    } else {
        println!("Profile '{profile_name}' is missing: api_base_url (settings stay local)");
    }

    Ok(())
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let settings_path = resolve_settings_path(None, &profile)?;
    let env_api_base_url = normalize_text_option(std::env::var(API_BASE_URL_ENV).ok());

    println!("profile        {profile_name}");
    match (env_api_base_url, profile.api_base_url()) {
        (Some(url), _) => println!("api_base_url   {url} (from {API_BASE_URL_ENV})"),
        (None, Some(url)) => println!("api_base_url   {url}"),
        (None, None) => println!("api_base_url   (not set)"),
    }
    println!("settings_path  {}", settings_path.display());
    Ok(())
}

pub fn validate_profile(profile: &CliProfile) -> Result<(), CliError> {
    if let Some(url) = profile.api_base_url() {
        if !is_http_url(&url) {
            return Err(CliError::Config(
                "api_base_url must include http:// or https://".to_string(),
            ));
        }
    }
    if profile
        .settings_path
        .as_ref()
        .is_some_and(|path| path.is_dir())
    {
        return Err(CliError::Config(
            "settings_path must point to a file, not a directory".to_string(),
        ));
    }
    Ok(())
}
