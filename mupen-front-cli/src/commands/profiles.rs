use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use mupen_front_lib::{LibError, Profile, ProfileKind, ProfileStore};

use crate::CliError;
use crate::commands::{Context, print_json};

fn open_store(ctx: &Context, kind: ProfileKind) -> ProfileStore {
    let files = ctx.settings.paths.profiles(kind);
    log::debug!(
        "{kind} profiles: custom {}, built-in {}",
        files.custom.display(),
        files.builtin.display()
    );
    ProfileStore::open(kind, files)
}

fn origin(profile: &Profile) -> &'static str {
    if profile.is_builtin() {
        "built-in"
    } else {
        "custom"
    }
}

fn profile_json(profile: &Profile) -> serde_json::Value {
    let settings: serde_json::Map<String, serde_json::Value> = profile
        .iter()
        .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
        .collect();
    serde_json::json!({
        "name": profile.name(),
        "builtin": profile.is_builtin(),
        "comment": profile.comment(),
        "settings": settings,
    })
}

pub(crate) fn run_profiles_list(ctx: &Context, kind: ProfileKind) -> Result<(), CliError> {
    let profiles = open_store(ctx, kind).list();
    if ctx.json {
        let values: Vec<_> = profiles.iter().map(profile_json).collect();
        return print_json(&values);
    }

    if profiles.is_empty() {
        log::info!("No {kind} profiles found");
        return Ok(());
    }
    let default_name = ctx.settings.defaults.profile(kind);
    for p in &profiles {
        let marker = if p.name() == default_name { "*" } else { " " };
        log::info!(
            "{marker} {} {}{}",
            p.name().if_supports_color(Stdout, |t| t.bold()),
            format!("[{}]", origin(p)).if_supports_color(Stdout, |t| t.dimmed()),
            p.comment().map(|c| format!(" {c}")).unwrap_or_default(),
        );
    }
    Ok(())
}

pub(crate) fn run_profiles_show(ctx: &Context, kind: ProfileKind, name: &str) -> Result<(), CliError> {
    let profile = open_store(ctx, kind)
        .find(name)
        .ok_or_else(|| LibError::ProfileNotFound(name.to_string()))?;
    if ctx.json {
        return print_json(&profile_json(&profile));
    }
    print_profile(&profile);
    Ok(())
}

pub(crate) fn run_profiles_resolve(
    ctx: &Context,
    kind: ProfileKind,
    selected: Option<&str>,
) -> Result<(), CliError> {
    let store = open_store(ctx, kind);
    let default_name = ctx.settings.defaults.profile(kind);
    let Some(profile) = store.resolve(selected, default_name, kind.app_default()) else {
        return Err(CliError::config(format!(
            "No {kind} profile found (selected: {}, default: {default_name}, app default: {})",
            selected.unwrap_or("none"),
            kind.app_default()
        )));
    };
    if ctx.json {
        return print_json(&profile_json(&profile));
    }
    print_profile(&profile);
    Ok(())
}

fn print_profile(profile: &Profile) {
    log::info!(
        "{} {}",
        profile.name().if_supports_color(Stdout, |t| t.bold()),
        format!("[{}]", origin(profile)).if_supports_color(Stdout, |t| t.dimmed()),
    );
    for (key, value) in profile.iter() {
        log::info!("  {} = {value}", key.if_supports_color(Stdout, |t| t.cyan()));
    }
}
