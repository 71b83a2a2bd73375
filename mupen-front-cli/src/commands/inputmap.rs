use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use mupen_front_lib::InputMap;
use mupen_front_lib::input_map::{NUM_MAPPABLES, slot_name};

use crate::CliError;
use crate::commands::{Context, print_json};

pub(crate) fn run_inputmap_decode(ctx: &Context, serialized: &str) -> Result<(), CliError> {
    let map = InputMap::deserialize(serialized);

    if ctx.json {
        let bindings: Vec<_> = map
            .bindings()
            .map(|(slot, code)| {
                serde_json::json!({
                    "slot": slot,
                    "name": slot_name(slot),
                    "code": code,
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "enabled": map.is_enabled(),
            "bindings": bindings,
        }));
    }

    log::info!(
        "Enabled: {}",
        if map.is_enabled() {
            "yes".if_supports_color(Stdout, |t| t.green()).to_string()
        } else {
            "no".if_supports_color(Stdout, |t| t.dimmed()).to_string()
        }
    );
    let mut bound = 0;
    for (slot, code) in map.bindings() {
        bound += 1;
        log::info!(
            "  {:<16} {}",
            slot_name(slot).unwrap_or("?"),
            code.if_supports_color(Stdout, |t| t.cyan())
        );
    }
    log::info!("{bound} of {NUM_MAPPABLES} slots bound");
    Ok(())
}
