//! Mapping between physical input codes and N64 controls or emulator
//! functions.
//!
//! A map has one slot per mappable command. Each slot holds the input code
//! bound to it (0 = unbound), and an input code is bound to at most one
//! slot. Serialised as `"<enabled>:<code0>,<code1>,...,"`.

use std::collections::HashMap;
use std::fmt;

/// N64 controller buttons, in plugin order.
pub const DPD_R: usize = 0;
pub const DPD_L: usize = 1;
pub const DPD_D: usize = 2;
pub const DPD_U: usize = 3;
pub const START: usize = 4;
pub const BTN_Z: usize = 5;
pub const BTN_B: usize = 6;
pub const BTN_A: usize = 7;
pub const CPD_R: usize = 8;
pub const CPD_L: usize = 9;
pub const CPD_D: usize = 10;
pub const CPD_U: usize = 11;
pub const BTN_R: usize = 12;
pub const BTN_L: usize = 13;
pub const NUM_N64_BUTTONS: usize = 14;

pub const AXIS_R: usize = NUM_N64_BUTTONS;
pub const AXIS_L: usize = NUM_N64_BUTTONS + 1;
pub const AXIS_D: usize = NUM_N64_BUTTONS + 2;
pub const AXIS_U: usize = NUM_N64_BUTTONS + 3;
pub const BTN_RUMBLE: usize = NUM_N64_BUTTONS + 4;
pub const BTN_MEMPAK: usize = NUM_N64_BUTTONS + 5;
pub const NUM_N64_CONTROLS: usize = NUM_N64_BUTTONS + 6;

pub const FUNC_STOP: usize = NUM_N64_CONTROLS;
pub const FUNC_FULLSCREEN: usize = NUM_N64_CONTROLS + 1;
pub const FUNC_SAVESTATE: usize = NUM_N64_CONTROLS + 2;
pub const FUNC_LOADSTATE: usize = NUM_N64_CONTROLS + 3;
pub const FUNC_INCSLOT: usize = NUM_N64_CONTROLS + 4;
pub const FUNC_RESET: usize = NUM_N64_CONTROLS + 5;
pub const FUNC_SPEEDUP: usize = NUM_N64_CONTROLS + 6;
pub const FUNC_SPEEDDOWN: usize = NUM_N64_CONTROLS + 7;
pub const FUNC_SCREENSHOT: usize = NUM_N64_CONTROLS + 8;
pub const FUNC_PAUSE: usize = NUM_N64_CONTROLS + 9;
pub const FUNC_MUTE: usize = NUM_N64_CONTROLS + 10;
pub const FUNC_VOLUP: usize = NUM_N64_CONTROLS + 11;
pub const FUNC_VOLDOWN: usize = NUM_N64_CONTROLS + 12;
pub const FUNC_FFWD: usize = NUM_N64_CONTROLS + 13;
pub const FUNC_FRAMEADV: usize = NUM_N64_CONTROLS + 14;
pub const FUNC_GAMESHARK: usize = NUM_N64_CONTROLS + 15;
pub const NUM_MAPPABLES: usize = NUM_N64_CONTROLS + 16;

const SLOT_NAMES: [&str; NUM_MAPPABLES] = [
    "D-Pad Right",
    "D-Pad Left",
    "D-Pad Down",
    "D-Pad Up",
    "Start",
    "Z",
    "B",
    "A",
    "C-Right",
    "C-Left",
    "C-Down",
    "C-Up",
    "R",
    "L",
    "Analog Right",
    "Analog Left",
    "Analog Down",
    "Analog Up",
    "Rumble Pak",
    "Controller Pak",
    "Stop",
    "Fullscreen",
    "Save State",
    "Load State",
    "Next Slot",
    "Reset",
    "Speed Up",
    "Speed Down",
    "Screenshot",
    "Pause",
    "Mute",
    "Volume Up",
    "Volume Down",
    "Fast Forward",
    "Frame Advance",
    "GameShark",
];

/// Display name of a slot, or `None` when out of range.
pub fn slot_name(slot: usize) -> Option<&'static str> {
    SLOT_NAMES.get(slot).copied()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputMap {
    enabled: bool,
    slot_to_code: [i32; NUM_MAPPABLES],
    code_to_slot: HashMap<i32, usize>,
}

impl Default for InputMap {
    fn default() -> Self {
        Self {
            enabled: false,
            slot_to_code: [0; NUM_MAPPABLES],
            code_to_slot: HashMap::new(),
        }
    }
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialised map. Missing or garbled entries are unbound; a
    /// missing `enabled:` prefix means disabled.
    pub fn deserialize(s: &str) -> Self {
        let mut map = Self::new();
        let groups: Vec<&str> = s.split(':').collect();
        let codes = if groups.len() > 1 {
            map.enabled = groups[0].trim().eq_ignore_ascii_case("true");
            groups[1]
        } else {
            s
        };
        for (slot, entry) in codes.split(',').take(NUM_MAPPABLES).enumerate() {
            map.map(slot, entry.trim().parse().unwrap_or(0));
        }
        map
    }

    pub fn serialize(&self) -> String {
        let mut out = format!("{}:", self.enabled);
        for code in &self.slot_to_code {
            out.push_str(&code.to_string());
            out.push(',');
        }
        out
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Slot bound to an input code.
    pub fn get(&self, code: i32) -> Option<usize> {
        self.code_to_slot.get(&code).copied()
    }

    /// Input code bound to a slot (0 when unbound or out of range).
    pub fn code_for(&self, slot: usize) -> i32 {
        self.slot_to_code.get(slot).copied().unwrap_or(0)
    }

    /// Codes for every slot, in slot order.
    pub fn mapped_codes(&self) -> &[i32; NUM_MAPPABLES] {
        &self.slot_to_code
    }

    /// Bind `code` to `slot`, releasing whatever slot `code` held and
    /// whatever code `slot` held. Code 0 unbinds the slot. Out-of-range
    /// slots are ignored.
    pub fn map(&mut self, slot: usize, code: i32) {
        if slot >= NUM_MAPPABLES {
            return;
        }
        if code != 0 {
            if let Some(old_slot) = self.code_to_slot.remove(&code) {
                self.slot_to_code[old_slot] = 0;
            }
        }
        let old_code = self.slot_to_code[slot];
        if old_code != 0 {
            self.code_to_slot.remove(&old_code);
        }
        self.slot_to_code[slot] = code;
        if code != 0 {
            self.code_to_slot.insert(code, slot);
        }
    }

    pub fn unmap(&mut self, slot: usize) {
        self.map(slot, 0);
    }

    /// Bound `(slot, code)` pairs in slot order.
    pub fn bindings(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.slot_to_code
            .iter()
            .enumerate()
            .filter(|(_, code)| **code != 0)
            .map(|(slot, code)| (slot, *code))
    }
}

impl fmt::Display for InputMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

#[cfg(test)]
#[path = "tests/input_map_tests.rs"]
mod tests;
