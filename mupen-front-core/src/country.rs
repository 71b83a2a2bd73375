use serde::{Deserialize, Serialize};

/// Destination code stored at header offset 0x3E.
///
/// The GoodN64 naming convention encodes the release region as a
/// parenthesised tag in the good name (e.g. `"Super Mario 64 (U) [!]"`);
/// [`CountryCode::tag`] returns that tag so database candidates can be
/// narrowed by the ROM's own header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountryCode {
    /// Development cartridge (code 0x00)
    Demo,
    /// Beta release ('7')
    Beta,
    /// Japan + USA ('A')
    JapanUsa,
    /// Brazil ('B')
    Brazil,
    /// China ('C')
    China,
    /// Germany ('D')
    Germany,
    /// North America ('E')
    Usa,
    /// France ('F')
    France,
    /// Netherlands ('H')
    Netherlands,
    /// Italy ('I')
    Italy,
    /// Japan ('J')
    Japan,
    /// Korea ('K')
    Korea,
    /// Canada ('N')
    Canada,
    /// Europe ('P', 'W', 'X', 'Y')
    Europe,
    /// Spain ('S')
    Spain,
    /// Australia ('U')
    Australia,
    /// Anything else
    #[default]
    Unknown,
}

impl CountryCode {
    /// Decode the header destination byte.
    pub fn from_byte(code: u8) -> Self {
        match code {
            0x00 => Self::Demo,
            b'7' => Self::Beta,
            b'A' => Self::JapanUsa,
            b'B' => Self::Brazil,
            b'C' => Self::China,
            b'D' => Self::Germany,
            b'E' => Self::Usa,
            b'F' => Self::France,
            b'H' => Self::Netherlands,
            b'I' => Self::Italy,
            b'J' => Self::Japan,
            b'K' => Self::Korea,
            b'N' => Self::Canada,
            b'P' | b'W' | b'X' | b'Y' => Self::Europe,
            b'S' => Self::Spain,
            b'U' => Self::Australia,
            _ => Self::Unknown,
        }
    }

    /// GoodN64 region tag used inside good names.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Demo => "(Demo)",
            Self::Beta => "(Beta)",
            Self::JapanUsa => "(JU)",
            Self::Brazil => "(B)",
            Self::China => "(C)",
            Self::Germany => "(G)",
            Self::Usa | Self::Canada => "(U)",
            Self::France => "(F)",
            Self::Netherlands => "(H)",
            Self::Italy => "(I)",
            Self::Japan => "(J)",
            Self::Korea => "(K)",
            Self::Europe => "(E)",
            Self::Spain => "(S)",
            Self::Australia => "(A)",
            Self::Unknown => "(Unknown)",
        }
    }

    /// Human-readable region name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Demo => "Demo",
            Self::Beta => "Beta",
            Self::JapanUsa => "Japan/USA",
            Self::Brazil => "Brazil",
            Self::China => "China",
            Self::Germany => "Germany",
            Self::Usa => "USA",
            Self::France => "France",
            Self::Netherlands => "Netherlands",
            Self::Italy => "Italy",
            Self::Japan => "Japan",
            Self::Korea => "Korea",
            Self::Canada => "Canada",
            Self::Europe => "Europe",
            Self::Spain => "Spain",
            Self::Australia => "Australia",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
#[path = "tests/country_tests.rs"]
mod tests;
