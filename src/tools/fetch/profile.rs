/// Fetch Profiles
///
/// Each profile pairs a platform with its usual browser so the User-Agent and
/// client hints stay consistent:
/// - `Windows` → Chrome
/// - `MacOS` → Safari
/// - `IOS` → Safari
/// - `Android` → Chrome
/// - `Minimal` → bare Mozilla UA, no client hints
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchProfile {
    Minimal,
    #[default]
    Windows,
    MacOS,
    IOS,
    Android,
}

impl FetchProfile {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Minimal => "Minimal",
            Self::Windows => "Windows (Chrome)",
            Self::MacOS => "macOS (Safari)",
            Self::IOS => "iOS (Safari)",
            Self::Android => "Android (Chrome)",
        }
    }
}
