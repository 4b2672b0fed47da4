//! Built-in IRCC command catalog.
//!
//! Devices that answer `getRemoteCommandList` supply their own catalog; this
//! table is the fallback for devices that do not, covering the commands the
//! SDK itself issues. Codes are the base64 IRCC values common across Bravia
//! generations.

/// Command names the SDK issues on its own behalf.
pub const CMD_WAKE_UP: &str = "WakeUp";
pub const CMD_POWER_OFF: &str = "PowerOff";
pub const CMD_PLAY: &str = "Play";
pub const CMD_PAUSE: &str = "Pause";
pub const CMD_STOP: &str = "Stop";
pub const CMD_NEXT: &str = "Next";
pub const CMD_PREV: &str = "Prev";
pub const CMD_VOLUME_UP: &str = "VolumeUp";
pub const CMD_VOLUME_DOWN: &str = "VolumeDown";
pub const CMD_MUTE: &str = "Mute";

/// Fallback (name, IRCC code) table.
pub const DEFAULT_COMMANDS: &[(&str, &str)] = &[
    (CMD_WAKE_UP, "AAAAAQAAAAEAAAAuAw=="),
    (CMD_POWER_OFF, "AAAAAQAAAAEAAAAvAw=="),
    ("Power", "AAAAAQAAAAEAAAAVAw=="),
    (CMD_PLAY, "AAAAAgAAAJcAAAAaAw=="),
    (CMD_PAUSE, "AAAAAgAAAJcAAAAZAw=="),
    (CMD_STOP, "AAAAAgAAAJcAAAAYAw=="),
    (CMD_NEXT, "AAAAAgAAAJcAAAA9Aw=="),
    (CMD_PREV, "AAAAAgAAAJcAAAA8Aw=="),
    (CMD_VOLUME_UP, "AAAAAQAAAAEAAAASAw=="),
    (CMD_VOLUME_DOWN, "AAAAAQAAAAEAAAATAw=="),
    (CMD_MUTE, "AAAAAQAAAAEAAAAUAw=="),
    ("Home", "AAAAAQAAAAEAAABgAw=="),
    ("Confirm", "AAAAAQAAAAEAAABlAw=="),
];

/// Look up an IRCC code in the fallback table.
pub fn default_code(name: &str) -> Option<&'static str> {
    DEFAULT_COMMANDS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_code_lookup() {
        assert_eq!(default_code("PowerOff"), Some("AAAAAQAAAAEAAAAvAw=="));
        assert_eq!(default_code("VolumeUp"), Some("AAAAAQAAAAEAAAASAw=="));
        assert_eq!(default_code("NoSuchCommand"), None);
    }

    #[test]
    fn test_sdk_commands_have_fallback_codes() {
        for name in [
            CMD_WAKE_UP,
            CMD_POWER_OFF,
            CMD_PLAY,
            CMD_PAUSE,
            CMD_STOP,
            CMD_NEXT,
            CMD_PREV,
            CMD_VOLUME_UP,
            CMD_VOLUME_DOWN,
            CMD_MUTE,
        ] {
            assert!(default_code(name).is_some(), "missing code for {}", name);
        }
    }
}
