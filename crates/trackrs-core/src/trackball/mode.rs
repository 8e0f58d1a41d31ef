// Trackrs Track Modes
// The four fixed encodings the trackball can report in

use strum_macros::{Display, EnumCount, EnumIter, EnumString};

/// Output encoding of trackball motion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumCount, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum TrackMode {
    /// Mouse cursor deltas
    #[default]
    #[strum(to_string = "cursor", serialize = "mouse")]
    Cursor,
    /// Arrow key taps
    #[strum(to_string = "caret", serialize = "carret", serialize = "arrows")]
    Caret,
    /// Scroll wheel deltas
    #[strum(to_string = "scroll", serialize = "wheel")]
    Scroll,
    /// Brightness (horizontal) and volume (vertical) key taps
    #[strum(to_string = "media", serialize = "sound", serialize = "brightness")]
    Media,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_mode_parse_aliases() {
        assert_eq!("Cursor".parse::<TrackMode>(), Ok(TrackMode::Cursor));
        assert_eq!("carret".parse::<TrackMode>(), Ok(TrackMode::Caret));
        assert_eq!("WHEEL".parse::<TrackMode>(), Ok(TrackMode::Scroll));
        assert_eq!("sound".parse::<TrackMode>(), Ok(TrackMode::Media));
        assert!("joystick".parse::<TrackMode>().is_err());
    }

    #[test]
    fn test_track_mode_display() {
        assert_eq!(TrackMode::Caret.to_string(), "caret");
        assert_eq!(TrackMode::default(), TrackMode::Cursor);
    }
}
