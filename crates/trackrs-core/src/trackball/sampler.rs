// Trackrs Sensor Sampler
// Pulls one motion sample per tick into the trackball state

use super::TrackballState;
use crate::platform::{MotionSensor, SplitRole};

/// Read one sample from the sensor into `state.instant`.
///
/// In integration mode the sample is added to the running sum, otherwise it
/// replaces the previous one. Only the primary half samples; returns whether
/// a sample was taken.
pub fn sample<P>(state: &mut TrackballState, platform: &mut P) -> bool
where
    P: MotionSensor + SplitRole + ?Sized,
{
    if !platform.is_primary() {
        return false;
    }

    let motion = platform.read_motion();
    if state.integration {
        state.instant = state.instant.saturating_add(motion);
    } else {
        state.instant = motion;
    }

    if !motion.is_zero() {
        log::trace!("sampled {} -> instant {}", motion, state.instant);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RecordingPlatform;
    use crate::trackball::Motion;

    #[test]
    fn test_sample_overwrites_without_integration() {
        let mut platform = RecordingPlatform::new();
        platform.push_motion(Motion::new(3, -1));
        platform.push_motion(Motion::new(2, 2));

        let mut state = TrackballState::new();
        assert!(sample(&mut state, &mut platform));
        assert!(sample(&mut state, &mut platform));
        assert_eq!(state.instant, Motion::new(2, 2));
    }

    #[test]
    fn test_sample_accumulates_with_integration() {
        let mut platform = RecordingPlatform::new();
        platform.push_motion(Motion::new(3, -1));
        platform.push_motion(Motion::new(2, 2));

        let mut state = TrackballState {
            integration: true,
            ..TrackballState::default()
        };
        sample(&mut state, &mut platform);
        sample(&mut state, &mut platform);
        assert_eq!(state.instant, Motion::new(5, 1));
    }

    #[test]
    fn test_secondary_half_does_not_sample() {
        let mut platform = RecordingPlatform::new();
        platform.set_primary(false);
        platform.push_motion(Motion::new(9, 9));

        let mut state = TrackballState::new();
        assert!(!sample(&mut state, &mut platform));
        assert!(state.instant.is_zero());
        assert_eq!(platform.pending_motion(), 1);
    }

    #[test]
    fn test_empty_sensor_reads_zero() {
        let mut platform = RecordingPlatform::new();
        let mut state = TrackballState {
            instant: Motion::new(4, 4),
            ..TrackballState::default()
        };
        sample(&mut state, &mut platform);
        assert!(state.instant.is_zero());
    }
}
