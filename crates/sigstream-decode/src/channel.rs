use serde::Serialize;

use crate::error::{DecodeError, Result};

/// Channel count of the four-input module this protocol instance targets.
pub const DEFAULT_CHANNELS: usize = 4;

/// Scale factor in effect until a calibration frame says otherwise.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.0;

/// Accumulated state of one measurement channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelState {
    signal_id: u16,
    scale_factor: f64,
    samples: Vec<i32>,
}

impl ChannelState {
    pub fn new(signal_id: u16) -> Self {
        Self {
            signal_id,
            scale_factor: DEFAULT_SCALE_FACTOR,
            samples: Vec::new(),
        }
    }

    /// 1-based channel identifier.
    pub fn signal_id(&self) -> u16 {
        self.signal_id
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Raw sign-extended samples in arrival order.
    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    pub fn received_count(&self) -> usize {
        self.samples.len()
    }

    pub fn into_samples(self) -> Vec<i32> {
        self.samples
    }

    pub(crate) fn set_scale_factor(&mut self, scale: f64) {
        self.scale_factor = scale;
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.samples.reserve(additional);
    }

    pub(crate) fn push_sample(&mut self, sample: i32) {
        self.samples.push(sample);
    }
}

/// The full set of channels owned by one decode session.
///
/// Indexed by 1-based `signal_id`. Only the decoders mutate it while the
/// loop runs; afterwards it is handed out by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelSet {
    channels: Vec<ChannelState>,
}

impl ChannelSet {
    /// Create `count` channels with ids `1..=count`.
    ///
    /// Signal ids are 16-bit on the wire, so at most `u16::MAX` channels are
    /// created.
    pub fn new(count: usize) -> Self {
        let channels = (1..=u16::MAX).take(count).map(ChannelState::new).collect();
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn get(&self, signal_id: u16) -> Option<&ChannelState> {
        index_of(signal_id).and_then(|idx| self.channels.get(idx))
    }

    /// Look up a channel by wire `signal_id`, failing on ids outside the set.
    pub(crate) fn channel_mut(&mut self, signal_id: u16) -> Result<&mut ChannelState> {
        let channels = self.channels.len();
        index_of(signal_id)
            .and_then(|idx| self.channels.get_mut(idx))
            .ok_or(DecodeError::UnknownChannel {
                signal_id,
                channels,
            })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChannelState> {
        self.channels.iter()
    }

    /// Per-channel received counts, in channel order.
    pub fn received_counts(&self) -> Vec<usize> {
        self.channels.iter().map(ChannelState::received_count).collect()
    }

    /// Smallest received count across channels (0 for an empty set).
    pub fn min_received(&self) -> usize {
        self.channels
            .iter()
            .map(ChannelState::received_count)
            .min()
            .unwrap_or(0)
    }

    /// True once every channel has reached its target.
    ///
    /// `targets[i]` applies to channel `i + 1`; a missing target counts as 0.
    pub fn is_complete(&self, targets: &[usize]) -> bool {
        self.channels.iter().enumerate().all(|(idx, channel)| {
            channel.received_count() >= targets.get(idx).copied().unwrap_or(0)
        })
    }

    pub fn into_channels(self) -> Vec<ChannelState> {
        self.channels
    }
}

impl<'a> IntoIterator for &'a ChannelSet {
    type Item = &'a ChannelState;
    type IntoIter = std::slice::Iter<'a, ChannelState>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.iter()
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS)
    }
}

fn index_of(signal_id: u16) -> Option<usize> {
    (signal_id as usize).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_set_has_defaults() {
        let set = ChannelSet::default();
        assert_eq!(set.len(), 4);
        for (idx, channel) in set.iter().enumerate() {
            assert_eq!(channel.signal_id() as usize, idx + 1);
            assert_eq!(channel.scale_factor(), 1.0);
            assert_eq!(channel.received_count(), 0);
        }
    }

    #[test]
    fn lookup_is_one_based() {
        let mut set = ChannelSet::new(2);
        assert!(set.get(0).is_none());
        assert_eq!(set.get(2).map(ChannelState::signal_id), Some(2));
        assert!(set.get(3).is_none());

        assert!(matches!(
            set.channel_mut(0),
            Err(DecodeError::UnknownChannel {
                signal_id: 0,
                channels: 2
            })
        ));
        assert!(matches!(
            set.channel_mut(3),
            Err(DecodeError::UnknownChannel { signal_id: 3, .. })
        ));
    }

    #[test]
    fn completion_requires_every_channel() {
        let mut set = ChannelSet::new(2);
        set.channel_mut(1).unwrap().push_sample(5);
        set.channel_mut(1).unwrap().push_sample(6);
        assert_eq!(set.min_received(), 0);
        assert!(!set.is_complete(&[2, 1]));

        set.channel_mut(2).unwrap().push_sample(7);
        assert_eq!(set.received_counts(), vec![2, 1]);
        assert!(set.is_complete(&[2, 1]));
        assert!(!set.is_complete(&[2, 2]));
    }

    #[test]
    fn channel_count_is_capped_at_wire_id_range() {
        let set = ChannelSet::new(usize::from(u16::MAX) + 5);
        assert_eq!(set.len(), usize::from(u16::MAX));
        assert_eq!(set.get(u16::MAX).map(ChannelState::signal_id), Some(u16::MAX));
        assert_eq!(set.iter().next().map(ChannelState::signal_id), Some(1));
    }

    #[test]
    fn channels_move_out_with_their_samples() {
        let mut set = ChannelSet::new(2);
        set.channel_mut(2).unwrap().push_sample(-3);
        set.channel_mut(2).unwrap().push_sample(9);

        let samples: Vec<Vec<i32>> = set
            .into_channels()
            .into_iter()
            .map(ChannelState::into_samples)
            .collect();
        assert_eq!(samples, vec![vec![], vec![-3, 9]]);
    }

    #[test]
    fn zero_targets_are_complete_immediately() {
        let set = ChannelSet::new(4);
        assert!(set.is_complete(&[0, 0, 0, 0]));
        assert!(set.is_complete(&[]));
    }
}
