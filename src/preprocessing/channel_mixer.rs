//! Channel mixing utilities (multichannel to mono conversion)

use serde::{Deserialize, Serialize};

/// Channel mixing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChannelMixMode {
    /// Keep the first channel only
    #[default]
    First,
    /// Simple average of all channels
    Average,
}

/// Reduce planar channel data to mono
///
/// # Arguments
///
/// * `channels` - One slice per channel, all of the same length
/// * `mode` - Mixing mode
///
/// # Returns
///
/// Mono samples (empty if there are no channels)
pub fn mix_to_mono(channels: &[&[f32]], mode: ChannelMixMode) -> Vec<f32> {
    let Some(first) = channels.first() else {
        return Vec::new();
    };

    if channels.len() == 1 || mode == ChannelMixMode::First {
        return first.to_vec();
    }

    let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let scale = 1.0 / channels.len() as f32;
    (0..frames)
        .map(|i| channels.iter().map(|c| c[i]).sum::<f32>() * scale)
        .collect()
}
