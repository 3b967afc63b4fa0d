use std::sync::atomic::{AtomicU8, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::params::{ParamId, ParamScale};
use crate::telemetry::Axis;

/// Parameters that can be driven by a sensor axis.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappableParam {
    EqCutoff,
    EqQ,
    Drive,
    Anger,
    HpfCutoff,
    LpfCutoff,
    OutputGain,
    Mix,
    DelayFeedback,
    DelayTime,
}

impl MappableParam {
    pub const ALL: [MappableParam; 10] = [
        MappableParam::EqCutoff,
        MappableParam::EqQ,
        MappableParam::Drive,
        MappableParam::Anger,
        MappableParam::HpfCutoff,
        MappableParam::LpfCutoff,
        MappableParam::OutputGain,
        MappableParam::Mix,
        MappableParam::DelayFeedback,
        MappableParam::DelayTime,
    ];

    pub fn param_id(self) -> ParamId {
        match self {
            MappableParam::EqCutoff => ParamId::EqCutoff,
            MappableParam::EqQ => ParamId::EqQ,
            MappableParam::Drive => ParamId::Drive,
            MappableParam::Anger => ParamId::Anger,
            MappableParam::HpfCutoff => ParamId::HpfCutoff,
            MappableParam::LpfCutoff => ParamId::LpfCutoff,
            MappableParam::OutputGain => ParamId::OutputGainDb,
            MappableParam::Mix => ParamId::Mix,
            MappableParam::DelayFeedback => ParamId::DelayFeedback,
            MappableParam::DelayTime => ParamId::DelayTimeMs,
        }
    }

    /// Frequency controls get a logarithmic response to telemetry.
    pub fn is_frequency(self) -> bool {
        self.param_id().spec().scale == ParamScale::Frequency
    }

    // 0 is reserved for "unmapped"
    fn to_slot(self) -> u8 {
        self as u8 + 1
    }

    fn from_slot(slot: u8) -> Option<Self> {
        Self::ALL.get(usize::from(slot).checked_sub(1)?).copied()
    }
}

/// Which parameter, if any, each axis drives.
///
/// Written by the UI side, read by the mapping runtime every tick. A
/// parameter is mapped to at most one axis at a time.
#[derive(Debug, Default)]
pub struct MappingTable {
    slots: [AtomicU8; 2],
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `param` to `axis`, removing it from the other axis if it was there.
    pub fn assign(&self, axis: Axis, param: MappableParam) {
        let slot = param.to_slot();
        for other in Axis::ALL {
            if other != axis {
                let _ = self.slots[other.index()].compare_exchange(slot, 0, Ordering::AcqRel, Ordering::Acquire);
            }
        }
        self.slots[axis.index()].store(slot, Ordering::Release);
        log::debug!("mapped {:?} to {:?} axis", param, axis);
    }

    pub fn clear(&self, axis: Axis) {
        self.slots[axis.index()].store(0, Ordering::Release);
    }

    pub fn get(&self, axis: Axis) -> Option<MappableParam> {
        MappableParam::from_slot(self.slots[axis.index()].load(Ordering::Acquire))
    }

    pub fn axis_of(&self, param: MappableParam) -> Option<Axis> {
        Axis::ALL.into_iter().find(|&axis| self.get(axis) == Some(param))
    }
}
