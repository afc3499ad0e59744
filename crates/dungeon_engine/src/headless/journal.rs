//! Record of capability calls made against the headless engine

use crate::events::ListenerKind;
use crate::scene::LightKind;

/// One capability call, reduced to what sequencing checks need
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// Scene load requested
    LoadScene,
    /// Camera control attached
    AttachCameraControl,
    /// Camera control detached
    DetachCameraControl,
    /// Camera collision settings changed
    SetCameraCollision,
    /// Light added
    AddLight(LightKind),
    /// Light disposed
    DisposeLight,
    /// Light intensity changed
    SetLightIntensity,
    /// Mesh shadow receiving toggled
    SetReceiveShadows(String),
    /// Mesh visibility toggled
    SetMeshVisible(String),
    /// Particle system created
    CreateParticleSystem(String),
    /// Particle system started
    StartParticleSystem,
    /// Particle system disposed
    DisposeParticleSystem,
    /// Shadow generator created
    CreateShadowGenerator,
    /// Mesh added to a shadow render list
    AddShadowCaster(String),
    /// Shadow generator disposed
    DisposeShadowGenerator,
    /// Gravity set
    SetGravity,
    /// Collision checking toggled
    SetCollisionsEnabled(bool),
    /// Sound created
    CreateSound(String),
    /// Sound started
    PlaySound(String),
    /// Sound moved
    SetSoundPosition,
    /// Sound disposed
    DisposeSound,
    /// Interval scheduled
    SetInterval,
    /// Interval cancelled
    ClearInterval,
    /// Listener registered
    AddListener(ListenerKind),
    /// Listener removed
    RemoveListener,
    /// Render surface resized
    Resize,
}

/// Append-only call log
#[derive(Debug, Default)]
pub struct Journal {
    calls: Vec<EngineCall>,
}

impl Journal {
    /// Append a call
    pub fn record(&mut self, call: EngineCall) {
        log::trace!("engine call: {call:?}");
        self.calls.push(call);
    }

    /// All calls in order
    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    /// Index of the first call matching `pred`
    pub fn first(&self, pred: impl Fn(&EngineCall) -> bool) -> Option<usize> {
        self.calls.iter().position(pred)
    }

    /// Index of the last call matching `pred`
    pub fn last(&self, pred: impl Fn(&EngineCall) -> bool) -> Option<usize> {
        self.calls.iter().rposition(pred)
    }

    /// Number of calls matching `pred`
    pub fn count(&self, pred: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }
}
