//! Decides when the shadow map has to be re-rendered.
//!
//! The camera and light are fixed for the whole run, so by default the depth
//! pass runs once and its result is reused by every lit frame.

/// How often the shadow pass runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShadowPolicy {
    /// Render once, then only after [`ShadowSchedule::invalidate`]
    #[default]
    Once,
    /// Render before every lit frame
    EveryFrame,
}

/// Tracks whether the shadow map is current.
#[derive(Debug, Clone)]
pub struct ShadowSchedule {
    policy: ShadowPolicy,
    valid: bool,
    render_count: u64,
}

impl ShadowSchedule {
    pub fn new(policy: ShadowPolicy) -> Self {
        Self {
            policy,
            valid: false,
            render_count: 0,
        }
    }

    pub fn needs_render(&self) -> bool {
        match self.policy {
            ShadowPolicy::Once => !self.valid,
            ShadowPolicy::EveryFrame => true,
        }
    }

    pub fn mark_rendered(&mut self) {
        self.valid = true;
        self.render_count += 1;
    }

    /// Forces the next frame to re-render the shadow map
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn policy(&self) -> ShadowPolicy {
        self.policy
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }
}

impl Default for ShadowSchedule {
    fn default() -> Self {
        Self::new(ShadowPolicy::default())
    }
}
