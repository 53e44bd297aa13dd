use crate::types::LifecycleState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: LifecycleState,
    pub to: LifecycleState,
}

/// STRONG/WEAK/EATEN state with the single countdown shared by WEAK and
/// EATEN.
#[derive(Clone, Debug)]
pub struct Lifecycle {
    state: LifecycleState,
    timer: f32,
    duration: f32,
}

impl Lifecycle {
    pub fn new(duration: f32) -> Self {
        Self {
            state: LifecycleState::Strong,
            timer: 0.0,
            duration,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn remaining(&self) -> f32 {
        match self.state {
            LifecycleState::Strong => 0.0,
            _ => self.timer.max(0.0),
        }
    }

    /// STRONG and WEAK ghosts (re)enter WEAK with a full timer. EATEN ghosts
    /// ignore power-ups. Returns whether the call changed anything.
    pub fn make_weak(&mut self) -> bool {
        match self.state {
            LifecycleState::Eaten => false,
            LifecycleState::Strong | LifecycleState::Weak => {
                self.state = LifecycleState::Weak;
                self.timer = self.duration;
                true
            }
        }
    }

    /// Only legal from WEAK.
    pub fn make_eaten(&mut self) -> bool {
        if self.state != LifecycleState::Weak {
            return false;
        }
        self.state = LifecycleState::Eaten;
        self.timer = self.duration;
        true
    }

    pub fn tick(&mut self, dt: f32) -> Option<Transition> {
        if self.state == LifecycleState::Strong {
            return None;
        }
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }
        let from = self.state;
        self.state = LifecycleState::Strong;
        self.timer = 0.0;
        Some(Transition {
            from,
            to: LifecycleState::Strong,
        })
    }
}
