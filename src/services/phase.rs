use std::fmt;

/// One coordinated pass over all registered services.
///
/// `Init`, `Start` and `Notify` walk the registry in registration order,
/// `Stop` walks it in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Init,
    Start,
    Notify,
    Stop,
}

impl Phase {
    /// Lowercase name, stable for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Start => "start",
            Phase::Notify => "notify",
            Phase::Stop => "stop",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
