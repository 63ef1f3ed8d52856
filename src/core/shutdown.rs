//! # Cross-platform termination signals.
//!
//! [`Signal`] names a platform-conventional termination request and
//! [`SignalListener`] waits for any signal of a caller-chosen set.
//!
//! Listeners are installed eagerly by [`SignalListener::install`]: a signal
//! delivered after installation is remembered even if nobody is awaiting
//! [`SignalListener::recv`] yet.
//!
//! ## Signals
//! **Unix platforms:**
//! - [`Signal::Interrupt`] → `SIGINT` (Ctrl-C in terminal)
//! - [`Signal::Terminate`] → `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - [`Signal::Quit`] → `SIGQUIT`
//! - [`Signal::Hangup`] → `SIGHUP`
//!
//! **Other platforms:**
//! - [`Signal::Interrupt`] via [`tokio::signal::ctrl_c`]; the others are ignored.

use std::fmt;

/// A termination request delivered by the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Interrupt,
    Terminate,
    Quit,
    Hangup,
}

impl Signal {
    /// Signals observed when the caller does not choose: interrupt and terminate.
    pub const fn default_set() -> &'static [Signal] {
        &[Signal::Interrupt, Signal::Terminate]
    }

    /// Conventional Unix name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Quit => "SIGQUIT",
            Signal::Hangup => "SIGHUP",
        }
    }

    #[cfg(unix)]
    fn kind(&self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::Quit => SignalKind::quit(),
            Signal::Hangup => SignalKind::hangup(),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Installed listeners for a set of termination signals.
///
/// An empty set never fires.
#[cfg(unix)]
pub struct SignalListener {
    streams: Vec<(Signal, tokio::signal::unix::Signal)>,
}

#[cfg(unix)]
impl SignalListener {
    /// Installs one listener per distinct signal.
    ///
    /// Returns `Err` if the OS refuses a registration. Must be called within a
    /// tokio runtime.
    pub fn install(signals: &[Signal]) -> std::io::Result<Self> {
        let mut streams: Vec<(Signal, tokio::signal::unix::Signal)> =
            Vec::with_capacity(signals.len());
        for &sig in signals {
            if streams.iter().any(|(s, _)| *s == sig) {
                continue;
            }
            streams.push((sig, tokio::signal::unix::signal(sig.kind())?));
        }
        Ok(Self { streams })
    }

    /// Waits until any installed signal arrives and returns it.
    pub async fn recv(&mut self) -> Signal {
        if self.streams.is_empty() {
            return std::future::pending().await;
        }
        let waits = self.streams.iter_mut().map(|(sig, stream)| {
            let sig = *sig;
            Box::pin(async move {
                // `None` only if the driver is gone; treat it as a request to stop.
                let _ = stream.recv().await;
                sig
            })
        });
        let (sig, _, _) = futures::future::select_all(waits).await;
        sig
    }

    /// Signals this listener reacts to.
    pub fn signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.streams.iter().map(|(s, _)| *s)
    }
}

/// Installed listeners for a set of termination signals.
///
/// Only [`Signal::Interrupt`] is observable here. A set without it never fires.
#[cfg(not(unix))]
pub struct SignalListener {
    interrupt: bool,
}

#[cfg(not(unix))]
impl SignalListener {
    /// Records whether Ctrl-C should be observed.
    pub fn install(signals: &[Signal]) -> std::io::Result<Self> {
        Ok(Self {
            interrupt: signals.contains(&Signal::Interrupt),
        })
    }

    /// Waits until Ctrl-C arrives.
    pub async fn recv(&mut self) -> Signal {
        if !self.interrupt {
            return std::future::pending().await;
        }
        match tokio::signal::ctrl_c().await {
            Ok(()) => Signal::Interrupt,
            Err(_) => std::future::pending().await,
        }
    }

    /// Signals this listener reacts to.
    pub fn signals(&self) -> impl Iterator<Item = Signal> + '_ {
        self.interrupt.then_some(Signal::Interrupt).into_iter()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn empty_set_never_fires() {
        let mut listener = SignalListener::install(&[]).unwrap();
        assert_eq!(listener.signals().count(), 0);
        let waited = tokio::time::timeout(Duration::from_millis(20), listener.recv()).await;
        assert!(waited.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn duplicate_signals_install_once() {
        let listener =
            SignalListener::install(&[Signal::Hangup, Signal::Hangup, Signal::Quit]).unwrap();
        let installed: Vec<Signal> = listener.signals().collect();
        assert_eq!(installed, vec![Signal::Hangup, Signal::Quit]);
    }

    #[test]
    fn display_uses_unix_names() {
        assert_eq!(Signal::Terminate.to_string(), "SIGTERM");
        assert_eq!(Signal::default_set(), &[Signal::Interrupt, Signal::Terminate]);
    }
}
