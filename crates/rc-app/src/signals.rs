//! User-facing notifications raised by the session.

use std::fmt;

use rc_core::ComponentKind;

/// Something the front end should tell the learner about.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    ConnectionAccepted {
        source: ComponentKind,
        dest: ComponentKind,
    },
    ConnectionRejected {
        source: ComponentKind,
        dest: ComponentKind,
    },
    LifeLost {
        remaining: u8,
    },
    GameOver,
    ConfigurationSucceeded {
        reconfigured: bool,
        message: Option<String>,
    },
    ConfigurationFailed {
        message: String,
    },
}

impl Signal {
    /// Whether the front end should present this as an error.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Signal::ConnectionRejected { .. }
                | Signal::LifeLost { .. }
                | Signal::GameOver
                | Signal::ConfigurationFailed { .. }
        )
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::ConnectionAccepted { source, dest } => {
                write!(f, "Connected {source} -> {dest}")
            }
            Signal::ConnectionRejected { source, dest } => {
                write!(f, "Incorrect connection: {source} cannot feed {dest}")
            }
            Signal::LifeLost { remaining } => write!(f, "Lives left: {remaining}"),
            Signal::GameOver => f.write_str("Game over! All lives lost. Reset to try again."),
            Signal::ConfigurationSucceeded {
                reconfigured,
                message,
            } => {
                let verb = if *reconfigured {
                    "Reconfiguration"
                } else {
                    "Configuration"
                };
                match message {
                    Some(m) => write!(f, "{verb} successful: {m}"),
                    None => write!(f, "{verb} successful"),
                }
            }
            Signal::ConfigurationFailed { message } => write!(f, "Configuration failed: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_severity() {
        let s = Signal::ConfigurationSucceeded {
            reconfigured: true,
            message: None,
        };
        assert_eq!(s.to_string(), "Reconfiguration successful");
        assert!(!s.is_error());

        let s = Signal::LifeLost { remaining: 2 };
        assert_eq!(s.to_string(), "Lives left: 2");
        assert!(s.is_error());
    }
}
