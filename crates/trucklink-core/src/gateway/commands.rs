//! Remote commands
//!
//! Defines the commands a vehicle accepts over the remote gateway.

use serde::{Deserialize, Serialize};

/// Remote vehicle commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// Lock the doors
    Lock,

    /// Unlock the doors
    Unlock,

    /// Remote engine start (diesels may pre-warm first)
    Start,

    /// Stop a remotely started engine
    Stop,

    /// Sound the horn
    Honk,
}

impl CommandKind {
    /// Every command, in display order
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Lock,
        CommandKind::Unlock,
        CommandKind::Start,
        CommandKind::Stop,
        CommandKind::Honk,
    ];

    /// Wire/log name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Lock => "lock",
            CommandKind::Unlock => "unlock",
            CommandKind::Start => "start",
            CommandKind::Stop => "stop",
            CommandKind::Honk => "honk",
        }
    }

    /// Message shown after the command completes successfully
    pub fn success_message(&self) -> &'static str {
        match self {
            CommandKind::Lock => "Truck locked.",
            CommandKind::Unlock => "Truck unlocked.",
            CommandKind::Start => "Engine start sent.",
            CommandKind::Stop => "Engine stopped.",
            CommandKind::Honk => "Horn sounded.",
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_messages() {
        assert_eq!(CommandKind::Lock.success_message(), "Truck locked.");
        assert_eq!(CommandKind::Unlock.success_message(), "Truck unlocked.");
        assert_eq!(CommandKind::Start.success_message(), "Engine start sent.");
        assert_eq!(CommandKind::Stop.success_message(), "Engine stopped.");
    }

    #[test]
    fn test_serde_names_match_display() {
        for kind in CommandKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
