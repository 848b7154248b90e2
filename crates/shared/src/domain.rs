use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ConnectionId);

impl ConnectionId {
    /// One-based position, as shown to the operator.
    pub fn ordinal(self) -> usize {
        self.0 + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Broadcast,
    Targeted,
}

impl DispatchMode {
    pub fn from_sync(sync_enabled: bool) -> Self {
        if sync_enabled {
            Self::Broadcast
        } else {
            Self::Targeted
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Broadcast => "all connections",
            Self::Targeted => "current connection",
        }
    }
}

/// The shell-style prompt rendered in front of every recorded command.
pub fn shell_prefix(username: &str, host: &str) -> String {
    format!("{username}@{host} ~ % ")
}
