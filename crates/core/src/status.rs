//! Status enums stored as lowercase TEXT columns.
//!
//! Neither enum is a state machine: any status may follow any other.
//! Each implements `TryFrom<String>` so sqlx rows can decode them with
//! `#[sqlx(try_from = "String")]`.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_text_status {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $variant:ident = $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            #[default]
            $( $variant ),+
        }

        impl $name {
            /// The value stored in the database and used on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $text => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        $label,
                        [$( $text ),+].join(", ")
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

define_text_status! {
    /// Change-order status.
    ChangeOrderStatus ("change order status") {
        Draft = "draft",
        Pending = "pending",
        Approved = "approved",
    }
}

define_text_status! {
    /// Delay-notice status.
    DelayNoticeStatus ("delay notice status") {
        Draft = "draft",
        Sent = "sent",
        Acknowledged = "acknowledged",
    }
}
