use crate::error::ClientError;

/// Display tone for a status pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Wire format is the backend's lowercase string. Parsing tolerates case
/// and `-` in place of `_` ("No-Show" reads as `no_show`).
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ClientError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
                match normalized.as_str() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ClientError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

str_enum!(Role {
    Patient => "patient",
    Doctor => "doctor",
    Pharmacist => "pharmacist",
    Admin => "admin",
});

str_enum!(AppointmentStatus {
    Scheduled => "scheduled",
    Confirmed => "confirmed",
    Completed => "completed",
    Cancelled => "cancelled",
    NoShow => "no_show",
    Rescheduled => "rescheduled",
});

str_enum!(AppointmentPriority {
    Low => "low",
    Normal => "normal",
    High => "high",
    Urgent => "urgent",
});

str_enum!(OrderStatus {
    Pending => "pending",
    Processing => "processing",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(PaymentStatus {
    Pending => "pending",
    Success => "success",
    Failed => "failed",
    Cancelled => "cancelled",
    Refunded => "refunded",
});

str_enum!(PaymentType {
    Order => "order",
    Appointment => "appointment",
});

str_enum!(PrescriptionStatus {
    Active => "active",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl AppointmentStatus {
    /// Completed and cancelled appointments accept no further meeting actions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Scheduled => Tone::Info,
            Self::Confirmed => Tone::Success,
            Self::Completed => Tone::Neutral,
            Self::Cancelled | Self::NoShow => Tone::Danger,
            Self::Rescheduled => Tone::Warning,
        }
    }
}

impl AppointmentPriority {
    pub fn tone(&self) -> Tone {
        match self {
            Self::Low => Tone::Neutral,
            Self::Normal => Tone::Info,
            Self::High => Tone::Warning,
            Self::Urgent => Tone::Danger,
        }
    }
}

impl Default for AppointmentPriority {
    fn default() -> Self {
        Self::Normal
    }
}

impl OrderStatus {
    /// Orders that can no longer be paid for or cancelled.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Pending => Tone::Warning,
            Self::Processing => Tone::Info,
            Self::Completed => Tone::Success,
            Self::Cancelled => Tone::Danger,
        }
    }
}

impl PaymentStatus {
    pub fn tone(&self) -> Tone {
        match self {
            Self::Pending => Tone::Warning,
            Self::Success => Tone::Success,
            Self::Failed | Self::Cancelled => Tone::Danger,
            Self::Refunded => Tone::Neutral,
        }
    }
}

impl PrescriptionStatus {
    pub fn tone(&self) -> Tone {
        match self {
            Self::Active => Tone::Success,
            Self::Completed => Tone::Neutral,
            Self::Cancelled => Tone::Danger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_round_trip() {
        for (variant, s) in [
            (AppointmentStatus::Scheduled, "scheduled"),
            (AppointmentStatus::Confirmed, "confirmed"),
            (AppointmentStatus::Completed, "completed"),
            (AppointmentStatus::Cancelled, "cancelled"),
            (AppointmentStatus::NoShow, "no_show"),
            (AppointmentStatus::Rescheduled, "rescheduled"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn parsing_is_lenient_about_case_and_dashes() {
        assert_eq!(
            AppointmentStatus::from_str("No-Show").unwrap(),
            AppointmentStatus::NoShow
        );
        assert_eq!(OrderStatus::from_str(" PENDING ").unwrap(), OrderStatus::Pending);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(AppointmentStatus::from_str("postponed").is_err());
        assert!(Role::from_str("").is_err());
        assert!(matches!(
            PaymentStatus::from_str("paid"),
            Err(ClientError::InvalidEnum { .. })
        ));
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no_show\"");
        let parsed: PaymentType = serde_json::from_str("\"order\"").unwrap();
        assert_eq!(parsed, PaymentType::Order);
        assert!(serde_json::from_str::<Role>("\"nurse\"").is_err());
    }

    #[test]
    fn terminal_appointment_states() {
        let terminal: Vec<_> = AppointmentStatus::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(
            terminal,
            vec![&AppointmentStatus::Completed, &AppointmentStatus::Cancelled]
        );
    }

    #[test]
    fn closed_orders() {
        assert!(OrderStatus::Completed.is_closed());
        assert!(OrderStatus::Cancelled.is_closed());
        assert!(!OrderStatus::Pending.is_closed());
        assert!(!OrderStatus::Processing.is_closed());
    }
}
