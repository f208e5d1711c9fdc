//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`User`](crate::user::User).
    UserId
);

define_id!(
    /// Unique identifier for a [`StaffMember`](crate::staff::StaffMember).
    StaffMemberId
);

define_id!(
    /// Unique identifier for a [`FitnessCentre`](crate::fitness_centre::FitnessCentre).
    FitnessCentreId
);

define_id!(
    /// Unique identifier for a [`Shift`](crate::shift::Shift).
    ShiftId
);

define_id!(
    /// Unique identifier for an [`Attendance`](crate::attendance::Attendance) record.
    AttendanceId
);

define_id!(
    /// Unique identifier for a [`ShiftInterchangeRequest`](crate::interchange::ShiftInterchangeRequest).
    InterchangeRequestId
);

define_id!(
    /// Unique identifier for a [`BodyPart`](crate::workout::BodyPart).
    BodyPartId
);

define_id!(
    /// Unique identifier for an [`Exercise`](crate::workout::Exercise).
    ExerciseId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_unique_ids_when_called_twice() {
        let a = UserId::new();
        let b = UserId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = ShiftId::new();
        let parsed: ShiftId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_serialize_as_plain_uuid_string() {
        let uuid = uuid::Uuid::new_v4();
        let id = StaffMemberId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn should_return_error_when_parsing_invalid_uuid() {
        let result = FitnessCentreId::from_str("not-a-uuid");
        assert!(result.is_err());
    }
}
