use serde::Serialize;
use thiserror::Error;

use crate::domain::models::catalog::PackageOption;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapacityError {
    #[error("{guests} guests exceed the package limit of {max_guests}")]
    OverCapacity { guests: u32, max_guests: u32 },
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CapacityNotice {
    AtCapacity,
    /// The customer has to confirm before continuing.
    UnderCapacity { guests: u32, max_guests: u32 },
}

impl CapacityNotice {
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, CapacityNotice::UnderCapacity { .. })
    }
}

/// More guests than the package allows blocks the booking; fewer is only a warning.
pub fn check_guest_capacity(adults: u32, kids: u32, package: &PackageOption) -> Result<CapacityNotice, CapacityError> {
    let guests = adults.saturating_add(kids);
    let max_guests = package.max_guests;

    if guests > max_guests {
        Err(CapacityError::OverCapacity { guests, max_guests })
    } else if guests < max_guests {
        Ok(CapacityNotice::UnderCapacity { guests, max_guests })
    } else {
        Ok(CapacityNotice::AtCapacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(max_guests: u32) -> PackageOption {
        PackageOption {
            id: "p".into(),
            name: "P".into(),
            description: String::new(),
            pricing: None,
            base_price: None,
            max_guests,
            duration: 3.0,
            features: vec![],
            active: true,
        }
    }

    #[test]
    fn test_over_capacity_is_a_hard_error() {
        assert_eq!(
            check_guest_capacity(30, 21, &package(50)),
            Err(CapacityError::OverCapacity { guests: 51, max_guests: 50 })
        );
    }

    #[test]
    fn test_under_capacity_needs_confirmation() {
        let notice = check_guest_capacity(10, 5, &package(50)).unwrap();
        assert!(notice.requires_confirmation());
        assert_eq!(notice, CapacityNotice::UnderCapacity { guests: 15, max_guests: 50 });
    }

    #[test]
    fn test_exact_capacity_passes_silently() {
        let notice = check_guest_capacity(30, 20, &package(50)).unwrap();
        assert!(!notice.requires_confirmation());
    }
}
