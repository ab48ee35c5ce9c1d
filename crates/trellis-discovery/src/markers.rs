//! Well-known markers understood by [`crate::MarkerComponentFinderStrategy`]
//!
//! | Marker                | Placed on                 | Arguments                          |
//! |-----------------------|---------------------------|------------------------------------|
//! | `Component`           | type                      | `name`, `description`, `technology`|
//! | `CodeElement`         | type                      | `component`, `description`         |
//! | `UsesComponent`       | field/property/parameter  | `description`, `technology`        |
//! | `UsesContainer`       | type or member            | `name`, `description`, `technology`|
//! | `UsesSoftwareSystem`  | type or member            | `name`, `description`, `technology`|
//! | `UsedByContainer`     | type                      | `name`, `description`, `technology`|
//! | `UsedByPerson`        | type                      | `name`, `description`, `technology`|
//! | `UsedBySoftwareSystem`| type                      | `name`, `description`, `technology`|

use crate::metadata::MarkerIdentity;

/// Origin every well-known marker is declared in.
pub const MARKER_ORIGIN: &str = "Trellis.Annotations";

pub const COMPONENT: &str = "Trellis.Annotations.ComponentAttribute";
pub const CODE_ELEMENT: &str = "Trellis.Annotations.CodeElementAttribute";
pub const USES_COMPONENT: &str = "Trellis.Annotations.UsesComponentAttribute";
pub const USES_CONTAINER: &str = "Trellis.Annotations.UsesContainerAttribute";
pub const USES_SOFTWARE_SYSTEM: &str = "Trellis.Annotations.UsesSoftwareSystemAttribute";
pub const USED_BY_CONTAINER: &str = "Trellis.Annotations.UsedByContainerAttribute";
pub const USED_BY_PERSON: &str = "Trellis.Annotations.UsedByPersonAttribute";
pub const USED_BY_SOFTWARE_SYSTEM: &str = "Trellis.Annotations.UsedBySoftwareSystemAttribute";

/// Identity of one of the well-known markers above.
pub fn identity(name: &str) -> MarkerIdentity {
    MarkerIdentity::new(name, Some(MARKER_ORIGIN))
}
